use std::fmt;

use crate::branch::Branch;
use crate::store::BranchContext;

use super::aggregate::{SalespersonStats, salesperson_stats};

/// Metric a ranking is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMetric {
    Amount,
    Progress,
}

impl fmt::Display for RankMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankMetric::Amount => f.write_str("amount"),
            RankMetric::Progress => f.write_str("progress"),
        }
    }
}

/// Which branches feed the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchFilter {
    All,
    Only(Branch),
}

impl fmt::Display for BranchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchFilter::All => f.write_str("all"),
            BranchFilter::Only(branch) => f.write_str(branch.key()),
        }
    }
}

pub const DEFAULT_RANKING_LIMIT: usize = 10;

/// Top-`limit` salespeople across the filtered branch set, sorted descending
/// by the chosen metric. The sort is stable, so ties keep their collection
/// order: branches in `Branch::ALL` order, names in target-map order within
/// a branch.
pub fn rank(
    ctx: &BranchContext,
    metric: RankMetric,
    filter: BranchFilter,
    limit: usize,
) -> Vec<SalespersonStats> {
    let mut entries: Vec<SalespersonStats> = match filter {
        BranchFilter::All => Branch::ALL
            .into_iter()
            .flat_map(|branch| salesperson_stats(ctx, branch))
            .collect(),
        BranchFilter::Only(branch) => salesperson_stats(ctx, branch),
    };

    match metric {
        RankMetric::Amount => entries.sort_by(|a, b| b.achieved.cmp(&a.achieved)),
        RankMetric::Progress => entries.sort_by(|a, b| b.progress.cmp(&a.progress)),
    }

    entries.truncate(limit);
    entries
}

/// The branch detail view: every salesperson of one branch, sorted
/// descending by achieved amount, uncapped.
pub fn branch_detail(ctx: &BranchContext, branch: Branch) -> Vec<SalespersonStats> {
    let mut entries = salesperson_stats(ctx, branch);
    entries.sort_by(|a, b| b.achieved.cmp(&a.achieved));
    entries
}
