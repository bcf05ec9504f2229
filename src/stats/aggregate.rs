use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::branch::Branch;
use crate::store::BranchContext;
use crate::store::record::{PRODUCT_FINANCE, PRODUCT_INSURANCE};

/// Rollup for one branch over its current snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchStats {
    pub total_target: Decimal,
    pub total_achieved: Decimal,
    pub total_remaining: Decimal,
    pub progress_pct: Decimal,
}

/// Rollup across all branches, with the per-branch figures it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrandStats {
    pub grand_total_target: Decimal,
    pub grand_total_achieved: Decimal,
    pub grand_total_remaining: Decimal,
    pub grand_progress_pct: Decimal,
    pub branches: BTreeMap<Branch, BranchStats>,
}

/// One salesperson's line within a branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalespersonStats {
    pub name: String,
    pub branch: Branch,
    pub target: Decimal,
    pub achieved: Decimal,
    pub remaining: Decimal,
    pub progress: Decimal,
}

/// Totals for one calendar month across all branches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyStats {
    pub month: String,
    pub total: Decimal,
    pub finance: Decimal,
    pub insurance: Decimal,
    pub by_branch: BTreeMap<Branch, Decimal>,
}

/// achieved / target × 100 at one decimal place, halves rounded away from
/// zero. A branch or salesperson with no target reads as 0% rather than a
/// division by zero.
pub fn progress_percentage(achieved: Decimal, target: Decimal) -> Decimal {
    if target <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (achieved / target * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

pub fn branch_stats(ctx: &BranchContext, branch: Branch) -> BranchStats {
    let total_target: Decimal = ctx.targets.targets(branch).values().copied().sum();
    // Every record counts toward the branch total, whether or not its
    // salesperson matches a target entry.
    let total_achieved: Decimal = ctx.records.records(branch).iter().map(|r| r.amount).sum();

    BranchStats {
        total_target,
        total_achieved,
        total_remaining: total_target - total_achieved,
        progress_pct: progress_percentage(total_achieved, total_target),
    }
}

pub fn grand_stats(ctx: &BranchContext) -> GrandStats {
    let branches: BTreeMap<Branch, BranchStats> = Branch::ALL
        .into_iter()
        .map(|branch| (branch, branch_stats(ctx, branch)))
        .collect();

    let grand_total_target: Decimal = branches.values().map(|s| s.total_target).sum();
    let grand_total_achieved: Decimal = branches.values().map(|s| s.total_achieved).sum();

    GrandStats {
        grand_total_target,
        grand_total_achieved,
        grand_total_remaining: grand_total_target - grand_total_achieved,
        grand_progress_pct: progress_percentage(grand_total_achieved, grand_total_target),
        branches,
    }
}

/// One line per entry in the branch's current target map, in map order.
/// Salespeople with no records appear with zero achieved; records whose
/// salesperson matches no target entry contribute to no line here (they
/// still count in `branch_stats`).
pub fn salesperson_stats(ctx: &BranchContext, branch: Branch) -> Vec<SalespersonStats> {
    let records = ctx.records.records(branch);
    ctx.targets
        .targets(branch)
        .iter()
        .map(|(name, &target)| {
            let achieved: Decimal = records
                .iter()
                .filter(|r| r.salesperson == *name)
                .map(|r| r.amount)
                .sum();
            SalespersonStats {
                name: name.clone(),
                branch,
                target,
                achieved,
                remaining: target - achieved,
                progress: progress_percentage(achieved, target),
            }
        })
        .collect()
}

/// Month buckets in the order given, each with total/finance/insurance sums
/// and per-branch subtotals over records whose month tag matches.
pub fn monthly_stats(ctx: &BranchContext, months: &[String]) -> Vec<MonthlyStats> {
    months
        .iter()
        .map(|month| {
            let mut total = Decimal::ZERO;
            let mut finance = Decimal::ZERO;
            let mut insurance = Decimal::ZERO;
            let mut by_branch = BTreeMap::new();

            for branch in Branch::ALL {
                let mut branch_total = Decimal::ZERO;
                for record in ctx.records.records(branch) {
                    if record.order_month != *month {
                        continue;
                    }
                    branch_total += record.amount;
                    match record.product_type.as_str() {
                        PRODUCT_FINANCE => finance += record.amount,
                        PRODUCT_INSURANCE => insurance += record.amount,
                        _ => {}
                    }
                }
                total += branch_total;
                by_branch.insert(branch, branch_total);
            }

            MonthlyStats {
                month: month.clone(),
                total,
                finance,
                insurance,
                by_branch,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn progress_rounds_halves_away_from_zero() {
        // 1 / 2000 is 0.05%, which must round up to 0.1, not to the banker's 0.0
        assert_eq!(
            progress_percentage(Decimal::ONE, Decimal::from(2000)),
            dec!(0.1)
        );
    }

    #[test]
    fn progress_of_zero_target_is_zero() {
        assert_eq!(
            progress_percentage(Decimal::from(500), Decimal::ZERO),
            Decimal::ZERO
        );
    }

    #[test]
    fn progress_can_exceed_one_hundred() {
        assert_eq!(
            progress_percentage(Decimal::from(300), Decimal::from(200)),
            Decimal::from(150)
        );
    }
}
