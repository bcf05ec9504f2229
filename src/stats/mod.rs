pub mod aggregate;
pub mod ranking;

pub use aggregate::{
    BranchStats, GrandStats, MonthlyStats, SalespersonStats, branch_stats, grand_stats,
    monthly_stats, progress_percentage, salesperson_stats,
};
pub use ranking::{BranchFilter, DEFAULT_RANKING_LIMIT, RankMetric, branch_detail, rank};
