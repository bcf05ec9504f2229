//! Ranking engine tests: metric choice, branch filter, truncation, and the
//! stable tie-break.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use branch_sales_monitor::branch::Branch;
use branch_sales_monitor::stats::{BranchFilter, RankMetric, branch_detail, rank};
use branch_sales_monitor::store::{BranchContext, CustomerRecord, SalesTargets};

fn targets(entries: &[(&str, i64)]) -> SalesTargets {
    entries
        .iter()
        .map(|&(name, amount)| (name.to_string(), Decimal::from(amount)))
        .collect()
}

fn record(id: &str, salesperson: &str, amount: i64) -> CustomerRecord {
    CustomerRecord {
        id: id.to_string(),
        amount: Decimal::from(amount),
        salesperson: salesperson.to_string(),
        order_month: "2026-01".to_string(),
        product_type: "finance".to_string(),
    }
}

fn ranking_fixture() -> BranchContext {
    let mut ctx = BranchContext::new();
    ctx.targets
        .set_targets(Branch::Banqiao, targets(&[("甲", 2000), ("乙", 400)]));
    ctx.targets
        .set_targets(Branch::Huajiang, targets(&[("丙", 1000)]));
    ctx.targets
        .set_targets(Branch::Xinban, targets(&[("丁", 100)]));
    ctx.records.set_records(
        Branch::Banqiao,
        vec![record("r1", "甲", 900), record("r2", "乙", 300)],
    );
    ctx.records
        .set_records(Branch::Huajiang, vec![record("r3", "丙", 600)]);
    ctx.records
        .set_records(Branch::Xinban, vec![record("r4", "丁", 90)]);
    ctx
}

/// With metric = amount, no later entry may out-achieve an earlier one.
#[test]
fn amount_ranking_is_non_increasing() {
    let ctx = ranking_fixture();
    let ranked = rank(&ctx, RankMetric::Amount, BranchFilter::All, 10);

    assert_eq!(ranked.len(), 4);
    for pair in ranked.windows(2) {
        assert!(
            pair[0].achieved >= pair[1].achieved,
            "{} ({}) ranked above {} ({})",
            pair[0].name,
            pair[0].achieved,
            pair[1].name,
            pair[1].achieved
        );
    }
    assert_eq!(ranked[0].name, "甲");
}

/// Progress ranking orders by percentage, which disagrees with the amount
/// order in this fixture.
#[test]
fn progress_ranking_uses_percentages() {
    let ctx = ranking_fixture();
    let ranked = rank(&ctx, RankMetric::Progress, BranchFilter::All, 10);

    // 丁 90/100 = 90%, 乙 300/400 = 75%, 丙 600/1000 = 60%, 甲 900/2000 = 45%
    assert_eq!(
        ranked.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
        ["丁", "乙", "丙", "甲"]
    );
    assert_eq!(ranked[0].progress, dec!(90));
}

/// The list is truncated to the requested size.
#[test]
fn ranking_truncates_to_limit() {
    let ctx = ranking_fixture();
    let ranked = rank(&ctx, RankMetric::Amount, BranchFilter::All, 3);
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].achieved, dec!(900));
}

/// Filtering on one branch excludes every other branch's salespeople.
#[test]
fn branch_filter_restricts_population() {
    let ctx = ranking_fixture();
    let ranked = rank(
        &ctx,
        RankMetric::Amount,
        BranchFilter::Only(Branch::Huajiang),
        10,
    );
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].name, "丙");
    assert_eq!(ranked[0].branch, Branch::Huajiang);
}

/// Ties keep collection order: branches in `Branch::ALL` order, names in
/// target-map order within a branch.
#[test]
fn equal_keys_keep_collection_order() {
    let mut ctx = BranchContext::new();
    ctx.targets
        .set_targets(Branch::Banqiao, targets(&[("乙", 500), ("甲", 500)]));
    ctx.targets
        .set_targets(Branch::Huajiang, targets(&[("丙", 500)]));
    ctx.targets.set_targets(Branch::Xinban, SalesTargets::new());
    // No records at all: everyone ties at zero achieved.

    let ranked = rank(&ctx, RankMetric::Amount, BranchFilter::All, 10);
    assert_eq!(
        ranked.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
        ["乙", "甲", "丙"],
        "stable sort must preserve branch-then-name order for ties"
    );
}

/// The detail view is per branch, sorted by achieved amount, and uncapped.
#[test]
fn branch_detail_sorts_by_amount_uncapped() {
    let mut ctx = BranchContext::new();
    let entries: Vec<(String, i64)> = (0..12).map(|i| (format!("rm{i:02}"), 1000)).collect();
    let entry_refs: Vec<(&str, i64)> = entries.iter().map(|(n, a)| (n.as_str(), *a)).collect();
    ctx.targets
        .set_targets(Branch::Xinban, targets(&entry_refs));
    ctx.records.set_records(
        Branch::Xinban,
        (0..12)
            .map(|i| record(&format!("r{i}"), &format!("rm{i:02}"), 100 * i))
            .collect(),
    );

    let detail = branch_detail(&ctx, Branch::Xinban);
    assert_eq!(detail.len(), 12, "detail view is never truncated");
    assert_eq!(detail[0].name, "rm11");
    for pair in detail.windows(2) {
        assert!(pair[0].achieved >= pair[1].achieved);
    }
}
