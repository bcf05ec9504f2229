use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::branch::Branch;

/// Salesperson name -> target amount for one branch. Name uniqueness is
/// scoped to the branch; the same name in two branches is two entities.
pub type SalesTargets = BTreeMap<String, Decimal>;

/// Per-branch sales targets. Defaults are installed for every branch up
/// front so stats are computable before any remote configuration arrives;
/// a remote update replaces a branch's whole map, never merges into it.
pub struct TargetRegistry {
    targets: [SalesTargets; Branch::COUNT],
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self {
            targets: Branch::ALL.map(default_targets),
        }
    }

    pub fn targets(&self, branch: Branch) -> &SalesTargets {
        &self.targets[branch.index()]
    }

    /// Replace the branch's entire target set. The swap is a single
    /// assignment; no partially-updated map is ever observable.
    pub fn set_targets(&mut self, branch: Branch, targets: SalesTargets) {
        self.targets[branch.index()] = targets;
    }
}

impl Default for TargetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn target_map(entries: &[(&str, i64)]) -> SalesTargets {
    entries
        .iter()
        .map(|&(name, amount)| (name.to_string(), Decimal::from(amount)))
        .collect()
}

/// Hardcoded per-branch targets, active until the remote configuration
/// document for the branch overrides them.
pub fn default_targets(branch: Branch) -> SalesTargets {
    match branch {
        Branch::Banqiao => target_map(&[
            ("張瓊月", 2000),
            ("刁蕙鈺", 2000),
            ("溫志剛", 2000),
            ("周韻如", 2000),
            ("許凱婷", 2000),
            ("廖敏慧", 2000),
            ("宋柏陞", 2000),
            ("李宗杰", 2000),
            ("吳采妍", 2000),
            ("趙貞國", 200),
            ("洪易佳", 200),
        ]),
        Branch::Huajiang => target_map(&[
            ("詹采榆", 1000),
            ("劉家昇", 1000),
            ("施雯晴", 1000),
            ("黃柏飛", 1000),
            ("曹馨勻", 1000),
            ("徐小凡", 1000),
        ]),
        Branch::Xinban => target_map(&[
            ("璧菁", 3000),
            ("麗鳳", 1000),
            ("馨予", 1000),
            ("淑芬", 1000),
            ("靜芸", 1000),
            ("品豪", 1000),
            ("祺倫", 1000),
            ("奕憲", 1000),
            ("泓權", 1000),
            ("至浩", 1000),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_branch_has_defaults_before_any_update() {
        let registry = TargetRegistry::new();
        for branch in Branch::ALL {
            assert!(
                !registry.targets(branch).is_empty(),
                "branch {branch} should carry default targets at startup"
            );
        }
    }

    #[test]
    fn set_targets_replaces_wholesale() {
        let mut registry = TargetRegistry::new();
        let mut replacement = SalesTargets::new();
        replacement.insert("新人".to_string(), Decimal::from(500));

        registry.set_targets(Branch::Huajiang, replacement);

        let targets = registry.targets(Branch::Huajiang);
        assert_eq!(targets.len(), 1, "old entries must not survive a replacement");
        assert_eq!(targets.get("新人"), Some(&Decimal::from(500)));
        // Other branches untouched
        assert_eq!(registry.targets(Branch::Banqiao).len(), 11);
    }
}
