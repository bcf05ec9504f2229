use std::fmt;

use serde::{Deserialize, Serialize};

/// Organizational branches feeding the monitor. The set is fixed at compile
/// time; branches are never added or removed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    Banqiao,
    Huajiang,
    Xinban,
}

impl Branch {
    pub const ALL: [Branch; 3] = [Branch::Banqiao, Branch::Huajiang, Branch::Xinban];
    pub const COUNT: usize = Self::ALL.len();

    /// Stable key used in feed endpoints and log fields.
    pub fn key(self) -> &'static str {
        match self {
            Branch::Banqiao => "banqiao",
            Branch::Huajiang => "huajiang",
            Branch::Xinban => "xinban",
        }
    }

    /// Human-facing label used by presentation sinks.
    pub fn label(self) -> &'static str {
        match self {
            Branch::Banqiao => "板橋",
            Branch::Huajiang => "華江",
            Branch::Xinban => "新板",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
