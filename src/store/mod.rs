pub mod record;
pub mod records;
pub mod targets;

pub use record::CustomerRecord;
pub use records::RecordStore;
pub use targets::{SalesTargets, TargetRegistry};

/// The full in-memory projection the aggregation and ranking engines read
/// from. Owned by the sync engine and passed by reference, so the engines
/// stay pure functions of an injected snapshot.
pub struct BranchContext {
    pub targets: TargetRegistry,
    pub records: RecordStore,
}

impl BranchContext {
    pub fn new() -> Self {
        Self {
            targets: TargetRegistry::new(),
            records: RecordStore::new(),
        }
    }
}

impl Default for BranchContext {
    fn default() -> Self {
        Self::new()
    }
}
