use crate::branch::Branch;

use super::record::CustomerRecord;

/// Per-branch customer records, kept in the order the feed delivered them.
/// Consumers re-sort as needed; the store never does.
pub struct RecordStore {
    records: [Vec<CustomerRecord>; Branch::COUNT],
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            records: Branch::ALL.map(|_| Vec::new()),
        }
    }

    pub fn records(&self, branch: Branch) -> &[CustomerRecord] {
        &self.records[branch.index()]
    }

    /// Replace the branch's entire record collection. An empty collection is
    /// a valid snapshot ("no records yet"), not an error.
    pub fn set_records(&mut self, branch: Branch, records: Vec<CustomerRecord>) {
        self.records[branch.index()] = records;
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}
