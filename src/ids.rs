//! Sequential identifiers for synthetic records.

use std::collections::HashMap;

/// Hands out `prefix-1`, `prefix-2`, ... with one counter per prefix.
///
/// Owned by whoever needs identifiers; two generators never share counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdGenerator {
    counters: HashMap<String, u64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, prefix: &str) -> String {
        let counter = self.counters.entry(prefix.to_owned()).or_default();
        *counter += 1;
        format!("{prefix}-{counter}")
    }

    /// How many identifiers `prefix` has handed out.
    pub fn issued(&self, prefix: &str) -> u64 {
        self.counters.get(prefix).copied().unwrap_or_default()
    }

    pub fn reset(&mut self, prefix: &str) {
        self.counters.remove(prefix);
    }
}
