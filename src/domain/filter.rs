use serde::{Deserialize, Serialize};
use strum::Display;

/// Category selector for the history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum FilterId {
    All,
    Sent,
    Received,
    Transferred,
    Coinbase,
    Staking,
}

impl FilterId {
    pub fn all() -> [FilterId; 6] {
        [
            FilterId::All,
            FilterId::Sent,
            FilterId::Received,
            FilterId::Transferred,
            FilterId::Coinbase,
            FilterId::Staking,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FilterId::All => "All",
            FilterId::Sent => "Sent",
            FilterId::Received => "Received",
            FilterId::Transferred => "Transferred",
            FilterId::Coinbase => "Coinbase",
            FilterId::Staking => "Staking",
        }
    }

    /// The next filter in display order, wrapping around.
    pub fn next(&self) -> FilterId {
        let all = FilterId::all();
        let i = all.iter().position(|f| f == self).unwrap_or(0);
        all[(i + 1) % all.len()]
    }
}

/// The active filter together with its point-in-time transaction count.
///
/// The count is queried once when the filter is selected and may go stale
/// relative to concurrent wallet activity; `None` means the count query
/// failed and the total is unknown (not zero).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub id: FilterId,
    pub total_count: Option<u64>,
}

impl Filter {
    pub fn new(id: FilterId) -> Self {
        Self {
            id,
            total_count: None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        self.id.display_name()
    }

    /// Header label, e.g. `All (57)` or `Staking (?)` while the count is
    /// unknown.
    pub fn label(&self) -> String {
        match self.total_count {
            Some(n) => format!("{} ({})", self.display_name(), n),
            None => format!("{} (?)", self.display_name()),
        }
    }
}
