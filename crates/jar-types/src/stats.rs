//! Read-time mood aggregation. Nothing here is persisted; every figure is
//! recomputed from the owner's memories on request.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;

use crate::models::{MemoryEntry, Mood, UNSPECIFIED_MOOD};

/// Calendar bucket used by [`happiest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Month,
    Year,
}

impl Period {
    /// Group key for a timestamp: `YYYY-MM` for months, `YYYY` for years.
    pub fn key(self, at: &NaiveDateTime) -> String {
        match self {
            Self::Month => at.format("%Y-%m").to_string(),
            Self::Year => at.format("%Y").to_string(),
        }
    }
}

/// Number of memories per mood label. Memories without a mood are counted
/// under [`UNSPECIFIED_MOOD`].
pub fn mood_counts(entries: &[MemoryEntry]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        let label = entry.mood.as_deref().unwrap_or(UNSPECIFIED_MOOD);
        *counts.entry(label.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Key of the period whose memories add up to the highest happiness score.
///
/// Periods are scanned in the order they first appear in `entries`, and a
/// later period only wins with a strictly higher score. Callers pass entries
/// oldest first, so ties go to the earliest period.
pub fn happiest(entries: &[MemoryEntry], period: Period) -> Option<String> {
    let mut order: Vec<(String, u32)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let key = period.key(&entry.created_at);
        let score = Mood::score(entry.mood.as_deref());
        match index.get(&key) {
            Some(&i) => order[i].1 += score,
            None => {
                index.insert(key.clone(), order.len());
                order.push((key, score));
            }
        }
    }

    let mut best: Option<(String, u32)> = None;
    for (key, score) in order {
        if best.as_ref().is_none_or(|(_, top)| score > *top) {
            best = Some((key, score));
        }
    }
    best.map(|(key, _)| key)
}
