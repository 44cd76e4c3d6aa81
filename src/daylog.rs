use crate::activities::ActivityId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One calendar day of activity completion.
///
/// `completed_at` is keyed by exactly the ids in `completed_activities`
/// whenever the log was built through [`toggle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLog {
    pub date: NaiveDate,
    pub completed_activities: BTreeSet<ActivityId>,
    pub completed_at: BTreeMap<ActivityId, DateTime<Utc>>,
}

/// Per-date logs for a range; dates without a record are absent.
pub type LogCollection = BTreeMap<NaiveDate, DayLog>;

impl DayLog {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            completed_activities: BTreeSet::new(),
            completed_at: BTreeMap::new(),
        }
    }

    /// A log carrying only the completed set, as the local store keeps it.
    pub fn from_activities(date: NaiveDate, done: impl IntoIterator<Item = ActivityId>) -> Self {
        Self {
            date,
            completed_activities: done.into_iter().collect(),
            completed_at: BTreeMap::new(),
        }
    }

    pub fn is_done(&self, id: &ActivityId) -> bool {
        self.completed_activities.contains(id)
    }

    pub fn count(&self) -> usize {
        self.completed_activities.len()
    }
}

/// Flips `id` in `current`: removes it with its timestamp, or adds it stamped at `now`.
pub fn toggle(id: &ActivityId, current: &DayLog, now: DateTime<Utc>) -> DayLog {
    let mut next = current.clone();
    if next.completed_activities.remove(id) {
        next.completed_at.remove(id);
    } else {
        next.completed_activities.insert(id.clone());
        next.completed_at.insert(id.clone(), now);
    }
    next
}
