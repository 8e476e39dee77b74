use std::{collections::HashMap, time::Duration};

use eyre::Result;
use serde::{Deserialize, Serialize};

pub type ItemId = u64;
pub type StageId = u32;

pub trait TimeProvider {
    fn current_time(&self) -> std::time::Duration;
}

/// One reviewable item as reported by the item store.
///
/// Timestamps are unix time as [`Duration`]. `available_at` is `None` while
/// the item has no scheduled review. The reordering engine treats this as
/// read-only input and never writes any of it back.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub id: ItemId,
    pub slug: String,
    pub srs_stage: StageId,
    pub available_at: Option<Duration>,
}

/// The opaque element the queue is made of.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: ItemId,
    pub slug: String,
}

impl From<&Assignment> for QueueEntry {
    fn from(assignment: &Assignment) -> Self {
        Self {
            id: assignment.id,
            slug: assignment.slug.clone(),
        }
    }
}

/// Repetition stage -> interval in seconds, queried once per scoring pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageIntervals(HashMap<StageId, u64>);

impl StageIntervals {
    pub fn new(intervals: HashMap<StageId, u64>) -> Self {
        Self(intervals)
    }

    pub fn interval_secs(&self, stage: StageId) -> Option<u64> {
        self.0.get(&stage).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(StageId, u64)> for StageIntervals {
    fn from_iter<T: IntoIterator<Item = (StageId, u64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// User-facing settings, persisted by a [`SettingsStore`].
///
/// The percent fields are 0-100 as shown in the settings dialog; the engine
/// converts them to fractions when it derives its config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub overdue_threshold_percent: f64,
    pub percent_random_items_to_include: f64,
    pub sort_overdue_items: bool,
    pub display_overdue_count: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            overdue_threshold_percent: 20.0,
            percent_random_items_to_include: 10.0,
            sort_overdue_items: true,
            display_overdue_count: true,
        }
    }
}

#[async_trait::async_trait(?Send)]
pub trait ReviewSource {
    async fn fetch_stage_intervals(&self) -> Result<StageIntervals>;

    async fn fetch_assignments(&self) -> Result<Vec<Assignment>>;
}

#[async_trait::async_trait(?Send)]
pub trait SettingsStore {
    async fn load_settings(&self) -> Result<Settings>;
}

/// The persisted queue the review UI consumes.
///
/// `active` is the head batch, presented front first. `reserve` is the tail,
/// consumed from its end: the last reserve element is the next one pulled
/// when the active batch runs dry.
#[async_trait::async_trait(?Send)]
pub trait QueueStore {
    async fn read_queue(&self) -> Result<(Vec<QueueEntry>, Vec<QueueEntry>)>;

    /// Replace both segments and the current item wholesale. Must be atomic
    /// with respect to concurrent reads: readers see either the old state or
    /// the new one, never a mix.
    async fn write_queue(
        &self,
        active: Vec<QueueEntry>,
        reserve: Vec<QueueEntry>,
        current: Option<QueueEntry>,
    ) -> Result<()>;
}
