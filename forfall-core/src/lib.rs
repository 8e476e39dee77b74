use std::{
    collections::HashSet,
    sync::{Arc, Mutex, RwLock},
    time::Duration,
};

use eyre::Report;
use forfall_dto::{
    Assignment, ItemId, QueueStore, ReviewSource, Settings, SettingsStore, StageId, StageIntervals,
};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, trace, warn};

mod common;
pub mod config;
pub mod interleave;
pub mod overdue;
pub mod queue;
pub mod shuffle;

pub use common::{current_time, system_time_as_unix_time};
pub use config::{ReorderConfig, DEFAULT_BATCH_SIZE};
pub use overdue::{OverdueMap, OverdueRecord};
pub use queue::{Batches, Partition};

pub type Source = Arc<Box<dyn ReviewSource>>;
pub type SettingsGetter = Arc<Box<dyn SettingsStore>>;
pub type Store = Arc<Box<dyn QueueStore>>;
pub type Rand = Box<dyn RngCore + Send>;

#[derive(Debug, thiserror::Error)]
pub enum ReorderError {
    /// An item references a stage missing from the interval table.
    #[error("item {item} references unknown srs stage {stage}")]
    UnknownStage { item: ItemId, stage: StageId },
    /// A zero interval would turn scoring into a division by zero.
    #[error("srs stage {stage} has a zero interval")]
    ZeroInterval { stage: StageId },
    /// The store rejected the write-back. The write is atomic, so the
    /// persisted queue is still the previous one.
    #[error("queue write-back failed: {0}")]
    Store(Report),
}

/// What a reorder pass did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Reordered(ReorderSummary),
    /// Required data was unavailable or empty; the persisted queue was left
    /// untouched.
    Skipped,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderSummary {
    /// Entries in the rewritten queue, both segments.
    pub total: usize,
    /// Entries classified overdue at partition time.
    pub overdue: usize,
    /// Not-overdue entries mixed into the overdue subset.
    pub mixed_in: usize,
}

/// The reordering engine.
///
/// Owns nothing but collaborator handles and the generator bound at
/// construction. One [`reorder`](Self::reorder) call is one fetch-then-compute
/// pass: it fetches item data and settings, recomputes the ordering as a pure
/// function of those, and writes the result back wholesale. Overlapping calls
/// against the same store are last-writer-wins.
pub struct Reorderer {
    source: Source,
    settings: SettingsGetter,
    queue: Store,
    rng: Mutex<Rand>,
    snapshot: RwLock<HashSet<ItemId>>,
}

impl Reorderer {
    pub fn new<A, B, C>(source: A, settings: B, queue: C, rng: impl RngCore + Send + 'static) -> Self
    where
        A: ReviewSource + 'static,
        B: SettingsStore + 'static,
        C: QueueStore + 'static,
    {
        Self {
            source: Arc::new(Box::new(source)),
            settings: Arc::new(Box::new(settings)),
            queue: Arc::new(Box::new(queue)),
            rng: Mutex::new(Box::new(rng)),
            snapshot: RwLock::new(HashSet::new()),
        }
    }

    /// Entropy-seeded construction for production use.
    pub fn with_entropy<A, B, C>(source: A, settings: B, queue: C) -> Self
    where
        A: ReviewSource + 'static,
        B: SettingsStore + 'static,
        C: QueueStore + 'static,
    {
        Self::new(source, settings, queue, StdRng::from_entropy())
    }

    /// Recompute the queue order for the current instant.
    ///
    /// Triggered by the host when item data is ready and whenever settings
    /// change. Missing or empty data skips the pass and preserves the
    /// existing order; a configuration error aborts it before anything is
    /// written.
    pub async fn reorder(&self, now: Duration) -> Result<Outcome, ReorderError> {
        let (stages, assignments, settings) = match self.fetch().await {
            Ok(data) => data,
            Err(report) => {
                warn!("skipping reorder, data unavailable: {report}");
                return Ok(Outcome::Skipped);
            }
        };

        if stages.is_empty() || assignments.is_empty() {
            warn!("skipping reorder, item data came back empty");
            return Ok(Outcome::Skipped);
        }

        let (active, reserve) = match self.queue.read_queue().await {
            Ok(segments) => segments,
            Err(report) => {
                warn!("skipping reorder, queue unavailable: {report}");
                return Ok(Outcome::Skipped);
            }
        };

        let mut entries = active;
        entries.extend(reserve);

        if entries.is_empty() {
            trace!("empty queue, nothing to reorder");
            return Ok(Outcome::Skipped);
        }

        let config = ReorderConfig::from_settings(&settings);
        let scores = overdue::score(now, &stages, &assignments)?;

        let (ordered, overdue_count, mixed_in) = {
            let mut rng = self.rng.lock().unwrap();

            // shuffle the combined queue first so no ordering from a previous
            // pass leaks into the partition or the interleave
            shuffle::fisher_yates(&mut entries, &mut *rng);

            let Partition { mut overdue, mut rest } =
                queue::partition(entries, &scores, config.threshold);

            *self.snapshot.write().unwrap() = overdue.iter().map(|entry| entry.id).collect();
            let overdue_count = overdue.len();

            if config.sort_overdue {
                queue::sort_by_overdue(&mut overdue, &scores);
            }

            let mixed_in =
                interleave::mix_in(&mut overdue, &mut rest, config.random_fraction, &mut *rng);

            overdue.extend(rest);
            (overdue, overdue_count, mixed_in)
        };

        let total = ordered.len();
        let Batches {
            active,
            reserve,
            current,
        } = queue::materialize(ordered, config.batch_size);

        self.queue
            .write_queue(active, reserve, current)
            .await
            .map_err(ReorderError::Store)?;

        info!(total, overdue = overdue_count, mixed_in, "review queue reordered");

        Ok(Outcome::Reordered(ReorderSummary {
            total,
            overdue: overdue_count,
            mixed_in,
        }))
    }

    /// The id set classified overdue by the last pass.
    ///
    /// Kept as a snapshot rather than recomputed: metrics are not refreshed
    /// as items get reviewed away within a session, so a counter display
    /// intersects this against the live queue.
    pub fn overdue_ids(&self) -> HashSet<ItemId> {
        self.snapshot.read().unwrap().clone()
    }

    async fn fetch(&self) -> eyre::Result<(StageIntervals, Vec<Assignment>, Settings)> {
        let (stages, assignments, settings) = tokio::join!(
            self.source.fetch_stage_intervals(),
            self.source.fetch_assignments(),
            self.settings.load_settings(),
        );

        Ok((stages?, assignments?, settings?))
    }
}
