use std::{
    fs,
    io::ErrorKind,
    path::PathBuf,
    sync::{Arc, RwLock},
    time::Duration,
};

use eyre::Result;
use forfall_dto::{
    Assignment, QueueEntry, QueueStore, ReviewSource, Settings, SettingsStore, StageIntervals,
    TimeProvider,
};
use tracing::info;

pub mod paths;

/// Wall clock as unix time.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl TimeProvider for SystemClock {
    fn current_time(&self) -> Duration {
        forfall_core::current_time()
    }
}

/// Fixed in-memory review source, for embedding and tests.
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    stages: StageIntervals,
    assignments: Vec<Assignment>,
}

impl StaticSource {
    pub fn new(stages: StageIntervals, assignments: Vec<Assignment>) -> Self {
        Self {
            stages,
            assignments,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl ReviewSource for StaticSource {
    async fn fetch_stage_intervals(&self) -> Result<StageIntervals> {
        Ok(self.stages.clone())
    }

    async fn fetch_assignments(&self) -> Result<Vec<Assignment>> {
        Ok(self.assignments.clone())
    }
}

/// Settings held in memory, for hosts that manage persistence themselves.
#[derive(Clone, Default)]
pub struct MemSettings(Arc<RwLock<Settings>>);

impl MemSettings {
    pub fn new(settings: Settings) -> Self {
        Self(Arc::new(RwLock::new(settings)))
    }

    pub fn set(&self, settings: Settings) {
        *self.0.write().unwrap() = settings;
    }

    pub fn get(&self) -> Settings {
        self.0.read().unwrap().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl SettingsStore for MemSettings {
    async fn load_settings(&self) -> Result<Settings> {
        Ok(self.get())
    }
}

/// Settings persisted as a toml file under the user config dir.
#[derive(Clone, Debug)]
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    pub fn new() -> Self {
        Self::at(paths::config_dir().join("settings.toml"))
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let toml = toml::to_string_pretty(settings)?;
        fs::write(&self.path, toml)?;
        Ok(())
    }

    pub fn load(&self) -> Result<Settings> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("no settings file at {:?}, using defaults", self.path);
                Ok(Settings::default())
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl Default for FileSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait(?Send)]
impl SettingsStore for FileSettings {
    async fn load_settings(&self) -> Result<Settings> {
        self.load()
    }
}

/// The active/reserve/current triple the review UI consumes.
///
/// One lock guards all three, so a write-back replaces the whole state
/// atomically and readers never see half of a reorder.
#[derive(Clone, Default)]
pub struct MemQueue {
    inner: Arc<RwLock<QueueState>>,
}

#[derive(Clone, Debug, Default)]
struct QueueState {
    active: Vec<QueueEntry>,
    reserve: Vec<QueueEntry>,
    current: Option<QueueEntry>,
}

impl MemQueue {
    pub fn new(active: Vec<QueueEntry>, reserve: Vec<QueueEntry>) -> Self {
        let current = active.first().cloned();
        Self {
            inner: Arc::new(RwLock::new(QueueState {
                active,
                reserve,
                current,
            })),
        }
    }

    pub fn current(&self) -> Option<QueueEntry> {
        self.inner.read().unwrap().current.clone()
    }

    pub fn len(&self) -> usize {
        let state = self.inner.read().unwrap();
        state.active.len() + state.reserve.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take the presented item out of the queue, refilling the active batch
    /// from the reserve tail.
    pub fn advance(&self) -> Option<QueueEntry> {
        let mut state = self.inner.write().unwrap();
        if state.active.is_empty() {
            return None;
        }

        let done = state.active.remove(0);
        if let Some(next) = state.reserve.pop() {
            state.active.push(next);
        }
        state.current = state.active.first().cloned();

        Some(done)
    }
}

#[async_trait::async_trait(?Send)]
impl QueueStore for MemQueue {
    async fn read_queue(&self) -> Result<(Vec<QueueEntry>, Vec<QueueEntry>)> {
        let state = self.inner.read().unwrap();
        Ok((state.active.clone(), state.reserve.clone()))
    }

    async fn write_queue(
        &self,
        active: Vec<QueueEntry>,
        reserve: Vec<QueueEntry>,
        current: Option<QueueEntry>,
    ) -> Result<()> {
        *self.inner.write().unwrap() = QueueState {
            active,
            reserve,
            current,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64) -> QueueEntry {
        QueueEntry {
            id,
            slug: format!("item-{id}"),
        }
    }

    #[test]
    fn advance_refills_from_the_reserve_tail() {
        // logical order 1, 2, 3, 4, 5: the reserve is stored reversed
        let queue = MemQueue::new(vec![entry(1), entry(2)], vec![entry(5), entry(4), entry(3)]);

        assert_eq!(queue.current(), Some(entry(1)));
        assert_eq!(queue.advance(), Some(entry(1)));
        assert_eq!(queue.current(), Some(entry(2)));

        // 3 was the reserve tail, so it joined the active batch
        assert_eq!(queue.advance(), Some(entry(2)));
        assert_eq!(queue.advance(), Some(entry(3)));
        assert_eq!(queue.advance(), Some(entry(4)));
        assert_eq!(queue.advance(), Some(entry(5)));
        assert_eq!(queue.advance(), None);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn write_replaces_the_whole_state() {
        let queue = MemQueue::new(vec![entry(1)], vec![entry(2)]);

        queue
            .write_queue(vec![entry(9), entry(8)], vec![entry(7)], Some(entry(9)))
            .await
            .unwrap();

        let (active, reserve) = queue.read_queue().await.unwrap();
        assert_eq!(active, vec![entry(9), entry(8)]);
        assert_eq!(reserve, vec![entry(7)]);
        assert_eq!(queue.current(), Some(entry(9)));
    }

    #[tokio::test]
    async fn file_settings_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettings::at(dir.path().join("settings.toml"));

        // nothing persisted yet
        assert_eq!(store.load_settings().await.unwrap(), Settings::default());

        let settings = Settings {
            overdue_threshold_percent: 35.0,
            percent_random_items_to_include: 5.0,
            sort_overdue_items: false,
            display_overdue_count: false,
        };
        store.save(&settings).unwrap();

        assert_eq!(store.load_settings().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn static_source_hands_back_its_data() {
        let stages: StageIntervals = [(1, 3600)].into_iter().collect();
        let assignments = vec![Assignment {
            id: 1,
            slug: "item-1".into(),
            srs_stage: 1,
            available_at: None,
        }];

        let source = StaticSource::new(stages.clone(), assignments.clone());

        assert_eq!(source.fetch_stage_intervals().await.unwrap(), stages);
        assert_eq!(source.fetch_assignments().await.unwrap(), assignments);
    }
}
