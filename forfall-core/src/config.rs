use forfall_dto::Settings;

/// How many items the review UI holds in its active batch.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Algorithm knobs for one reorder pass, derived from the persisted
/// [`Settings`] right before the pass runs.
#[derive(Clone, Debug, PartialEq)]
pub struct ReorderConfig {
    /// Minimum overdue metric to classify an item as overdue, as a fraction
    /// (0.2 = 20% of the stage interval past due).
    pub threshold: f64,
    /// Fraction of the overdue subset's size to mix back in from the
    /// not-overdue items, in `[0, 1]`.
    pub random_fraction: f64,
    pub sort_overdue: bool,
    pub batch_size: usize,
}

impl ReorderConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            threshold: (settings.overdue_threshold_percent / 100.0).max(0.0),
            random_fraction: (settings.percent_random_items_to_include / 100.0).clamp(0.0, 1.0),
            sort_overdue: settings.sort_overdue_items,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}
