use std::collections::HashMap;
use std::time::Duration;

use forfall_dto::{Assignment, ItemId, StageId, StageIntervals};
use serde::{Deserialize, Serialize};

use crate::ReorderError;

/// How far past due an item is, as a fraction of its stage interval.
///
/// 0.0 means the review just became available, 1.0 means a full interval has
/// passed since then. Not clamped; multiplied by 100 it reads as percent
/// overdue.
pub type OverdueMap = HashMap<ItemId, f64>;

/// Scoring output for a single item, recomputed on every reorder and then
/// folded into an [`OverdueMap`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverdueRecord {
    pub id: ItemId,
    pub slug: String,
    pub srs_stage: StageId,
    pub available_at: Duration,
    pub overdue: f64,
}

/// Timestamp the review became available, if it is available at all.
fn available_since(assignment: &Assignment, now: Duration) -> Option<Duration> {
    match assignment.available_at {
        Some(at) if at < now => Some(at),
        _ => None,
    }
}

/// Score every item whose review is currently available.
///
/// Pure function of its inputs. Items with no available review produce no
/// record and end up absent from the map.
pub fn score_records(
    now: Duration,
    stages: &StageIntervals,
    assignments: &[Assignment],
) -> Result<Vec<OverdueRecord>, ReorderError> {
    let mut records = Vec::new();

    for assignment in assignments {
        let Some(available_at) = available_since(assignment, now) else {
            continue;
        };

        let interval = match stages.interval_secs(assignment.srs_stage) {
            Some(0) => {
                return Err(ReorderError::ZeroInterval {
                    stage: assignment.srs_stage,
                })
            }
            Some(secs) => Duration::from_secs(secs),
            None => {
                return Err(ReorderError::UnknownStage {
                    item: assignment.id,
                    stage: assignment.srs_stage,
                })
            }
        };

        let elapsed = now - available_at;
        let overdue = elapsed.as_secs_f64() / interval.as_secs_f64();

        records.push(OverdueRecord {
            id: assignment.id,
            slug: assignment.slug.clone(),
            srs_stage: assignment.srs_stage,
            available_at,
            overdue,
        });
    }

    Ok(records)
}

pub fn score(
    now: Duration,
    stages: &StageIntervals,
    assignments: &[Assignment],
) -> Result<OverdueMap, ReorderError> {
    let records = score_records(now, stages, assignments)?;
    Ok(records.into_iter().map(|r| (r.id, r.overdue)).collect())
}
