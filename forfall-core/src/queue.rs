use forfall_dto::QueueEntry;

use crate::overdue::OverdueMap;

/// The queue split against the overdue threshold. Both sides keep the order
/// they had in the (already shuffled) input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Partition {
    pub overdue: Vec<QueueEntry>,
    pub rest: Vec<QueueEntry>,
}

/// Split the queue at the threshold.
///
/// An entry counts as overdue iff it has a score at all and that score is at
/// least `threshold`. Unscored entries (no available review) always land in
/// `rest`.
pub fn partition(queue: Vec<QueueEntry>, scores: &OverdueMap, threshold: f64) -> Partition {
    let (overdue, rest) = queue
        .into_iter()
        .partition(|entry| scores.get(&entry.id).is_some_and(|metric| *metric >= threshold));

    Partition { overdue, rest }
}

/// Most overdue first; equal scores tie-break on ascending id so the order is
/// total and deterministic.
pub fn sort_by_overdue(entries: &mut [QueueEntry], scores: &OverdueMap) {
    entries.sort_by(|a, b| {
        let a_score = scores.get(&a.id).copied().unwrap_or_default();
        let b_score = scores.get(&b.id).copied().unwrap_or_default();
        b_score.total_cmp(&a_score).then_with(|| a.id.cmp(&b.id))
    });
}

/// The materialized queue state handed back to the store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Batches {
    pub active: Vec<QueueEntry>,
    pub reserve: Vec<QueueEntry>,
    pub current: Option<QueueEntry>,
}

/// Split the final ordering into the active front batch and the reserve.
///
/// The reserve is stored reversed: the store refills the active batch by
/// popping from the reserve tail, so the entry right after the batch in
/// logical order has to sit last.
pub fn materialize(mut ordered: Vec<QueueEntry>, batch_size: usize) -> Batches {
    let split = ordered.len().min(batch_size);
    let mut reserve = ordered.split_off(split);
    reserve.reverse();

    let current = ordered.first().cloned();

    Batches {
        active: ordered,
        reserve,
        current,
    }
}
