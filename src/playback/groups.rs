use crate::lesson::model::Step;
use crate::render::element::{RenderedElement, elements_for_step};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Elements of one step that share the same reveal offset.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DelayGroup {
    /// Offset from the start of the step, in milliseconds.
    pub delay: u64,
    /// Elements in instruction order.
    pub elements: Vec<RenderedElement>,
}

/// Partition a step's instructions by `delay_ms` (absent = 0).
///
/// Groups come back in ascending delay order; within a group the instruction order is kept.
/// Every instruction lands in exactly one group.
pub fn group_by_delay(step: &Step) -> Vec<DelayGroup> {
    let elements = elements_for_step(step.step_number, &step.instructions);
    let mut by_delay = BTreeMap::<u64, Vec<RenderedElement>>::new();
    for (ins, el) in step.instructions.iter().zip(elements) {
        by_delay.entry(ins.delay()).or_default().push(el);
    }
    by_delay
        .into_iter()
        .map(|(delay, elements)| DelayGroup { delay, elements })
        .collect()
}

/// Wait between revealing `prev` and `next`: the delay difference, floored at `min_gap`.
pub fn group_gap(prev: &DelayGroup, next: &DelayGroup, min_gap: Duration) -> Duration {
    Duration::from_millis(next.delay.saturating_sub(prev.delay)).max(min_gap)
}

#[cfg(test)]
#[path = "../../tests/unit/playback/groups.rs"]
mod tests;
