use super::*;
use crate::foundation::core::{MIN_GROUP_GAP, Point};
use crate::lesson::model::DrawingInstruction;

fn step(delays: &[Option<u64>]) -> Step {
    Step {
        explanation: "e".to_owned(),
        instructions: delays
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let ins = DrawingInstruction::text(format!("t{i}"), Point::new(100.0, 200.0));
                match d {
                    Some(d) => ins.with_delay_ms(*d),
                    None => ins,
                }
            })
            .collect(),
        step_number: 1,
        total_steps: 1,
    }
}

fn ids(group: &DelayGroup) -> Vec<&str> {
    group.elements.iter().map(|e| e.id.as_str()).collect()
}

#[test]
fn partitions_by_delay_in_ascending_order() {
    let groups = group_by_delay(&step(&[
        Some(1000),
        None,
        Some(0),
        Some(250),
        Some(1000),
    ]));
    let delays: Vec<_> = groups.iter().map(|g| g.delay).collect();
    assert_eq!(delays, vec![0, 250, 1000]);
    assert_eq!(ids(&groups[0]), vec!["s1-e1", "s1-e2"]);
    assert_eq!(ids(&groups[1]), vec!["s1-e3"]);
    assert_eq!(ids(&groups[2]), vec!["s1-e0", "s1-e4"]);
}

#[test]
fn grouping_is_a_partition() {
    let delays: Vec<Option<u64>> = (0..40u64).map(|i| Some((i * 7919) % 5 * 300)).collect();
    let s = step(&delays);
    let groups = group_by_delay(&s);

    let total: usize = groups.iter().map(|g| g.elements.len()).sum();
    assert_eq!(total, s.instructions.len());

    let mut seen: Vec<&str> = groups.iter().flat_map(ids).collect();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), s.instructions.len());
    assert!(groups.windows(2).all(|w| w[0].delay < w[1].delay));
}

#[test]
fn empty_step_has_no_groups() {
    assert!(group_by_delay(&step(&[])).is_empty());
}

#[test]
fn gap_is_the_difference_floored_at_min_gap() {
    let groups = group_by_delay(&step(&[Some(0), Some(2000), Some(2100)]));
    assert_eq!(
        group_gap(&groups[0], &groups[1], MIN_GROUP_GAP),
        Duration::from_millis(2000)
    );
    assert_eq!(
        group_gap(&groups[1], &groups[2], MIN_GROUP_GAP),
        Duration::from_millis(500)
    );
}
