use std::collections::HashMap;

use layoutkit_core::Bounds;
use layoutkit_designer::{align, distribute, Alignment, Distribution, Reposition};
use proptest::prelude::*;

fn boxes(list: &[(&str, f64, f64, f64, f64)]) -> HashMap<String, Bounds> {
    list.iter()
        .map(|&(k, x, y, w, h)| (k.to_string(), Bounds::new(x, y, w, h)))
        .collect()
}

fn apply(map: &mut HashMap<String, Bounds>, moves: &[Reposition]) {
    for m in moves {
        if let Some(b) = map.get_mut(&m.key) {
            *b = b.moved_to(m.x, m.y);
        }
    }
}

#[test]
fn test_align_left_uses_minimum_x() {
    let mut map = boxes(&[
        ("a", 30.0, 0.0, 10.0, 10.0),
        ("b", 10.0, 50.0, 40.0, 10.0),
        ("c", 70.0, 90.0, 20.0, 10.0),
    ]);
    let moves = align(["a", "b", "c"], Alignment::Left, |k| map.get(k).copied());
    // b already sits at the minimum
    assert_eq!(moves.len(), 2);
    apply(&mut map, &moves);
    assert!(map.values().all(|b| b.x == 10.0));
    assert_eq!(map["c"].y, 90.0);
}

#[test]
fn test_align_bottom_uses_maximum_bottom() {
    let mut map = boxes(&[("a", 0.0, 0.0, 10.0, 30.0), ("b", 0.0, 50.0, 10.0, 20.0)]);
    let moves = align(["a", "b"], Alignment::Bottom, |k| map.get(k).copied());
    apply(&mut map, &moves);
    assert_eq!(map["a"].bottom, 70.0);
    assert_eq!(map["b"].bottom, 70.0);
}

#[test]
fn test_align_center_horizontal_shares_centre() {
    let mut map = boxes(&[("a", 0.0, 0.0, 20.0, 10.0), ("b", 100.0, 0.0, 40.0, 10.0)]);
    let moves = align(["a", "b"], Alignment::CenterHorizontal, |k| map.get(k).copied());
    apply(&mut map, &moves);
    assert!((map["a"].center_x - map["b"].center_x).abs() < 1e-9);
}

#[test]
fn test_align_needs_two_resolvable_elements() {
    let map = boxes(&[("a", 0.0, 0.0, 10.0, 10.0)]);
    assert!(align(["a"], Alignment::Top, |k| map.get(k).copied()).is_empty());
    // the unresolvable key is skipped, leaving one element
    assert!(align(["a", "ghost"], Alignment::Top, |k| map.get(k).copied()).is_empty());
}

#[test]
fn test_distribute_needs_three_elements() {
    let map = boxes(&[("a", 0.0, 0.0, 10.0, 10.0), ("b", 50.0, 0.0, 10.0, 10.0)]);
    assert!(distribute(["a", "b"], Distribution::Horizontal, |k| map.get(k).copied()).is_empty());
}

#[test]
fn test_distribute_keeps_outermost_in_place() {
    let mut map = boxes(&[
        ("a", 0.0, 0.0, 10.0, 10.0),
        ("b", 15.0, 0.0, 30.0, 10.0),
        ("c", 90.0, 0.0, 10.0, 10.0),
    ]);
    let moves = distribute(["c", "a", "b"], Distribution::Horizontal, |k| map.get(k).copied());
    assert!(moves.iter().all(|m| m.key == "b"));
    apply(&mut map, &moves);
    assert_eq!(map["a"].x, 0.0);
    assert_eq!(map["c"].x, 90.0);
    // free space 100 - 50 = 50, two gaps of 25
    assert_eq!(map["b"].x, 35.0);
}

fn element() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (0.0..1000.0f64, 0.0..1000.0f64, 1.0..200.0f64, 1.0..200.0f64)
}

proptest! {
    #[test]
    fn prop_align_left_shares_minimum(elements in proptest::collection::vec(element(), 2..8)) {
        let mut map: HashMap<String, Bounds> = elements
            .iter()
            .enumerate()
            .map(|(i, &(x, y, w, h))| (format!("el{i}"), Bounds::new(x, y, w, h)))
            .collect();
        let min = map.values().map(|b| b.x).fold(f64::INFINITY, f64::min);
        let keys: Vec<String> = map.keys().cloned().collect();
        let moves = align(&keys, Alignment::Left, |k| map.get(k).copied());
        apply(&mut map, &moves);
        for b in map.values() {
            prop_assert!((b.x - min).abs() < 1e-9);
        }
    }

    #[test]
    fn prop_distribute_yields_equal_gaps(elements in proptest::collection::vec(element(), 3..8)) {
        let mut map: HashMap<String, Bounds> = elements
            .iter()
            .enumerate()
            .map(|(i, &(x, y, w, h))| (format!("el{i}"), Bounds::new(x, y, w, h)))
            .collect();
        let mut order: Vec<String> = map.keys().cloned().collect();
        order.sort_by(|a, b| map[a].y.total_cmp(&map[b].y).then_with(|| a.cmp(b)));
        let moves = distribute(&order, Distribution::Vertical, |k| map.get(k).copied());
        apply(&mut map, &moves);

        let gaps: Vec<f64> = order
            .windows(2)
            .map(|w| map[&w[1]].y - map[&w[0]].bottom)
            .collect();
        for gap in &gaps {
            prop_assert!((gap - gaps[0]).abs() < 1e-6);
        }
    }
}
