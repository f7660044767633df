use std::rc::Rc;

use layoutkit_core::{Bounds, CanvasSize, GestureRejected};
use layoutkit_designer::manipulation::EntryContext;
use layoutkit_designer::{
    GestureKind, ListenerRegistry, ManipulationConfig, ManipulationSession, Modifiers,
    ResizeHandle, SelectionSet,
};
use proptest::prelude::*;

const FREE: Modifiers = Modifiers {
    axis_lock: false,
    snap_bypass: true,
    aspect_lock: false,
};

fn config() -> ManipulationConfig {
    ManipulationConfig {
        preview_scale: 0.5,
        grid_step: 10.0,
        min_width: 50.0,
        min_height: 20.0,
        canvas: CanvasSize::new(1000.0, 800.0),
    }
}

fn session() -> (ManipulationSession, Rc<ListenerRegistry>) {
    let registry = Rc::new(ListenerRegistry::new());
    (ManipulationSession::new(config(), registry.clone()), registry)
}

fn selected(key: &str) -> SelectionSet {
    let mut s = SelectionSet::new();
    s.select(key);
    s
}

fn ctx(selection: &SelectionSet) -> EntryContext<'_> {
    EntryContext {
        edit_mode: true,
        selection,
    }
}

#[test]
fn test_resize_se_and_nw_are_mirrors() {
    let start = Bounds::new(100.0, 100.0, 200.0, 100.0);
    let sel = selected("box");

    let (mut se, _) = session();
    se.begin_resize(ctx(&sel), "box", start, ResizeHandle::SE, (0.0, 0.0))
        .unwrap();
    // 20 px at preview scale 0.5 is 40 logical units
    let grown = se.pointer_up((20.0, 20.0), FREE).unwrap().geometry;
    assert_eq!(grown.width, Some(240.0));
    assert_eq!(grown.height, Some(140.0));
    assert_eq!(grown.x, None);
    assert_eq!(grown.y, None);

    let (mut nw, _) = session();
    nw.begin_resize(ctx(&sel), "box", start, ResizeHandle::NW, (0.0, 0.0))
        .unwrap();
    let mirrored = nw.pointer_up((-20.0, -20.0), FREE).unwrap().geometry;
    assert_eq!(mirrored.width, grown.width);
    assert_eq!(mirrored.height, grown.height);
    // the opposite corner stays where it was
    assert_eq!(mirrored.x, Some(60.0));
    assert_eq!(mirrored.y, Some(60.0));
}

#[test]
fn test_resize_respects_minimum_size() {
    let sel = selected("box");
    let (mut s, _) = session();
    s.begin_resize(
        ctx(&sel),
        "box",
        Bounds::new(0.0, 0.0, 100.0, 40.0),
        ResizeHandle::W,
        (0.0, 0.0),
    )
    .unwrap();
    let g = s.pointer_move((500.0, 0.0), FREE).unwrap().geometry;
    assert_eq!(g.width, Some(50.0));
    assert_eq!(g.x, Some(50.0));
    assert_eq!(g.height, Some(40.0));
}

#[test]
fn test_aspect_lock_keeps_ratio() {
    let sel = selected("box");
    let (mut s, _) = session();
    s.begin_resize(
        ctx(&sel),
        "box",
        Bounds::new(0.0, 0.0, 200.0, 100.0),
        ResizeHandle::E,
        (0.0, 0.0),
    )
    .unwrap();
    let g = s
        .pointer_move(
            (50.0, 0.0),
            Modifiers {
                aspect_lock: true,
                ..FREE
            },
        )
        .unwrap()
        .geometry;
    assert_eq!(g.width, Some(300.0));
    assert_eq!(g.height, Some(150.0));
}

#[test]
fn test_drag_snaps_unless_bypassed() {
    let sel = selected("box");
    let (mut s, _) = session();
    s.begin_drag(ctx(&sel), "box", Bounds::new(0.0, 0.0, 10.0, 10.0), (0.0, 0.0))
        .unwrap();
    let snapped = s.pointer_move((7.0, 3.0), Modifiers::default()).unwrap().geometry;
    assert_eq!((snapped.x, snapped.y), (Some(10.0), Some(10.0)));
    let free = s.pointer_move((7.0, 3.0), FREE).unwrap().geometry;
    assert_eq!((free.x, free.y), (Some(14.0), Some(6.0)));
}

#[test]
fn test_axis_lock_follows_dominant_axis() {
    let sel = selected("box");
    let (mut s, _) = session();
    s.begin_drag(ctx(&sel), "box", Bounds::new(100.0, 100.0, 10.0, 10.0), (0.0, 0.0))
        .unwrap();
    let g = s
        .pointer_move(
            (5.0, 40.0),
            Modifiers {
                axis_lock: true,
                ..FREE
            },
        )
        .unwrap()
        .geometry;
    assert_eq!((g.x, g.y), (Some(100.0), Some(180.0)));
}

#[test]
fn test_rotation_relative_to_start() {
    let sel = selected("box");
    let (mut s, _) = session();
    s.begin_rotate(ctx(&sel), "box", 30.0, (100.0, 100.0), (200.0, 100.0))
        .unwrap();
    // a quarter turn clockwise in screen coordinates
    let g = s.pointer_move((100.0, 200.0), FREE).unwrap().geometry;
    assert!((g.rotation.unwrap() - 120.0).abs() < 1e-9);
    let commit = s.pointer_up((100.0, 0.0), FREE).unwrap();
    assert_eq!(commit.kind, GestureKind::Rotate);
    assert!((commit.geometry.rotation.unwrap() - 300.0).abs() < 1e-9);
}

#[test]
fn test_entry_checks_in_order() {
    let (mut s, _) = session();
    let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
    let mut sel = SelectionSet::new();
    sel.select("a");
    sel.select("b");
    sel.set_locked("a", true);

    let off = EntryContext {
        edit_mode: false,
        selection: &sel,
    };
    assert_eq!(s.begin_drag(off, "a", b, (0.0, 0.0)), Err(GestureRejected::NotEditing));
    assert!(matches!(
        s.begin_drag(ctx(&sel), "a", b, (0.0, 0.0)),
        Err(GestureRejected::Locked { .. })
    ));
    assert!(matches!(
        s.begin_drag(ctx(&sel), "b", b, (0.0, 0.0)),
        Err(GestureRejected::NotSoleSelection { .. })
    ));

    let only = selected("c");
    s.begin_drag(ctx(&only), "c", b, (0.0, 0.0)).unwrap();
    assert_eq!(
        s.begin_resize(ctx(&only), "c", b, ResizeHandle::E, (0.0, 0.0)),
        Err(GestureRejected::GestureActive { active: "drag" })
    );
}

#[test]
fn test_listeners_released_on_every_exit() {
    let sel = selected("box");
    let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
    let (mut s, registry) = session();

    s.begin_drag(ctx(&sel), "box", b, (0.0, 0.0)).unwrap();
    assert_eq!(registry.active_count(), 2);
    s.pointer_up((1.0, 1.0), FREE);
    assert_eq!(registry.active_count(), 0);

    s.begin_rotate(ctx(&sel), "box", 0.0, (5.0, 5.0), (10.0, 5.0)).unwrap();
    assert_eq!(registry.gestures(), vec!["rotate", "rotate"]);
    assert!(s.cancel().is_some());
    assert_eq!(registry.active_count(), 0);

    s.begin_resize(ctx(&sel), "box", b, ResizeHandle::S, (0.0, 0.0))
        .unwrap();
    drop(s);
    assert_eq!(registry.active_count(), 0);
}

#[test]
fn test_unchanged_gesture_reports_no_change() {
    let sel = selected("box");
    let (mut s, _) = session();
    s.begin_drag(ctx(&sel), "box", Bounds::new(20.0, 20.0, 10.0, 10.0), (5.0, 5.0))
        .unwrap();
    let commit = s.pointer_up((5.0, 5.0), Modifiers::default()).unwrap();
    assert!(!commit.changed);
    assert!(s.is_idle());
}

proptest! {
    #[test]
    fn prop_drag_stays_on_canvas(
        x in 0.0..990.0f64,
        y in 0.0..790.0f64,
        px in -5000.0..5000.0f64,
        py in -5000.0..5000.0f64,
        bypass in any::<bool>(),
    ) {
        let sel = selected("box");
        let (mut s, _) = session();
        s.begin_drag(ctx(&sel), "box", Bounds::new(x, y, 10.0, 10.0), (0.0, 0.0)).unwrap();
        let g = s
            .pointer_move((px, py), Modifiers { snap_bypass: bypass, ..Modifiers::default() })
            .unwrap()
            .geometry;
        let (gx, gy) = (g.x.unwrap(), g.y.unwrap());
        prop_assert!((0.0..=990.0).contains(&gx));
        prop_assert!((0.0..=790.0).contains(&gy));
    }
}
