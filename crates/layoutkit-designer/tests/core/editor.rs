use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use layoutkit_core::{
    BrandRecord, CanvasSize, ContainerStyle, CustomElement, CustomElementType, ElementGeometry,
    ElementKind, GestureRejected, LayoutSpec, SkuRecord, SpecElement,
};
use layoutkit_designer::{
    Distribution, LayoutEditor, ListenerRegistry, MemoryAssetSource, Modifiers, Renderer,
    ResizeHandle,
};
use layoutkit_settings::{EditorSettings, RenderSettings};

fn container(x: f64, y: f64, w: f64, h: f64) -> SpecElement {
    SpecElement::new(
        ElementGeometry::new(x, y).with_size(w, h),
        ElementKind::Container(ContainerStyle::default()),
    )
}

fn open() -> (LayoutEditor, Rc<ListenerRegistry>, Renderer) {
    let mut spec = LayoutSpec::new("story", "Story")
        .with_element("a", container(0.0, 0.0, 100.0, 100.0))
        .with_element("b", container(120.0, 0.0, 100.0, 100.0))
        .with_element("c", container(500.0, 0.0, 100.0, 100.0));
    spec.canvas = CanvasSize::new(1000.0, 1000.0);

    let settings = EditorSettings {
        preview_scale: 0.5,
        ..EditorSettings::default()
    };
    let registry = Rc::new(ListenerRegistry::new());
    let editor = LayoutEditor::new(
        spec,
        BrandRecord::new(1, "Acme"),
        SkuRecord::new(2, "Anvil"),
        &settings,
        registry.clone(),
    );
    let renderer = Renderer::new(
        RenderSettings::default(),
        Arc::new(MemoryAssetSource::new()),
    );
    (editor, registry, renderer)
}

#[test]
fn test_distribute_from_painted_bounds_then_undo_redo() {
    let (mut editor, _, renderer) = open();
    editor.paint_preview(&renderer, (0.0, 0.0)).unwrap();
    editor.selection_mut().select_many(["a", "b", "c"]);

    let t0 = Instant::now();
    assert_eq!(editor.distribute(Distribution::Horizontal, t0), 1);
    // gap = (500 - 100 - 100) / 2
    let b = editor.document().override_for("story", "b").unwrap();
    assert_eq!(b.x, Some(250.0));
    assert_eq!(b.y, Some(0.0));

    // nothing recorded until the debounce elapses
    assert!(!editor.poll_history(t0 + Duration::from_millis(10)));
    assert!(editor.poll_history(t0 + Duration::from_secs(1)));

    assert!(editor.undo());
    assert!(editor.document().position_overrides.is_empty());
    assert!(editor.can_redo());
    assert!(editor.redo());
    assert_eq!(
        editor.document().override_for("story", "b").unwrap().x,
        Some(250.0)
    );
}

#[test]
fn test_undo_flushes_pending_edit() {
    let (mut editor, _, renderer) = open();
    editor.paint_preview(&renderer, (0.0, 0.0)).unwrap();
    editor.selection_mut().select_many(["a", "c"]);
    editor.align(layoutkit_designer::Alignment::Top, Instant::now());
    // already aligned: nothing moved, nothing pending
    assert!(!editor.can_undo());

    editor.set_edit_mode(true);
    editor.selection_mut().select("c");
    editor.selection_mut().deselect("a");
    editor.begin_drag("c", (0.0, 0.0)).unwrap();
    editor.pointer_move((100.0, 100.0), Modifiers::default());
    editor.pointer_up((100.0, 100.0), Modifiers::default(), Instant::now());
    assert!(editor.can_undo());
    assert!(editor.undo());
    assert!(editor.document().position_overrides.is_empty());
}

#[test]
fn test_gestures_rejected_outside_edit_mode_and_on_locked() {
    let (mut editor, registry, renderer) = open();
    editor.paint_preview(&renderer, (0.0, 0.0)).unwrap();
    editor.selection_mut().select("a");
    assert_eq!(
        editor.begin_drag("a", (0.0, 0.0)),
        Err(GestureRejected::NotEditing)
    );

    editor.set_edit_mode(true);
    editor.set_locked("a", true);
    assert!(matches!(
        editor.begin_resize("a", ResizeHandle::SE, (0.0, 0.0)),
        Err(GestureRejected::Locked { .. })
    ));
    assert_eq!(registry.active_count(), 0);
}

#[test]
fn test_resize_then_rotate_custom_element() {
    let (mut editor, registry, _) = open();
    editor.set_edit_mode(true);
    let mut el = CustomElement::new(CustomElementType::Container, 100.0, 100.0, 200.0, 100.0);
    el.id = "custom-1".into();
    editor.add_custom_element(el, Instant::now());
    editor.selection_mut().select("custom-1");

    editor
        .begin_resize("custom-1", ResizeHandle::SE, (0.0, 0.0))
        .unwrap();
    editor.pointer_move((50.0, 25.0), Modifiers::default());
    editor.pointer_up((50.0, 25.0), Modifiers::default(), Instant::now());
    let b = editor.bounds_of("custom-1").unwrap();
    assert_eq!((b.width, b.height), (300.0, 150.0));

    // centre (250, 175) logical is (125, 87.5) on screen
    editor.begin_rotate("custom-1", (225.0, 87.5)).unwrap();
    assert_eq!(registry.gestures(), vec!["rotate", "rotate"]);
    editor.pointer_move((125.0, 187.5), Modifiers::default());
    let commit = editor
        .pointer_up((125.0, 187.5), Modifiers::default(), Instant::now())
        .unwrap();
    assert!((commit.geometry.rotation.unwrap() - 90.0).abs() < 1e-9);
    let rotation = editor
        .document()
        .custom_element("story", "custom-1")
        .and_then(|e| e.rotation)
        .unwrap();
    assert!((rotation - 90.0).abs() < 1e-9);
    assert_eq!(registry.active_count(), 0);
}
