use criterion::{black_box, criterion_group, criterion_main, Criterion};
use layoutkit_core::{
    Bounds, ContainerStyle, ElementGeometry, ElementKind, LayoutSpec, PartialGeometry, SkuDocument,
    SpecElement,
};
use layoutkit_designer::{align, distribute, resolve_element, Alignment, Distribution};

fn build_spec(n: usize) -> LayoutSpec {
    (0..n).fold(LayoutSpec::new("square", "Square"), |spec, i| {
        spec.with_element(
            format!("el{i}"),
            SpecElement::new(
                ElementGeometry::new(i as f64 * 7.0, i as f64 * 3.0).with_size(40.0, 20.0),
                ElementKind::Container(ContainerStyle::default()),
            ),
        )
    })
}

fn resolve_bench(c: &mut Criterion) {
    let spec = build_spec(200);
    let mut doc = SkuDocument::new();
    for i in (0..200).step_by(2) {
        doc.apply_override("square", &format!("el{i}"), PartialGeometry::position(1.0, 2.0));
    }
    let keys: Vec<String> = spec.elements.keys().cloned().collect();

    c.bench_function("resolve_200_elements", |b| {
        b.iter(|| {
            for key in &keys {
                let _ = black_box(resolve_element(&spec, &doc, key));
            }
        });
    });
}

fn alignment_bench(c: &mut Criterion) {
    let boxes: Vec<(String, Bounds)> = (0..100)
        .map(|i| {
            (
                format!("el{i}"),
                Bounds::new((i * 37 % 500) as f64, (i * 13 % 300) as f64, 30.0, 20.0),
            )
        })
        .collect();
    let keys: Vec<&str> = boxes.iter().map(|(k, _)| k.as_str()).collect();
    let lookup = |key: &str| boxes.iter().find(|(k, _)| k == key).map(|(_, b)| *b);

    c.bench_function("align_left_100", |b| {
        b.iter(|| black_box(align(&keys, Alignment::Left, lookup)));
    });
    c.bench_function("distribute_horizontal_100", |b| {
        b.iter(|| black_box(distribute(&keys, Distribution::Horizontal, lookup)));
    });
}

criterion_group!(benches, resolve_bench, alignment_bench);
criterion_main!(benches);
