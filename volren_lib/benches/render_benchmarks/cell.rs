use std::sync::atomic::AtomicBool;

use volren_lib::{view::CellGeometry, ViewTransform};

use crate::common::*;

pub fn render_cell_ert(c: &mut Criterion) {
    let volume = get_volume();
    let cancel = AtomicBool::new(false);
    let mut config = config(true, Traversal::Cell);
    config.rotation = DEFAULT_ROTATIONS[1];
    let renderer = Renderer::new(&volume, Trilinear, config);

    c.bench_function("cell traversal trilinear ert", |b| {
        b.iter(|| renderer.render(&cancel))
    });
}

pub fn cell_intersections(c: &mut Criterion) {
    let transform = ViewTransform::volume_view(1.0, vector![1.0, 1.0, 1.0], vector![64, 64, 64], DEFAULT_ROTATIONS[2]);
    let geometry = CellGeometry::new(&transform);

    c.bench_function("cell intersect", |b| {
        b.iter(|| {
            let mut hits = 0;
            for n in 0..1000 {
                let v = (n % 64) as f32 + 0.5;
                let cell = geometry.cell_at(v, v, v);
                let center = transform.transform_point(&nalgebra::point![v, v, v]);
                if cell.intersect(center.x, center.y).is_some() {
                    hits += 1;
                }
            }
            hits
        })
    });
}
