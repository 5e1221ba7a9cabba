use std::sync::atomic::AtomicBool;

use crate::common::*;

fn bench_rotations<I>(c: &mut Criterion, name: &str, interpolator: I, early_ray_termination: bool)
where
    I: volren_lib::volumetric::Interpolator + Copy,
{
    let volume = get_volume();
    let cancel = AtomicBool::new(false);

    c.bench_function(name, |b| {
        let mut rotations = DEFAULT_ROTATIONS.iter().cycle();
        b.iter(|| {
            let mut config = config(early_ray_termination, Traversal::ViewSpace);
            if let Some(rotation) = rotations.next() {
                config.rotation = *rotation;
            }
            let renderer = Renderer::new(&volume, interpolator, config);
            renderer.render(&cancel)
        });
    });
}

pub fn render_trilinear(c: &mut Criterion) {
    bench_rotations(c, "view space trilinear", Trilinear, false);
}

pub fn render_trilinear_ert(c: &mut Criterion) {
    bench_rotations(c, "view space trilinear ert", Trilinear, true);
}

pub fn render_nearest_ert(c: &mut Criterion) {
    bench_rotations(c, "view space nearest ert", NearestNeighbor, true);
}
