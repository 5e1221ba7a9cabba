use criterion::{criterion_group, criterion_main, Criterion};
use render_benchmarks::{cell::*, front::*, view_space::*};

mod common;
mod render_benchmarks;

criterion_group! {
    name = view_space;
    config = Criterion::default().significance_level(0.1).sample_size(10);
    targets = render_trilinear, render_trilinear_ert, render_nearest_ert
}

criterion_group! {
    name = cell_traversal;
    config = Criterion::default().significance_level(0.1).sample_size(10);
    targets = render_cell_ert, cell_intersections
}

criterion_group! {
    name = threaded;
    config = Criterion::default().significance_level(0.1).sample_size(10);
    targets = render_front
}

criterion_main!(view_space, cell_traversal, threaded);
