use volren_lib::render::{RendererFront, RendererMessage, SerialRenderer};

use crate::common::*;

pub fn render_front(c: &mut Criterion) {
    let serial_r = SerialRenderer::new(get_volume(), Trilinear, config(true, Traversal::ViewSpace));

    let mut front = RendererFront::new();
    if front.start_rendering(serial_r).is_err() {
        return;
    }

    let sender = front.get_sender();
    let receiver = front.get_receiver();
    let shared_config = match front.get_config_handle() {
        Some(config) => config,
        None => return,
    };

    c.bench_function("serial renderer front", move |b| {
        let mut rotations = DEFAULT_ROTATIONS.iter().cycle();
        b.iter_batched(
            || {
                // Setup
                if let Some(rotation) = rotations.next() {
                    shared_config.write().rotation = *rotation;
                }
            },
            |()| {
                // measured part
                sender.send(RendererMessage::StartRendering).unwrap();
                receiver.recv().unwrap()
            },
            criterion::BatchSize::PerIteration,
        );
    });

    // Cleanup
    front.finish().unwrap();
}
