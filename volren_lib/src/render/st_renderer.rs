use std::{
    sync::{atomic::AtomicBool, Arc},
    thread::{self, JoinHandle},
};

use crossbeam::channel::{Receiver, Sender};
use log::{debug, warn};
use parking_lot::{Mutex, RwLock};

use crate::{
    classify::ColorKind,
    volumetric::{Interpolator, Volume},
    RenderError,
};

use super::{
    render_front::{RenderReport, RenderThread},
    Framebuffer, RenderConfig, Renderer, RendererMessage,
};

/// Renderer living in its own thread, one pass per [`RendererMessage::StartRendering`]
pub struct SerialRenderer<V, I>
where
    V: Volume + 'static,
    I: Interpolator + 'static,
{
    renderer: Renderer<V, I>,
    shared_buffer: Arc<Mutex<Framebuffer>>,
    config: Arc<RwLock<RenderConfig>>,
    cancel: Arc<AtomicBool>,
    communication: (Sender<RenderReport>, Receiver<RendererMessage>),
}

impl<V, I> RenderThread for SerialRenderer<V, I>
where
    V: Volume + 'static,
    I: Interpolator + 'static,
{
    fn get_shared_buffer(&self) -> Arc<Mutex<Framebuffer>> {
        self.shared_buffer.clone()
    }

    fn get_config(&self) -> Arc<RwLock<RenderConfig>> {
        self.config.clone()
    }

    fn get_cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    fn start(self) -> Result<JoinHandle<()>, RenderError> {
        self.start_rendering()
    }

    fn set_communication(&mut self, communication: (Sender<RenderReport>, Receiver<RendererMessage>)) {
        self.communication = communication;
    }
}

impl<V, I> SerialRenderer<V, I>
where
    V: Volume + 'static,
    I: Interpolator + 'static,
{
    pub fn new(volume: V, interpolator: I, config: RenderConfig) -> Self {
        let (width, height) = config.resolution;
        let buffer = Arc::new(Mutex::new(Framebuffer::new(width, height, ColorKind::Grayscale)));

        // Dummy channels
        // Replaced once started
        let (sender_void, _) = crossbeam::channel::unbounded();
        let never = crossbeam::channel::never();
        let communication = (sender_void, never);

        Self {
            renderer: Renderer::new(volume, interpolator, config.clone()),
            shared_buffer: buffer,
            config: Arc::new(RwLock::new(config)),
            cancel: Arc::new(AtomicBool::new(false)),
            communication,
        }
    }

    pub fn start_rendering(self) -> Result<JoinHandle<()>, RenderError> {
        thread::Builder::new()
            .name("volren-render".into())
            .spawn(move || self.run())
            .map_err(|e| RenderError::ThreadSpawn(e.to_string()))
    }

    fn run(mut self) {
        // Master loop
        loop {
            // Gather input, front gone means shut down
            let msg = match self.communication.1.recv() {
                Ok(msg) => msg,
                Err(_) => break,
            };
            match msg {
                RendererMessage::StartRendering => (),
                RendererMessage::ShutDown => break,
            }

            let config = self.config.read().clone();
            self.renderer.set_config(config);

            let report = self
                .renderer
                .render(&self.cancel)
                .map(|(frame, outcome)| {
                    *self.shared_buffer.lock() = frame;
                    outcome
                });

            if let Err(e) = &report {
                warn!("Frame not rendered: {e}");
            }

            // Send result
            if self.communication.0.send(report).is_err() {
                break;
            }
        }
        debug!("Render thread finished");
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::{
        render::{RenderOutcome, RendererFront},
        test_helpers::*,
        volumetric::NearestNeighbor,
    };

    #[test]
    fn front_renders_and_shuts_down() {
        let renderer = SerialRenderer::new(uniform_volume(4, 128.0), NearestNeighbor, tent_config(8, 8));
        let mut front = RendererFront::new();
        front.start_rendering(renderer).unwrap();
        assert!(front.is_active());

        front.send_message(RendererMessage::StartRendering);
        assert_eq!(front.receive_message(), Some(Ok(RenderOutcome::Complete)));

        let buffer = front.get_buffer_handle().unwrap();
        assert_eq!(lit_pixels(&buffer.lock()).len(), 4);

        // next frame picks up the changed config
        front.get_config_handle().unwrap().write().resolution = (4, 4);
        front.send_message(RendererMessage::StartRendering);
        assert_eq!(front.receive_message(), Some(Ok(RenderOutcome::Complete)));
        assert_eq!(buffer.lock().width(), 4);

        front.finish().unwrap();
        assert!(!front.is_active());
        assert!(front.get_buffer_handle().is_none());
    }

    #[test]
    fn cancel_after_request_interrupts_frame() {
        let renderer = SerialRenderer::new(sphere_volume(16), NearestNeighbor, tent_config(32, 32));
        let mut front = RendererFront::new();
        front.start_rendering(renderer).unwrap();

        // worker blocks on the config until the request is cancelled
        let config = front.get_config_handle().unwrap();
        let guard = config.write();
        front.send_message(RendererMessage::StartRendering);
        front.cancel();
        drop(guard);
        assert_eq!(front.receive_message(), Some(Ok(RenderOutcome::Interrupted)));

        // a new request is not affected by the old cancel
        front.send_message(RendererMessage::StartRendering);
        assert_eq!(front.receive_message(), Some(Ok(RenderOutcome::Complete)));

        front.finish().unwrap();
    }

    #[test]
    fn errors_are_reported() {
        let mut config = tent_config(8, 8);
        config.scale = -1.0;
        let renderer = SerialRenderer::new(uniform_volume(4, 128.0), NearestNeighbor, config);
        let mut front = RendererFront::new();
        front.start_rendering(renderer).unwrap();

        front.send_message(RendererMessage::StartRendering);
        assert!(matches!(front.receive_message(), Some(Err(RenderError::InvalidConfig(_)))));

        front.finish().unwrap();
    }
}
