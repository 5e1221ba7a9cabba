use std::{
    sync::{atomic::AtomicBool, Arc},
    thread::JoinHandle,
};

use crossbeam::channel::{Receiver, Sender};
use log::{info, warn};
use parking_lot::{Mutex, RwLock};

use crate::RenderError;

use super::{Framebuffer, RenderConfig, RenderOutcome};

/// Messages to renderer
///
/// Messages queue up and one is read after frame is done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererMessage {
    /// Start rendering with the current shared config
    StartRendering,
    /// Shut down, thread will get ready to be joined
    ShutDown,
}

/// Result of one frame, sent back to the front
pub type RenderReport = Result<RenderOutcome, RenderError>;

/// Interface for renderers running in different thread
///
/// Must be implemented by renderers that wish to communicate using
/// [`RendererFront`].
pub trait RenderThread {
    /// Get reference to shared framebuffer
    fn get_shared_buffer(&self) -> Arc<Mutex<Framebuffer>>;

    /// Get reference to config
    ///
    /// If you obtain write lock, you can change the next frame
    fn get_config(&self) -> Arc<RwLock<RenderConfig>>;

    /// Flag interrupting the frame in progress
    fn get_cancel_flag(&self) -> Arc<AtomicBool>;

    /// Spawn thread with renderer
    ///
    /// Renderer waits for messages, does _not_ start rendering.
    /// Returns handle which can be used to sync with parent thread.
    fn start(self) -> Result<JoinHandle<()>, RenderError>;

    /// Communication setter
    fn set_communication(&mut self, communication: (Sender<RenderReport>, Receiver<RendererMessage>));
}

/// Communicating with renderer
///
/// Can be active or inactive.
pub struct RendererFront {
    handle: Option<JoinHandle<()>>,
    buffer: Option<Arc<Mutex<Framebuffer>>>,
    config: Option<Arc<RwLock<RenderConfig>>>,
    cancel: Option<Arc<AtomicBool>>,
    communication_in: (Sender<RendererMessage>, Receiver<RendererMessage>),
    communication_out: (Sender<RenderReport>, Receiver<RenderReport>),
}

impl RendererFront {
    /// Create inactive front
    pub fn new() -> Self {
        let communication_in = crossbeam::channel::bounded(100); // main -> renderer
        let communication_out = crossbeam::channel::bounded(100); // renderer -> main
        Self {
            handle: None,
            buffer: None,
            config: None,
            cancel: None,
            communication_in,
            communication_out,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Getter for sender
    /// Returned struct can be used to send commands to renderer
    pub fn get_sender(&self) -> Sender<RendererMessage> {
        self.communication_in.0.clone()
    }

    /// Send message to renderer
    ///
    /// A frame request clears the cancel flag here, so a [`cancel`](Self::cancel)
    /// issued right after it always reaches the new frame.
    pub fn send_message(&self, msg: RendererMessage) {
        if msg == RendererMessage::StartRendering {
            if let Some(cancel) = &self.cancel {
                cancel.store(false, std::sync::atomic::Ordering::Relaxed);
            }
        }
        // front holds a receiver, the channel cannot be disconnected
        if self.communication_in.0.send(msg).is_err() {
            warn!("Message {msg:?} not delivered");
        }
    }

    /// Getter for report receiver
    ///
    /// One report arrives per rendered frame, the shared buffer then holds the frame.
    pub fn get_receiver(&self) -> Receiver<RenderReport> {
        self.communication_out.1.clone()
    }

    /// Receive report of the next frame
    ///
    /// Blocking call
    pub fn receive_message(&self) -> Option<RenderReport> {
        self.communication_out.1.recv().ok()
    }

    /// Getter for shared framebuffer
    /// If front is inactive, return `None`
    pub fn get_buffer_handle(&self) -> Option<Arc<Mutex<Framebuffer>>> {
        self.buffer.as_ref().cloned()
    }

    /// Getter for config handle
    /// If front is inactive, return `None`
    pub fn get_config_handle(&self) -> Option<Arc<RwLock<RenderConfig>>> {
        self.config.as_ref().cloned()
    }

    /// Interrupt the frame in progress, if any
    pub fn cancel(&self) {
        if let Some(cancel) = &self.cancel {
            cancel.store(true, std::sync::atomic::Ordering::Relaxed);
        }
    }

    /// Start `renderer`
    ///
    /// Front goes into active state.
    /// If front was already active, previous renderer gets shutdown first.
    pub fn start_rendering<R: RenderThread>(&mut self, mut renderer: R) -> Result<(), RenderError> {
        if self.handle.is_some() {
            info!("Shutting down current renderer");
            self.finish()?;
        }

        let communication = (
            self.communication_out.0.clone(),
            self.communication_in.1.clone(),
        );
        renderer.set_communication(communication);
        let buffer = renderer.get_shared_buffer();
        let config = renderer.get_config();
        let cancel = renderer.get_cancel_flag();
        let handle = renderer.start()?; // start thread but wait for StartRendering message
        self.buffer = Some(buffer);
        self.config = Some(config);
        self.cancel = Some(cancel);
        self.handle = Some(handle);
        Ok(())
    }

    /// Shut the renderer down and sync thread with parent
    ///
    /// Call is blocking until thread is joined.
    /// Front goes into inactive state.
    pub fn finish(&mut self) -> Result<(), RenderError> {
        if let Some(handle) = self.handle.take() {
            self.cancel();
            self.send_message(RendererMessage::ShutDown);
            let joined = handle.join();
            self.buffer = None;
            self.config = None;
            self.cancel = None;
            // messages and reports of the old renderer are stale
            while self.communication_in.1.try_recv().is_ok() {}
            while self.communication_out.1.try_recv().is_ok() {}
            joined.map_err(|_| RenderError::WorkerPanicked)?;
        }
        Ok(())
    }
}

impl Default for RendererFront {
    fn default() -> Self {
        Self::new()
    }
}
