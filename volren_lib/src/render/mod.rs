mod compositing;
mod framebuffer;
mod render_front;
mod render_options;
mod renderer;
mod sequence;
mod st_renderer;

pub use compositing::{PixelAccumulator, OPAQUE_THRESHOLD};
pub use framebuffer::{FramePixels, Framebuffer};
pub use render_front::{RenderReport, RenderThread, RendererFront, RendererMessage};
pub use render_options::{RenderConfig, RenderConfigBuilder, Traversal};
pub use renderer::{RenderOutcome, Renderer};
pub use sequence::{cine_configs, render_sequence, stereo_pair};
pub use st_renderer::SerialRenderer;
