mod classifier;
mod opacity;
mod palette;
mod shade;

pub use classifier::{
    AnyClassifier, ClassifiedSample, Classifier, ClassifierConfig, ClassifierKind, ColorKind,
    IndexedTentClassifier, IsosurfaceClassifier, RgbClassifier, TentClassifier,
};
pub use opacity::{opacity_compute, OpacityTable, GRADIENT_STEP, TABLE_SIZE};
pub use palette::Palette;
pub use shade::{AnyShader, ColorShader, Contribution, DiffuseShader, Shade, Shader, ShadingConfig};
