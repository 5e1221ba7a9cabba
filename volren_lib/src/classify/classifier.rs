//! Classification of interpolated samples into opacity and color.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    color::{self, RGB},
    common::ValueRange,
    volumetric::{Gradient, VoxelKind, VoxelValue},
    RenderError,
};

use super::{OpacityTable, Palette};

/// Output color model of a classifier or shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorKind {
    Grayscale,
    Rgb,
}

/// Opacity in <0;1> and color with channels in <0;255>.
/// Grayscale classifiers return equal channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedSample {
    pub opacity: f32,
    pub color: RGB,
}

pub trait Classifier: Send + Sync {
    fn kind(&self) -> ColorKind;

    /// Classification depends on voxel labels
    fn does_index(&self) -> bool {
        false
    }

    /// Cheap test done before the gradient is computed.
    /// An invisible sample is skipped without further work.
    fn visible(&self, _value: &VoxelValue) -> bool {
        true
    }

    fn alpha_color(&self, value: &VoxelValue, gradient: &Gradient) -> ClassifiedSample;

    /// Copy prepared for rays sampled `oversampling` times per unit of distance
    fn for_view(&self, oversampling: f32) -> Self
    where
        Self: Sized;

    /// Whether volumes of `kind` carry what this classifier reads
    fn accepts(&self, _kind: VoxelKind) -> bool {
        true
    }

    /// Value separating transparent from opaque voxels, if there is a single one.
    /// Renderers may then visit only cells straddling it.
    fn surface_threshold(&self) -> Option<f32> {
        None
    }

    fn get_name(&self) -> &str;
}

/// Gradient tent over the intensity, one color for every voxel
#[derive(Debug, Clone)]
pub struct TentClassifier {
    table: OpacityTable,
    palette: Palette,
}

impl TentClassifier {
    pub fn new(table: OpacityTable, palette: Palette) -> TentClassifier {
        TentClassifier { table, palette }
    }
}

impl Classifier for TentClassifier {
    fn kind(&self) -> ColorKind {
        ColorKind::Grayscale
    }

    fn alpha_color(&self, value: &VoxelValue, gradient: &Gradient) -> ClassifiedSample {
        ClassifiedSample {
            opacity: self.table.lookup(value.value, gradient.average_magnitude()),
            color: self.palette.unindexed(),
        }
    }

    fn for_view(&self, oversampling: f32) -> Self {
        TentClassifier {
            table: self.table.corrected(oversampling),
            palette: self.palette,
        }
    }

    fn get_name(&self) -> &str {
        "TentClassifier"
    }
}

/// Gradient tent over the intensity, colored and culled by voxel label
#[derive(Debug, Clone)]
pub struct IndexedTentClassifier {
    table: OpacityTable,
    palette: Palette,
    visible: [bool; 256],
}

impl IndexedTentClassifier {
    pub fn new(table: OpacityTable, palette: Palette) -> IndexedTentClassifier {
        IndexedTentClassifier {
            table,
            palette,
            visible: [true; 256],
        }
    }

    pub fn hide(&mut self, index: u8) {
        self.visible[index as usize] = false;
    }

    pub fn show(&mut self, index: u8) {
        self.visible[index as usize] = true;
    }
}

impl Classifier for IndexedTentClassifier {
    fn kind(&self) -> ColorKind {
        ColorKind::Rgb
    }

    fn does_index(&self) -> bool {
        true
    }

    fn visible(&self, value: &VoxelValue) -> bool {
        self.visible[value.index as usize]
    }

    fn alpha_color(&self, value: &VoxelValue, gradient: &Gradient) -> ClassifiedSample {
        ClassifiedSample {
            opacity: self.table.lookup(value.value, gradient.average_magnitude()),
            color: self.palette.color(value.index),
        }
    }

    fn for_view(&self, oversampling: f32) -> Self {
        IndexedTentClassifier {
            table: self.table.corrected(oversampling),
            palette: self.palette,
            visible: self.visible,
        }
    }

    fn accepts(&self, kind: VoxelKind) -> bool {
        kind == VoxelKind::Indexed
    }

    fn get_name(&self) -> &str {
        "IndexedTentClassifier"
    }
}

/// Opaque at and above the threshold, transparent below
#[derive(Debug, Clone, Copy)]
pub struct IsosurfaceClassifier {
    threshold: f32,
    palette: Palette,
}

impl IsosurfaceClassifier {
    pub fn new(threshold: f32, palette: Palette) -> IsosurfaceClassifier {
        IsosurfaceClassifier { threshold, palette }
    }
}

impl Classifier for IsosurfaceClassifier {
    fn kind(&self) -> ColorKind {
        ColorKind::Grayscale
    }

    fn alpha_color(&self, value: &VoxelValue, _gradient: &Gradient) -> ClassifiedSample {
        let opacity = if value.value >= self.threshold { 1.0 } else { 0.0 };
        ClassifiedSample {
            opacity,
            color: self.palette.unindexed(),
        }
    }

    // 0 and 1 are fixed points of the correction
    fn for_view(&self, _oversampling: f32) -> Self {
        *self
    }

    fn surface_threshold(&self) -> Option<f32> {
        Some(self.threshold)
    }

    fn get_name(&self) -> &str {
        "IsosurfaceClassifier"
    }
}

/// Hue and saturation of the voxel at full brightness, opacity from the tent table
/// keyed by brightness and the average gradient of the channels
#[derive(Debug, Clone)]
pub struct RgbClassifier {
    table: OpacityTable,
}

impl RgbClassifier {
    pub fn new(table: OpacityTable) -> RgbClassifier {
        RgbClassifier { table }
    }
}

impl Classifier for RgbClassifier {
    fn kind(&self) -> ColorKind {
        ColorKind::Rgb
    }

    fn alpha_color(&self, value: &VoxelValue, gradient: &Gradient) -> ClassifiedSample {
        let rgb = value.rgb.unwrap_or_else(|| color::mono(value.value));
        let (hue, saturation, _) = color::to_hsb(&rgb);
        ClassifiedSample {
            opacity: self.table.lookup(value.value, gradient.average_magnitude()),
            color: color::from_hsb(hue, saturation, 1.0),
        }
    }

    fn for_view(&self, oversampling: f32) -> Self {
        RgbClassifier {
            table: self.table.corrected(oversampling),
        }
    }

    fn accepts(&self, kind: VoxelKind) -> bool {
        kind == VoxelKind::Rgb
    }

    fn get_name(&self) -> &str {
        "RgbClassifier"
    }
}

/// Closed set of classifiers, built from [`ClassifierConfig`]
#[derive(Debug, Clone)]
pub enum AnyClassifier {
    Tent(TentClassifier),
    IndexedTent(IndexedTentClassifier),
    Isosurface(IsosurfaceClassifier),
    Rgb(RgbClassifier),
}

macro_rules! dispatch {
    ($self:ident, $c:ident => $body:expr) => {
        match $self {
            AnyClassifier::Tent($c) => $body,
            AnyClassifier::IndexedTent($c) => $body,
            AnyClassifier::Isosurface($c) => $body,
            AnyClassifier::Rgb($c) => $body,
        }
    };
}

impl Classifier for AnyClassifier {
    fn kind(&self) -> ColorKind {
        dispatch!(self, c => c.kind())
    }

    fn does_index(&self) -> bool {
        dispatch!(self, c => c.does_index())
    }

    fn visible(&self, value: &VoxelValue) -> bool {
        dispatch!(self, c => c.visible(value))
    }

    fn alpha_color(&self, value: &VoxelValue, gradient: &Gradient) -> ClassifiedSample {
        dispatch!(self, c => c.alpha_color(value, gradient))
    }

    fn for_view(&self, oversampling: f32) -> Self {
        match self {
            AnyClassifier::Tent(c) => AnyClassifier::Tent(c.for_view(oversampling)),
            AnyClassifier::IndexedTent(c) => AnyClassifier::IndexedTent(c.for_view(oversampling)),
            AnyClassifier::Isosurface(c) => AnyClassifier::Isosurface(c.for_view(oversampling)),
            AnyClassifier::Rgb(c) => AnyClassifier::Rgb(c.for_view(oversampling)),
        }
    }

    fn accepts(&self, kind: VoxelKind) -> bool {
        dispatch!(self, c => c.accepts(kind))
    }

    fn surface_threshold(&self) -> Option<f32> {
        dispatch!(self, c => c.surface_threshold())
    }

    fn get_name(&self) -> &str {
        dispatch!(self, c => c.get_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    #[default]
    Tent,
    IndexedTent,
    Isosurface,
    Rgb,
}

/// Serializable description of a classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub kind: ClassifierKind,
    /// Center of the tent, or the isosurface value
    pub threshold: f32,
    /// Tent half width per unit of gradient magnitude
    pub width: f32,
    /// Intensities mapped onto the table levels
    pub intensity_range: ValueRange,
    pub intensity_bits: u32,
    /// Gray of unlabelled voxels, 0-255
    pub gray_level: f32,
    /// Labels culled by the indexed classifier
    pub hidden_indices: Vec<u8>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            kind: ClassifierKind::Tent,
            threshold: 128.0,
            width: 1.0,
            intensity_range: ValueRange::default(),
            intensity_bits: 8,
            gray_level: 255.0,
            hidden_indices: vec![],
        }
    }
}

impl ClassifierConfig {
    pub fn build(&self) -> Result<AnyClassifier, RenderError> {
        let palette = Palette::gray(self.gray_level);
        let table = || {
            OpacityTable::tent(
                self.threshold,
                self.width,
                self.intensity_range,
                self.intensity_bits,
            )
        };

        let classifier = match self.kind {
            ClassifierKind::Tent => AnyClassifier::Tent(TentClassifier::new(table()?, palette)),
            ClassifierKind::IndexedTent => {
                let mut classifier = IndexedTentClassifier::new(table()?, palette);
                for &index in &self.hidden_indices {
                    classifier.hide(index);
                }
                AnyClassifier::IndexedTent(classifier)
            }
            ClassifierKind::Isosurface => {
                AnyClassifier::Isosurface(IsosurfaceClassifier::new(self.threshold, palette))
            }
            ClassifierKind::Rgb => AnyClassifier::Rgb(RgbClassifier::new(table()?)),
        };

        debug!("Classifier {} built", classifier.get_name());
        Ok(classifier)
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use nalgebra::vector;

    fn flat() -> Gradient {
        Gradient::zero()
    }

    #[test]
    fn tent_at_threshold() {
        let classifier = ClassifierConfig::default().build().unwrap();
        let sample = classifier.alpha_color(&VoxelValue::scalar(128.0), &flat());

        assert_eq!(classifier.kind(), ColorKind::Grayscale);
        assert_eq!(sample.opacity, 1.0);
        assert_eq!(sample.color, color::white());
        assert_eq!(classifier.alpha_color(&VoxelValue::scalar(60.0), &flat()).opacity, 0.0);
    }

    #[test]
    fn indexed_hides_labels() {
        let config = ClassifierConfig {
            kind: ClassifierKind::IndexedTent,
            hidden_indices: vec![3],
            ..Default::default()
        };
        let classifier = config.build().unwrap();

        assert!(classifier.does_index());
        assert!(classifier.visible(&VoxelValue::indexed(128.0, 2)));
        assert!(!classifier.visible(&VoxelValue::indexed(128.0, 3)));
        assert!(classifier.accepts(VoxelKind::Indexed));
        assert!(!classifier.accepts(VoxelKind::Scalar));

        let sample = classifier.alpha_color(&VoxelValue::indexed(128.0, 1), &flat());
        assert_eq!(sample.color, color::white());

        // hidden state survives the per view copy
        assert!(!classifier.for_view(0.5).visible(&VoxelValue::indexed(0.0, 3)));
    }

    #[test]
    fn isosurface() {
        let classifier = IsosurfaceClassifier::new(50.0, Palette::gray(80.0));
        let g = Gradient::scalar(vector![1.0, 0.0, 0.0]);

        assert_eq!(classifier.alpha_color(&VoxelValue::scalar(50.0), &g).opacity, 1.0);
        assert_eq!(classifier.alpha_color(&VoxelValue::scalar(49.9), &g).opacity, 0.0);
        assert_eq!(classifier.for_view(3.0).alpha_color(&VoxelValue::scalar(60.0), &g).color, color::mono(80.0));
        assert_eq!(classifier.surface_threshold(), Some(50.0));
        assert_eq!(AnyClassifier::Isosurface(classifier).surface_threshold(), Some(50.0));
        assert_eq!(ClassifierConfig::default().build().unwrap().surface_threshold(), None);
    }

    #[test]
    fn rgb_keeps_hue() {
        let config = ClassifierConfig {
            kind: ClassifierKind::Rgb,
            ..Default::default()
        };
        let classifier = config.build().unwrap();
        let value = VoxelValue::rgb(vector![0.0, 64.0, 128.0]);
        let sample = classifier.alpha_color(&value, &Gradient::rgb([vector![0.0, 0.0, 0.0]; 3]));

        assert_eq!(sample.opacity, 1.0);
        assert!((sample.color - vector![0.0, 127.5, 255.0]).norm() < 0.01);
        assert!(!classifier.accepts(VoxelKind::Scalar));
        assert!(classifier.accepts(VoxelKind::Rgb));
    }

    #[test]
    fn invalid_config_reported() {
        let config = ClassifierConfig {
            width: -1.0,
            ..Default::default()
        };
        assert!(matches!(config.build(), Err(RenderError::InvalidConfig(_))));
    }
}
