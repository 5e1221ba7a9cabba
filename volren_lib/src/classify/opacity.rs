use log::{debug, warn};

use crate::{common::ValueRange, RenderError};

/// Number of entries of an opacity table, the key is 16 bits wide
pub const TABLE_SIZE: usize = 1 << 16;

/// Gradient magnitude covered by one quantization level
pub const GRADIENT_STEP: f32 = 1.0;

/// Gradient tent opacity.
///
/// `dfxi` is the gradient magnitude, the tent is centered on `threshold`
/// and its half width grows with the gradient: `width * dfxi`.
pub fn opacity_compute(dfxi: f32, intensity: f32, threshold: f32, width: f32) -> f32 {
    if dfxi == 0.0 && intensity == threshold {
        return 1.0;
    }
    if dfxi > 0.0 {
        let half = width * dfxi;
        if intensity >= threshold - half && intensity <= threshold + half {
            return 1.0 - (1.0 / width) * ((threshold - intensity).abs() / dfxi);
        }
    }
    0.0
}

/// Opacity lookup keyed by quantized gradient magnitude and intensity.
///
/// Key layout: `gradient_level << intensity_bits | intensity_level`.
#[derive(Debug, Clone, PartialEq)]
pub struct OpacityTable {
    entries: Vec<f32>,
    intensity_bits: u32,
    range: ValueRange,
}

impl OpacityTable {
    /// Table of [`opacity_compute`] over the whole key space.
    ///
    /// At gradient level 0 the intensity level holding `threshold` evaluates at
    /// exactly `threshold`, so a flat region at the threshold value is fully opaque.
    /// Other gradient levels use the level's own intensity.
    pub fn tent(
        threshold: f32,
        width: f32,
        range: ValueRange,
        intensity_bits: u32,
    ) -> Result<OpacityTable, RenderError> {
        if !(width > 0.0 && width.is_finite()) {
            return Err(RenderError::InvalidConfig(format!(
                "tent width must be positive, got {width}"
            )));
        }
        if !(1..=15).contains(&intensity_bits) {
            return Err(RenderError::InvalidConfig(format!(
                "intensity bits must be in 1..=15, got {intensity_bits}"
            )));
        }
        if range.is_empty() || !range.span().is_finite() {
            return Err(RenderError::InvalidConfig(
                "intensity range is empty".to_string(),
            ));
        }

        let mut table = OpacityTable {
            entries: vec![0.0; TABLE_SIZE],
            intensity_bits,
            range,
        };

        let threshold_level = table.intensity_level(threshold);
        let levels = 1 << intensity_bits;

        for key in 0..TABLE_SIZE {
            let q_int = key & (levels - 1);
            let q_grad = key >> intensity_bits;
            let intensity = if q_grad == 0 && q_int == threshold_level {
                threshold
            } else {
                table.intensity_value(q_int)
            };
            let dfxi = q_grad as f32 * GRADIENT_STEP;
            table.entries[key] = opacity_compute(dfxi, intensity, threshold, width);
        }

        debug!(
            "Opacity table: threshold {threshold} width {width} range {}..{} intensity bits {intensity_bits}",
            range.low, range.high
        );

        Ok(table)
    }

    /// Table with every entry corrected for `ratio` samples per unit of distance
    pub fn corrected(&self, ratio: f32) -> OpacityTable {
        if !(ratio > 0.0 && ratio.is_finite()) {
            warn!("Ignoring oversampling ratio {ratio}");
            return self.clone();
        }
        let entries = self
            .entries
            .iter()
            .map(|&o| 1.0 - (1.0 - o).powf(ratio))
            .collect();
        OpacityTable {
            entries,
            intensity_bits: self.intensity_bits,
            range: self.range,
        }
    }

    fn max_intensity_level(&self) -> usize {
        (1 << self.intensity_bits) - 1
    }

    fn max_gradient_level(&self) -> usize {
        (1 << (16 - self.intensity_bits)) - 1
    }

    fn intensity_level(&self, intensity: f32) -> usize {
        let span = self.range.span();
        if span == 0.0 {
            return 0;
        }
        let max = self.max_intensity_level() as f32;
        let level = ((intensity - self.range.low) * max / span).round();
        level.clamp(0.0, max) as usize
    }

    fn intensity_value(&self, level: usize) -> f32 {
        let max = self.max_intensity_level() as f32;
        self.range.low + (level as f32 * self.range.span()) / max
    }

    fn gradient_level(&self, magnitude: f32) -> usize {
        let max = self.max_gradient_level() as f32;
        let level = (magnitude / GRADIENT_STEP).round();
        // NaN clamps to NaN and casts to 0
        level.clamp(0.0, max) as usize
    }

    pub fn key(&self, intensity: f32, gradient_magnitude: f32) -> usize {
        self.gradient_level(gradient_magnitude) << self.intensity_bits
            | self.intensity_level(intensity)
    }

    pub fn entry(&self, key: usize) -> f32 {
        self.entries.get(key).copied().unwrap_or(0.0)
    }

    pub fn lookup(&self, intensity: f32, gradient_magnitude: f32) -> f32 {
        self.entry(self.key(intensity, gradient_magnitude))
    }

    pub fn range(&self) -> ValueRange {
        self.range
    }

    pub fn intensity_bits(&self) -> u32 {
        self.intensity_bits
    }
}

#[cfg(test)]
mod test {

    use super::*;

    fn table() -> OpacityTable {
        OpacityTable::tent(128.0, 1.0, ValueRange::new(0.0, 255.0), 8).unwrap()
    }

    #[test]
    fn tent_function() {
        assert_eq!(opacity_compute(0.0, 100.0, 100.0, 2.0), 1.0);
        assert_eq!(opacity_compute(0.0, 101.0, 100.0, 2.0), 0.0);
        assert_eq!(opacity_compute(10.0, 100.0, 100.0, 2.0), 1.0);
        assert_eq!(opacity_compute(10.0, 110.0, 100.0, 2.0), 0.5);
        assert_eq!(opacity_compute(10.0, 90.0, 100.0, 2.0), 0.5);
        assert_eq!(opacity_compute(10.0, 121.0, 100.0, 2.0), 0.0);
        assert_eq!(opacity_compute(-1.0, 100.0, 100.0, 2.0), 0.0);
    }

    #[test]
    fn flat_threshold_is_opaque() {
        let t = table();
        assert_eq!(t.lookup(128.0, 0.0), 1.0);
        assert_eq!(t.lookup(127.0, 0.0), 0.0);

        let corrected = t.corrected(0.37);
        assert_eq!(corrected.lookup(128.0, 0.0), 1.0);
        assert_eq!(corrected.lookup(127.0, 0.0), 0.0);
    }

    #[test]
    fn threshold_level_exact_only_when_flat() {
        // one intensity level spans ~3.9 values
        let t = OpacityTable::tent(500.0, 1.0, ValueRange::new(0.0, 1000.0), 8).unwrap();
        assert_eq!(t.key(502.0, 1.0) & 0xff, t.key(500.0, 0.0) & 0xff);

        assert_eq!(t.lookup(500.0, 0.0), 1.0);
        // level value ~501.96 is outside a tent of half width 1
        assert_eq!(t.lookup(502.0, 1.0), 0.0);
        let wide = t.lookup(502.0, 4.0);
        assert!(wide > 0.4 && wide < 0.6, "{wide}");
    }

    #[test]
    fn outside_tent_is_transparent() {
        let t = table();
        for (intensity, dfxi) in [(140.0, 5.0), (100.0, 20.0), (0.0, 1.0), (255.0, 100.0)] {
            assert!((intensity - 128.0f32).abs() > dfxi);
            assert_eq!(t.lookup(intensity, dfxi), 0.0);
            assert_eq!(t.corrected(2.5).lookup(intensity, dfxi), 0.0);
        }
    }

    #[test]
    fn key_layout() {
        let t = table();
        assert_eq!(t.key(0.0, 0.0), 0);
        assert_eq!(t.key(255.0, 0.0), 255);
        assert_eq!(t.key(255.0, 1.0), 256 + 255);
        assert_eq!(t.key(1000.0, 1e9), TABLE_SIZE - 1);
        assert_eq!(t.key(f32::NAN, f32::NAN), t.key(0.0, 0.0));
    }

    #[test]
    fn correction() {
        let t = table();
        let key = t.key(132.0, 8.0);
        let o = t.entry(key);
        assert_eq!(o, 0.5);

        assert_eq!(t.corrected(1.0).entry(key), o);
        assert!((t.corrected(2.0).entry(key) - 0.75).abs() < 1e-6);
        assert!(t.corrected(0.5).entry(key) < o);
    }

    #[test]
    fn invalid_parameters() {
        let range = ValueRange::new(0.0, 255.0);
        assert!(OpacityTable::tent(10.0, 0.0, range, 8).is_err());
        assert!(OpacityTable::tent(10.0, 1.0, range, 0).is_err());
        assert!(OpacityTable::tent(10.0, 1.0, range, 16).is_err());
        assert!(OpacityTable::tent(10.0, 1.0, ValueRange::empty(), 8).is_err());
    }
}
