use crate::color::{self, RGB};

/// Colors of voxel labels.
///
/// Label 0 means "not labelled" and takes the unindexed color, label 1 is white,
/// other labels are spread over the hue spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    unindexed: RGB,
}

impl Palette {
    pub fn new(unindexed: RGB) -> Palette {
        Palette { unindexed }
    }

    /// Unindexed color is gray of `level` (0-255)
    pub fn gray(level: f32) -> Palette {
        Palette::new(color::mono(level))
    }

    pub fn unindexed(&self) -> RGB {
        self.unindexed
    }

    pub fn color(&self, index: u8) -> RGB {
        match index {
            0 => self.unindexed,
            1 => color::white(),
            i => color::from_hsb(i as f32 / 256.0, 1.0, 1.0),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::gray(255.0)
    }
}
