use crate::{classify::ColorKind, color};

#[derive(Debug, Clone, PartialEq)]
pub enum FramePixels {
    Gray(Vec<u8>),
    /// `0x00RRGGBB`
    Rgb(Vec<u32>),
}

/// Output image of a pass, rows from top to bottom
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: FramePixels,
}

impl Framebuffer {
    /// Black image
    pub fn new(width: usize, height: usize, kind: ColorKind) -> Framebuffer {
        let len = width * height;
        let pixels = match kind {
            ColorKind::Grayscale => FramePixels::Gray(vec![0; len]),
            ColorKind::Rgb => FramePixels::Rgb(vec![0; len]),
        };
        Framebuffer {
            width,
            height,
            pixels,
        }
    }

    pub fn from_pixels(width: usize, height: usize, pixels: FramePixels) -> Framebuffer {
        Framebuffer {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn kind(&self) -> ColorKind {
        match self.pixels {
            FramePixels::Gray(_) => ColorKind::Grayscale,
            FramePixels::Rgb(_) => ColorKind::Rgb,
        }
    }

    pub fn pixels(&self) -> &FramePixels {
        &self.pixels
    }

    /// Pixel as `0x00RRGGBB`, gray expanded to all channels
    pub fn get_rgb(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y * self.width + x;
        match &self.pixels {
            FramePixels::Gray(px) => px.get(i).map(|&g| {
                let g = g as u32;
                g << 16 | g << 8 | g
            }),
            FramePixels::Rgb(px) => px.get(i).copied(),
        }
    }

    /// Interleaved `r, g, b` bytes, 3 per pixel
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        match &self.pixels {
            FramePixels::Gray(px) => px.iter().flat_map(|&g| [g, g, g]).collect(),
            FramePixels::Rgb(px) => px
                .iter()
                .flat_map(|&p| {
                    let c = color::unpack(p);
                    [c.x as u8, c.y as u8, c.z as u8]
                })
                .collect(),
        }
    }

    /// Largest per channel difference, `None` if sizes differ
    pub fn max_difference(&self, other: &Framebuffer) -> Option<u8> {
        if self.width != other.width || self.height != other.height {
            return None;
        }
        self.to_rgb_bytes()
            .iter()
            .zip(other.to_rgb_bytes().iter())
            .map(|(a, b)| a.abs_diff(*b))
            .max()
            .or(Some(0))
    }
}
