use nalgebra::{vector, Vector3};

/// Color channels, each in range <0;255>
pub type RGB = Vector3<f32>;

pub fn new(r: f32, g: f32, b: f32) -> RGB {
    vector![r, g, b]
}

pub fn zero() -> RGB {
    vector![0.0, 0.0, 0.0]
}

pub fn mono(v: f32) -> RGB {
    vector![v, v, v]
}

pub fn white() -> RGB {
    mono(255.0)
}

/// Color from hue, saturation and brightness, all in range <0;1>.
/// Hue wraps around.
pub fn from_hsb(hue: f32, saturation: f32, brightness: f32) -> RGB {
    if saturation <= 0.0 {
        return mono(brightness * 255.0);
    }

    let h = (hue - hue.floor()) * 6.0;
    let sector = h.floor();
    let f = h - sector;

    let p = brightness * (1.0 - saturation);
    let q = brightness * (1.0 - saturation * f);
    let t = brightness * (1.0 - saturation * (1.0 - f));

    let (r, g, b) = match sector as u8 {
        0 => (brightness, t, p),
        1 => (q, brightness, p),
        2 => (p, brightness, t),
        3 => (p, q, brightness),
        4 => (t, p, brightness),
        _ => (brightness, p, q),
    };

    vector![r, g, b] * 255.0
}

/// Inverse of [`from_hsb`], returns `(hue, saturation, brightness)`
pub fn to_hsb(color: &RGB) -> (f32, f32, f32) {
    let max = color.max();
    let min = color.min();
    let delta = max - min;

    let brightness = max / 255.0;
    let saturation = if max > 0.0 { delta / max } else { 0.0 };

    if saturation == 0.0 {
        return (0.0, 0.0, brightness);
    }

    let sector = if color.x == max {
        (color.y - color.z) / delta
    } else if color.y == max {
        2.0 + (color.z - color.x) / delta
    } else {
        4.0 + (color.x - color.y) / delta
    };

    let mut hue = sector / 6.0;
    if hue < 0.0 {
        hue += 1.0;
    }

    (hue, saturation, brightness)
}

fn channel(v: f32) -> u32 {
    v.clamp(0.0, 255.0).round() as u32
}

/// Pack into `0x00RRGGBB`
pub fn pack(color: &RGB) -> u32 {
    (channel(color.x) << 16) | (channel(color.y) << 8) | channel(color.z)
}

pub fn unpack(packed: u32) -> RGB {
    vector![
        ((packed >> 16) & 0xff) as f32,
        ((packed >> 8) & 0xff) as f32,
        (packed & 0xff) as f32
    ]
}
