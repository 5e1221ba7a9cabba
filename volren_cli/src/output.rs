//! PNG files, written with `lodepng`

use std::path::{Path, PathBuf};

use log::info;
use volren_lib::render::Framebuffer;

use crate::CliResult;

/// Encode `frame` as 8 bit RGB
pub fn write_png(frame: &Framebuffer, path: &Path) -> CliResult<()> {
    let buffer = frame.to_rgb_bytes();
    lodepng::encode24_file(path, &buffer, frame.width(), frame.height())
        .map_err(|e| format!("cannot write {}: {e}", path.display()))?;
    info!("Saved {}", path.display());
    Ok(())
}

/// `dir/name.png` becomes `dir/name_007.png` for frame 7
pub fn frame_path(base: &Path, frame: usize) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".into());
    let extension = base
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".into());
    base.with_file_name(format!("{stem}_{frame:03}.{extension}"))
}

#[cfg(test)]
mod test {
    use volren_lib::classify::ColorKind;

    use super::*;

    #[test]
    fn numbered_frames() {
        assert_eq!(frame_path(Path::new("out/spin.png"), 7), PathBuf::from("out/spin_007.png"));
        assert_eq!(frame_path(Path::new("spin"), 12), PathBuf::from("spin_012.png"));
    }

    #[test]
    fn png_is_written() {
        let path = std::env::temp_dir().join(format!("volren_png_{}.png", std::process::id()));
        let frame = Framebuffer::new(8, 4, ColorKind::Grayscale);

        write_png(&frame, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(&bytes[1..4], b"PNG");
    }
}
