//! PNG export of a raster (feature `png`).

use driftfield_core::{DriftError, Raster};
use std::path::Path;

/// Writes the raster to `path` as an RGBA PNG.
pub fn write_png(raster: &Raster, path: impl AsRef<Path>) -> Result<(), DriftError> {
    let image = image::RgbaImage::from_raw(
        raster.width() as u32,
        raster.height() as u32,
        raster.data().to_vec(),
    )
    .ok_or_else(|| DriftError::Io("raster byte length does not match its dimensions".into()))?;
    image
        .save_with_format(path.as_ref(), image::ImageFormat::Png)
        .map_err(|e| DriftError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_a_readable_png() {
        let mut raster = Raster::filled(6, 4, [10, 20, 30, 255]).unwrap();
        raster.set(2, 1, [200, 100, 50, 255]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        write_png(&raster, &path).unwrap();

        let loaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(loaded.width(), 6);
        assert_eq!(loaded.height(), 4);
        assert_eq!(loaded.get_pixel(2, 1).0, [200, 100, 50, 255]);
        assert_eq!(loaded.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn unwritable_path_reports_io_error() {
        let raster = Raster::new(2, 2).unwrap();
        let err = write_png(&raster, "/nonexistent-dir/frame.png").unwrap_err();
        assert!(matches!(err, DriftError::Io(_)));
    }
}
