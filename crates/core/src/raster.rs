//! Interleaved RGBA8 pixel buffer with toroidal coordinate wrapping.
//!
//! A `Raster` stores `width * height * 4` bytes in row-major order, four
//! channels per pixel (R, G, B, A). Signed coordinate access wraps around
//! both axes, so negative and overflowing indices are valid — the advection
//! pass relies on this for its wrapped source lookups.

use crate::error::DriftError;

/// Number of interleaved channels per pixel.
pub const CHANNELS: usize = 4;

/// An RGBA8 pixel buffer with toroidal coordinate wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Raster {
    /// Creates a transparent-black raster of the given dimensions.
    ///
    /// Returns `DriftError::InvalidDimensions` if either dimension is zero
    /// or the byte count overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, DriftError> {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Creates a raster filled with a single RGBA pixel value.
    ///
    /// Returns `DriftError::InvalidDimensions` if either dimension is zero
    /// or the byte count overflows `usize`.
    pub fn filled(width: usize, height: usize, pixel: [u8; 4]) -> Result<Self, DriftError> {
        let len = checked_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..width * height {
            data.extend_from_slice(&pixel);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates a raster from a pre-built byte vector, validating that
    /// `data.len() == width * height * 4`.
    pub fn from_data(width: usize, height: usize, data: Vec<u8>) -> Result<Self, DriftError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(DriftError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: data.len() / CHANNELS,
                rhs_h: 1,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Raster width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Raster height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the interleaved byte data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the interleaved byte data.
    ///
    /// The advection hot path writes through this to avoid per-pixel
    /// bounds arithmetic.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Converts signed coordinates to a byte offset using toroidal wrapping.
    fn offset(&self, x: isize, y: isize) -> usize {
        let xi = x.rem_euclid(self.width as isize) as usize;
        let yi = y.rem_euclid(self.height as isize) as usize;
        (yi * self.width + xi) * CHANNELS
    }

    /// Reads the RGBA pixel at `(x, y)` with toroidal wrapping.
    pub fn get(&self, x: isize, y: isize) -> [u8; 4] {
        let o = self.offset(x, y);
        [
            self.data[o],
            self.data[o + 1],
            self.data[o + 2],
            self.data[o + 3],
        ]
    }

    /// Writes the RGBA pixel at `(x, y)` with toroidal wrapping.
    pub fn set(&mut self, x: isize, y: isize, pixel: [u8; 4]) {
        let o = self.offset(x, y);
        self.data[o..o + CHANNELS].copy_from_slice(&pixel);
    }

    /// Overwrites every pixel with `pixel`.
    pub fn fill(&mut self, pixel: [u8; 4]) {
        for chunk in self.data.chunks_exact_mut(CHANNELS) {
            chunk.copy_from_slice(&pixel);
        }
    }
}

fn checked_len(width: usize, height: usize) -> Result<usize, DriftError> {
    if width == 0 || height == 0 {
        return Err(DriftError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(DriftError::InvalidDimensions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_transparent_buffer() {
        let r = Raster::new(4, 3).unwrap();
        assert_eq!(r.width(), 4);
        assert_eq!(r.height(), 3);
        assert_eq!(r.data().len(), 4 * 3 * CHANNELS);
        assert!(r.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(Raster::new(0, 5).is_err());
        assert!(Raster::new(5, 0).is_err());
        assert!(Raster::filled(0, 0, [1, 2, 3, 4]).is_err());
    }

    #[test]
    fn overflow_dimensions_are_rejected() {
        assert!(Raster::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn filled_repeats_the_pixel() {
        let r = Raster::filled(2, 2, [10, 20, 30, 255]).unwrap();
        for chunk in r.data().chunks_exact(CHANNELS) {
            assert_eq!(chunk, &[10, 20, 30, 255]);
        }
    }

    #[test]
    fn get_after_set_round_trips() {
        let mut r = Raster::new(5, 5).unwrap();
        r.set(2, 3, [1, 2, 3, 4]);
        assert_eq!(r.get(2, 3), [1, 2, 3, 4]);
    }

    #[test]
    fn negative_coordinates_wrap_to_far_edge() {
        // Offset (-1, -1) from (0, 0) on a 10x10 buffer lands on (9, 9).
        let mut r = Raster::new(10, 10).unwrap();
        r.set(9, 9, [7, 7, 7, 7]);
        assert_eq!(r.get(-1, -1), [7, 7, 7, 7]);
    }

    #[test]
    fn overflowing_coordinates_wrap_to_near_edge() {
        let mut r = Raster::new(4, 4).unwrap();
        r.set(1, 2, [9, 9, 9, 9]);
        assert_eq!(r.get(5, 6), [9, 9, 9, 9]);
        assert_eq!(r.get(-3, -2), [9, 9, 9, 9]);
    }

    #[test]
    fn from_data_validates_length() {
        assert!(Raster::from_data(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            Raster::from_data(2, 2, vec![0; 15]),
            Err(DriftError::DimensionMismatch { .. })
        ));
        assert!(Raster::from_data(0, 2, vec![]).is_err());
    }

    #[test]
    fn fill_overwrites_every_pixel() {
        let mut r = Raster::new(3, 3).unwrap();
        r.fill([5, 6, 7, 8]);
        for chunk in r.data().chunks_exact(CHANNELS) {
            assert_eq!(chunk, &[5, 6, 7, 8]);
        }
    }

    #[test]
    fn clone_is_independent() {
        let mut a = Raster::new(2, 2).unwrap();
        a.set(0, 0, [1, 1, 1, 1]);
        let b = a.clone();
        a.set(0, 0, [2, 2, 2, 2]);
        assert_eq!(b.get(0, 0), [1, 1, 1, 1]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn dimension() -> impl Strategy<Value = usize> {
            1_usize..=32
        }

        proptest! {
            #[test]
            fn toroidal_equivalence(
                w in dimension(),
                h in dimension(),
                x in -200_isize..200,
                y in -200_isize..200,
                px: [u8; 4],
            ) {
                let mut r = Raster::new(w, h).unwrap();
                r.set(x, y, px);
                prop_assert_eq!(r.get(x, y), px);
                prop_assert_eq!(r.get(x + w as isize, y + h as isize), px);
                prop_assert_eq!(r.get(x - w as isize, y - h as isize), px);
            }
        }
    }
}
