// THEORY:
// The statistics module summarizes a whole image into the single number the
// concentration table is calibrated against.
//
// The statistic is the mean of the *red* channel only. It is read on an image that
// has already been converted to gray, where R = G = B, so on the intended input it
// equals the mean gray level. On a color image it is the red mean, not a luminance
// mean, and the calibration values in `concentration` depend on that definition.

pub mod statistics {
    use crate::core_modules::raster::raster::Image;
    use crate::error::{AssayError, Result};

    /// Mean red-channel value of `image`, truncated toward zero.
    ///
    /// Fails with `InvalidArgument` on a zero-area image.
    pub fn mean_red_channel(image: &Image) -> Result<u32> {
        let num_pixels = image.pixel_count() as u64;
        if num_pixels == 0 {
            return Err(AssayError::InvalidArgument(format!(
                "mean of a {}x{} image is undefined",
                image.width(),
                image.height()
            )));
        }

        // u64 holds 255 per pixel for any image that fits in memory.
        let total: u64 = image.pixels().iter().map(|p| p.red as u64).sum();

        Ok((total / num_pixels) as u32)
    }
}
