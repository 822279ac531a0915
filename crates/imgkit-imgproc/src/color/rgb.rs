use crate::parallel;
use imgkit_image::{Image, ImageError};

/// Swap the first and last channel of a three channel image.
///
/// Converts BGR ordered pixels to RGB. The operation is its own inverse, so it
/// also converts RGB to BGR.
///
/// # Arguments
///
/// * `src` - The input BGR image.
/// * `dst` - The output RGB image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::color::rgb_from_bgr;
///
/// let bgr = Image::<u8, 3>::new(ImageSize { width: 1, height: 1 }, vec![1, 2, 3]).unwrap();
/// let mut rgb = Image::<u8, 3>::from_size_val(bgr.size(), 0).unwrap();
///
/// rgb_from_bgr(&bgr, &mut rgb).unwrap();
/// assert_eq!(rgb.as_slice(), &[3, 2, 1]);
/// ```
pub fn rgb_from_bgr<T>(src: &Image<T, 3>, dst: &mut Image<T, 3>) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel
            .iter_mut()
            .zip(src_pixel.iter().rev())
            .for_each(|(d, s)| {
                *d = *s;
            });
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use imgkit_image::{Image, ImageError, ImageSize};

    #[test]
    fn rgb_from_bgr_roundtrip() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let bgr = Image::<u8, 3>::new(size, (0..12).collect())?;

        let mut rgb = Image::<u8, 3>::from_size_val(size, 0)?;
        super::rgb_from_bgr(&bgr, &mut rgb)?;
        assert_eq!(rgb.as_slice(), &[2, 1, 0, 5, 4, 3, 8, 7, 6, 11, 10, 9]);

        let mut back = Image::<u8, 3>::from_size_val(size, 0)?;
        super::rgb_from_bgr(&rgb, &mut back)?;
        assert_eq!(back, bgr);
        Ok(())
    }
}
