use crate::parallel;
use imgkit_image::{Image, ImageDtype, ImageError};

/// Define the RGB weights for the grayscale conversion.
const RW: f32 = 0.299;
const GW: f32 = 0.587;
const BW: f32 = 0.114;

/// Convert an RGB image to grayscale using the formula:
///
/// Y = 0.299 * R + 0.587 * G + 0.114 * B
///
/// # Arguments
///
/// * `src` - The input RGB image.
/// * `dst` - The output grayscale image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::color::gray_from_rgb;
///
/// let image = Image::<f32, 3>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0f32; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let mut gray = Image::<f32, 1>::from_size_val(image.size(), 0.0).unwrap();
///
/// gray_from_rgb(&image, &mut gray).unwrap();
/// assert_eq!(gray.num_channels(), 1);
/// assert_eq!(gray.size().width, 4);
/// assert_eq!(gray.size().height, 5);
/// ```
pub fn gray_from_rgb<T: ImageDtype>(
    src: &Image<T, 3>,
    dst: &mut Image<T, 1>,
) -> Result<(), ImageError> {
    weighted_gray(src, dst, [RW, GW, BW])
}

/// Convert a BGR image to grayscale.
///
/// Same weights as [`gray_from_rgb`] applied to the reversed channel order, for
/// buffers coming from BGR-ordered sources.
pub fn gray_from_bgr<T: ImageDtype>(
    src: &Image<T, 3>,
    dst: &mut Image<T, 1>,
) -> Result<(), ImageError> {
    weighted_gray(src, dst, [BW, GW, RW])
}

fn weighted_gray<T: ImageDtype>(
    src: &Image<T, 3>,
    dst: &mut Image<T, 1>,
    weights: [f32; 3],
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // parallelize the grayscale conversion by rows
    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let y = weights[0] * src_pixel[0].to_f32()
            + weights[1] * src_pixel[1].to_f32()
            + weights[2] * src_pixel[2].to_f32();
        dst_pixel[0] = T::from_f32(y);
    });

    Ok(())
}
