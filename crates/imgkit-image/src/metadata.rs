use serde::{Deserialize, Serialize};

use crate::image::{Image, ImageDtype};

/// Summary of an image buffer: how many samples it holds, its shape and its sample type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Number of samples, `height * width * channels`.
    pub pixels_number: usize,
    /// Buffer shape as `[height, width, channels]`.
    pub structure: [usize; 3],
    /// Name of the sample type, e.g. `uint8`.
    pub data_type: String,
}

/// Collect the [`ImageMetadata`] of an image.
///
/// # Example
///
/// ```
/// use imgkit_image::{metadata, Image, ImageSize};
///
/// let image = Image::<u8, 3>::from_size_val(ImageSize { width: 4, height: 2 }, 0).unwrap();
/// let info = metadata(&image);
///
/// assert_eq!(info.pixels_number, 24);
/// assert_eq!(info.structure, [2, 4, 3]);
/// assert_eq!(info.data_type, "uint8");
/// ```
pub fn metadata<T: ImageDtype, const C: usize>(image: &Image<T, C>) -> ImageMetadata {
    ImageMetadata {
        pixels_number: image.numel(),
        structure: image.shape(),
        data_type: T::NAME.to_string(),
    }
}
