use imgkit_image::{Image, ImageError, ImageSize};
use rayon::prelude::*;

/// A border type for the spatial padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddingMode {
    /// This border type fills the border with a single, constant color value.
    ///
    /// Example: ...d c b a | 0 0 0 0...
    #[default]
    Constant,

    /// This border type takes the outermost row or column of pixels and repeats it into the padded region.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,

    /// This border type reflects the pixel values at the boundary, starting with the pixel 'next' to the edge.
    ///
    /// Example: ...d c b a | b c d e...
    Reflect101,

    /// This border type reflects the pixel values at the boundary, starting with the edge pixel itself.
    ///
    /// Example: ...d c b a | a b c d...
    Reflect,

    /// This border type wraps the content from the opposite side to fill the border.
    ///
    /// Example: ...d c b a | w x y z...
    Wrap,
}

impl PaddingMode {
    #[inline]
    fn reflect(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i - 1;
            } else {
                i = 2 * len - i - 1;
            }
        }
        i as usize
    }

    #[inline]
    fn reflect101(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i;
            } else {
                i = 2 * len - i - 2;
            }
        }
        i as usize
    }

    #[inline]
    fn wrap(i: isize, len: usize) -> usize {
        ((i % len as isize + len as isize) % len as isize) as usize
    }

    /// Maps index `i` to a valid index i.e. within `[0, len)` according to the padding mode.
    ///
    /// - `Replicate`: clamp to edge
    /// - `Reflect`: mirror including edge
    /// - `Reflect101`: mirror excluding edge
    /// - `Wrap`: circular wrap
    /// - `Constant`: returns 0 (not used directly)
    ///
    /// `len` must be greater than zero.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> usize {
        match self {
            PaddingMode::Replicate => i.clamp(0, len as isize - 1) as usize,
            PaddingMode::Reflect => Self::reflect(i, len),
            PaddingMode::Reflect101 => Self::reflect101(i, len),
            PaddingMode::Wrap => Self::wrap(i, len),
            PaddingMode::Constant => 0,
        }
    }

    /// Fills the border of `new_data`, which already holds the original image in its center.
    ///
    /// [`PaddingMode::Constant`] is assumed to be already applied when initializing `new_data`.
    fn apply_padding<T: Copy + Send + Sync, const C: usize>(
        &self,
        new_data: &mut [T],
        old_size: ImageSize,
        new_size: ImageSize,
        padding: &Padding2D,
    ) {
        if let PaddingMode::Constant = self {
            return;
        }

        let Padding2D {
            top,
            bottom,
            left,
            right,
        } = *padding;
        let row_stride = new_size.width * C;

        // top
        {
            let (top_section, rest) = new_data.split_at_mut(top * row_stride);

            top_section
                .par_chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(y, dst_row)| {
                    let src_y = self.map_index(y as isize - top as isize, old_size.height);
                    dst_row.copy_from_slice(&rest[src_y * row_stride..(src_y + 1) * row_stride]);
                });
        }

        // bottom
        {
            let split_point = (new_size.height - bottom) * row_stride;
            let (rest, bottom_section) = new_data.split_at_mut(split_point);

            bottom_section
                .par_chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(idx, dst_row)| {
                    let y = new_size.height - bottom + idx;
                    let src_y = self.map_index(y as isize - top as isize, old_size.height);
                    let src_start = (src_y + top) * row_stride;
                    dst_row.copy_from_slice(&rest[src_start..src_start + row_stride]);
                });
        }

        // left and right, rows already hold their center
        new_data.par_chunks_exact_mut(row_stride).for_each(|row| {
            for x in (0..left).chain(new_size.width - right..new_size.width) {
                let src_x = self.map_index(x as isize - left as isize, old_size.width);
                let src_idx = (left + src_x) * C;
                row.copy_within(src_idx..src_idx + C, x * C);
            }
        });
    }
}

/// Represents 2D padding with top, bottom, left, and right values (in pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding2D {
    /// Amount of padding to add on the top side.
    pub top: usize,
    /// Amount of padding to add on the bottom side.
    pub bottom: usize,
    /// Amount of padding to add on the left side.
    pub left: usize,
    /// Amount of padding to add on the right side.
    pub right: usize,
}

impl Padding2D {
    /// The same padding on all four sides.
    pub fn uniform(pad: usize) -> Self {
        Self {
            top: pad,
            bottom: pad,
            left: pad,
            right: pad,
        }
    }

    /// Size of an image of `size` once this padding is applied.
    pub fn padded_size(&self, size: ImageSize) -> ImageSize {
        ImageSize {
            width: size.width + self.left + self.right,
            height: size.height + self.top + self.bottom,
        }
    }

    /// Validates that a new image size correctly matches the expected dimensions
    /// after applying this padding to an existing image.
    ///
    /// # Example
    /// ```rust
    /// use imgkit_image::ImageSize;
    /// use imgkit_imgproc::padding::Padding2D;
    /// let padding = Padding2D { top: 1, bottom: 1, left: 2, right: 2 };
    /// let old_size = ImageSize { width: 4, height: 4 };
    /// let new_size = ImageSize { width: 8, height: 6 };
    ///
    /// assert!(padding.validate_size(old_size, new_size));
    /// ```
    pub fn validate_size(&self, old_size: ImageSize, new_size: ImageSize) -> bool {
        self.padded_size(old_size) == new_size
    }
}

/// Pads `src` into `dst`, centering the original image and filling the border
/// according to `padding_mode`.
///
/// # Arguments
///
/// * `src` - The source image to pad.
/// * `dst` - The destination image where the padded output will be stored.
/// * `padding` - The amount of padding (in pixels) for all four sides.
/// * `padding_mode` - The type of border handling to use.
/// * `constant_value` - The pixel value used for constant padding, one value per channel.
///
/// # Errors
///
/// Returns an error if the size of `dst` does not match the padded size of `src`,
/// or if a non constant mode is requested for an empty image.
///
/// # Example
///
/// ```rust
/// use imgkit_image::{ImageSize, Image};
/// use imgkit_imgproc::padding::{PaddingMode, Padding2D, spatial_padding};
///
/// let src = Image::<u8, 3>::new(ImageSize { width: 2, height: 2 }, vec![1u8; 2 * 2 * 3]).unwrap();
/// let mut dst = Image::<u8, 3>::new(ImageSize { width: 4, height: 4 }, vec![0u8; 4 * 4 * 3]).unwrap();
///
/// spatial_padding(&src, &mut dst, Padding2D::uniform(1), PaddingMode::Constant, [0u8; 3]).unwrap();
///
/// assert_eq!(dst.size().width, 4);
/// assert_eq!(dst.size().height, 4);
/// ```
pub fn spatial_padding<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    padding: Padding2D,
    padding_mode: PaddingMode,
    constant_value: [T; C],
) -> Result<(), ImageError>
where
    T: Copy + Default + Send + Sync,
{
    if !padding.validate_size(src.size(), dst.size()) {
        let expected = padding.padded_size(src.size());
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            expected.width,
            expected.height,
        ));
    }

    if padding_mode != PaddingMode::Constant && src.numel() == 0 {
        return Err(ImageError::InvalidArgument(format!(
            "{padding_mode:?} padding needs a non empty image"
        )));
    }

    let old_size = src.size();
    let new_size = dst.size();
    let old_data = src.as_slice();
    let new_data = dst.as_slice_mut();

    match padding_mode {
        // if constant padding, fill with constant value
        PaddingMode::Constant => {
            new_data
                .chunks_exact_mut(C)
                .for_each(|chunk| chunk.copy_from_slice(&constant_value));
        }
        _ => {
            new_data.fill(T::default());
        }
    }

    if old_data.is_empty() {
        return Ok(());
    }

    // copy old image data as center of new image data
    let new_stride = new_size.width * C;
    let old_stride = old_size.width * C;
    let row_offset = padding.top * new_stride + padding.left * C;

    for (src_row, dst_row) in old_data
        .chunks_exact(old_stride)
        .zip(new_data[row_offset..].chunks_mut(new_stride))
    {
        dst_row[..old_stride].copy_from_slice(src_row);
    }

    padding_mode.apply_padding::<T, C>(new_data, old_size, new_size, &padding);

    Ok(())
}

/// Border settings for [`frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameConfig<T, const C: usize> {
    /// Border widths in pixels.
    pub padding: Padding2D,
    /// How the border is filled.
    pub mode: PaddingMode,
    /// Fill color for [`PaddingMode::Constant`].
    pub color: [T; C],
}

impl Default for FrameConfig<u8, 3> {
    /// Two pixels on every side, constant fill, `[255, 0, 0]` (red for RGB input).
    fn default() -> Self {
        Self {
            padding: Padding2D::uniform(2),
            mode: PaddingMode::Constant,
            color: [255, 0, 0],
        }
    }
}

/// Add a border around an image, returning the framed image.
///
/// # Example
///
/// ```rust
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::padding::{frame, FrameConfig};
///
/// let image = Image::<u8, 3>::from_size_val(ImageSize { width: 10, height: 8 }, 0).unwrap();
/// let framed = frame(&image, &FrameConfig::default()).unwrap();
///
/// assert_eq!(framed.size(), ImageSize { width: 14, height: 12 });
/// assert_eq!(framed.get_pixel(0, 0, 0).unwrap(), 255);
/// ```
pub fn frame<T, const C: usize>(
    src: &Image<T, C>,
    config: &FrameConfig<T, C>,
) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Default + Send + Sync,
{
    let mut dst = Image::from_size_val(config.padding.padded_size(src.size()), T::default())?;
    spatial_padding(src, &mut dst, config.padding, config.mode, config.color)?;
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    // helper functions
    fn make_src_2x2_rgb() -> Result<Image<u8, 3>, ImageError> {
        Image::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4],
        )
    }

    fn make_dst_4x4_rgb() -> Result<Image<u8, 3>, ImageError> {
        Image::new(
            ImageSize {
                width: 4,
                height: 4,
            },
            vec![0u8; 48],
        )
    }

    const PAD_1: Padding2D = Padding2D {
        top: 1,
        bottom: 1,
        left: 1,
        right: 1,
    };

    #[test]
    fn test_spatial_padding_constant() -> Result<(), ImageError> {
        let src = make_src_2x2_rgb()?;
        let mut dst = make_dst_4x4_rgb()?;

        spatial_padding(&src, &mut dst, PAD_1, PaddingMode::Constant, [9, 9, 9])?;

        let d = dst.as_slice();

        // corners
        assert_eq!(&d[0..3], &[9, 9, 9]);
        assert_eq!(&d[45..48], &[9, 9, 9]);

        // top edge
        assert_eq!(&d[3..6], &[9, 9, 9]);

        // actual image
        assert_eq!(&d[15..18], &[1, 1, 1]);
        assert_eq!(&d[30..33], &[4, 4, 4]);

        Ok(())
    }

    #[test]
    fn test_spatial_padding_replicate() -> Result<(), ImageError> {
        let src = make_src_2x2_rgb()?;
        let mut dst = make_dst_4x4_rgb()?;

        spatial_padding(&src, &mut dst, PAD_1, PaddingMode::Replicate, [0, 0, 0])?;

        let d = dst.as_slice();

        // corners
        assert_eq!(&d[0..3], &[1, 1, 1]);
        assert_eq!(&d[45..48], &[4, 4, 4]);

        // edges
        assert_eq!(&d[3..6], &[1, 1, 1]);
        assert_eq!(&d[21..24], &[2, 2, 2]);

        Ok(())
    }

    #[test]
    fn test_spatial_padding_reflect101() -> Result<(), ImageError> {
        let src = make_src_2x2_rgb()?;
        let mut dst = make_dst_4x4_rgb()?;

        spatial_padding(&src, &mut dst, PAD_1, PaddingMode::Reflect101, [0, 0, 0])?;

        let d = dst.as_slice();

        // corners
        assert_eq!(&d[0..3], &[4, 4, 4]);
        assert_eq!(&d[9..12], &[3, 3, 3]);

        // top edge
        assert_eq!(&d[3..6], &[3, 3, 3]);

        // actual image
        assert_eq!(&d[15..18], &[1, 1, 1]);

        Ok(())
    }

    #[test]
    fn test_spatial_padding_reflect() -> Result<(), ImageError> {
        let src = make_src_2x2_rgb()?;
        let mut dst = make_dst_4x4_rgb()?;

        spatial_padding(&src, &mut dst, PAD_1, PaddingMode::Reflect, [0, 0, 0])?;

        let d = dst.as_slice();

        // corners
        assert_eq!(&d[0..3], &[1, 1, 1]);
        assert_eq!(&d[9..12], &[2, 2, 2]);

        // edges
        assert_eq!(&d[6..9], &[2, 2, 2]);
        assert_eq!(&d[39..42], &[3, 3, 3]);

        Ok(())
    }

    #[test]
    fn test_spatial_padding_wrap() -> Result<(), ImageError> {
        let src = make_src_2x2_rgb()?;
        let mut dst = make_dst_4x4_rgb()?;

        spatial_padding(&src, &mut dst, PAD_1, PaddingMode::Wrap, [0, 0, 0])?;

        let d = dst.as_slice();

        // corners
        assert_eq!(&d[0..3], &[4, 4, 4]);
        assert_eq!(&d[9..12], &[3, 3, 3]);
        assert_eq!(&d[36..39], &[2, 2, 2]);
        assert_eq!(&d[45..48], &[1, 1, 1]);

        // edges
        assert_eq!(&d[12..15], &[2, 2, 2]);

        Ok(())
    }

    #[test]
    fn test_spatial_padding_dst_size_mismatch() -> Result<(), ImageError> {
        let src = make_src_2x2_rgb()?;
        let mut dst = Image::<u8, 3>::new(
            ImageSize {
                width: 3,
                height: 4,
            },
            vec![0u8; 36],
        )?;

        let res = spatial_padding(&src, &mut dst, PAD_1, PaddingMode::Replicate, [0, 0, 0]);
        assert_eq!(res, Err(ImageError::InvalidImageSize(3, 4, 4, 4)));

        Ok(())
    }

    #[test]
    fn test_spatial_padding_larger_than_image_replicate() -> Result<(), ImageError> {
        let src = Image::<u8, 3>::new(
            ImageSize {
                width: 1,
                height: 1,
            },
            vec![7, 7, 7],
        )?;

        let padding = Padding2D {
            top: 3,
            bottom: 3,
            left: 4,
            right: 4,
        };

        let mut dst = Image::<u8, 3>::new(
            ImageSize {
                width: 9,
                height: 7,
            },
            vec![0u8; 189],
        )?;

        spatial_padding(&src, &mut dst, padding, PaddingMode::Replicate, [0, 0, 0])?;

        for px in dst.as_slice().chunks_exact(3) {
            assert_eq!(px, &[7, 7, 7]);
        }

        Ok(())
    }

    #[test]
    fn test_frame_default() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 20,
                height: 10,
            },
            50,
        )?;
        let framed = frame(&image, &FrameConfig::default())?;

        assert_eq!(image.height(), framed.height() - 4);
        assert_eq!(image.width(), framed.width() - 4);
        assert_eq!(framed.get_pixel(1, 1, 0)?, 255);
        assert_eq!(framed.get_pixel(1, 1, 1)?, 0);
        assert_eq!(framed.get_pixel(2, 2, 0)?, 50);

        Ok(())
    }

    #[test]
    fn test_frame_asymmetric() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 20,
                height: 10,
            },
            50,
        )?;
        let config = FrameConfig {
            padding: Padding2D {
                top: 1,
                bottom: 1,
                left: 3,
                right: 3,
            },
            ..FrameConfig::default()
        };
        let framed = frame(&image, &config)?;

        assert_eq!(image.height(), framed.height() - 2);
        assert_eq!(image.width(), framed.width() - 6);

        Ok(())
    }

    #[test]
    fn test_frame_empty_image_non_constant() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 0,
                height: 0,
            },
            vec![],
        )?;
        let config = FrameConfig {
            padding: Padding2D::uniform(1),
            mode: PaddingMode::Wrap,
            color: [0],
        };
        assert!(matches!(
            frame(&image, &config),
            Err(ImageError::InvalidArgument(_))
        ));
        Ok(())
    }
}
