use std::str::FromStr;

use fast_image_resize as fr;
use imgkit_image::{Image, ImageDtype, ImageError, ImageSize};

use crate::interpolation::{
    area_interpolation, bilinear_interpolation, nearest_neighbor_interpolation, InterpolationMode,
};
use crate::parallel;

/// Resize an image to a new size.
///
/// The function resizes an image to a new size using the specified interpolation mode.
/// It supports any number of channels and data types.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container, already allocated with the target size.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::interpolation::InterpolationMode;
/// use imgkit_imgproc::resize::resize_native;
///
/// let image = Image::<_, 3>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0f32; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let new_size = ImageSize {
///     width: 2,
///     height: 3,
/// };
///
/// let mut image_resized = Image::<_, 3>::from_size_val(new_size, 0.0).unwrap();
///
/// resize_native(&image, &mut image_resized, InterpolationMode::Nearest).unwrap();
///
/// assert_eq!(image_resized.num_channels(), 3);
/// assert_eq!(image_resized.size().width, 2);
/// assert_eq!(image_resized.size().height, 3);
/// ```
pub fn resize_native<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError>
where
    T: ImageDtype,
{
    if dst.numel() == 0 {
        return Ok(());
    }

    if src.numel() == 0 {
        return Err(ImageError::InvalidArgument(format!(
            "cannot resize an empty image to {}",
            dst.size()
        )));
    }

    let (src_w, src_h) = (src.width() as f32, src.height() as f32);
    let (dst_w, dst_h) = (dst.width() as f32, dst.height() as f32);

    // corner-aligned sampling positions for the point interpolators
    let step_x = if dst.width() > 1 {
        (src_w - 1.0) / (dst_w - 1.0)
    } else {
        0.0
    };
    let step_y = if dst.height() > 1 {
        (src_h - 1.0) / (dst_h - 1.0)
    } else {
        0.0
    };

    // footprint of one destination pixel in source pixels
    let area_x = src_w / dst_w;
    let area_y = src_h / dst_h;

    parallel::par_fill_rows(dst, |y, row| {
        for (x, out) in row.chunks_exact_mut(C).enumerate() {
            for (c, val) in out.iter_mut().enumerate() {
                let sample = match interpolation {
                    InterpolationMode::Bilinear => {
                        bilinear_interpolation(src, x as f32 * step_x, y as f32 * step_y, c)
                    }
                    InterpolationMode::Nearest => nearest_neighbor_interpolation(
                        src,
                        x as f32 * step_x,
                        y as f32 * step_y,
                        c,
                    ),
                    InterpolationMode::Area => area_interpolation(
                        src,
                        (x as f32 * area_x, (x + 1) as f32 * area_x),
                        (y as f32 * area_y, (y + 1) as f32 * area_y),
                        c,
                    ),
                };
                *val = T::from_f32(sample);
            }
        }
    });

    Ok(())
}

/// Resize an image to a new size using the [fast_image_resize](https://crates.io/crates/fast_image_resize) crate.
///
/// Supports `u8` images with 1, 2, 3 or 4 channels. Area interpolation maps to the
/// crate's box convolution.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container, already allocated with the target size.
/// * `interpolation` - The interpolation mode to use.
///
/// # Errors
///
/// The function returns an error if the channel count is not supported or the
/// image cannot be resized.
pub fn resize_fast<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    let pixel_type = match C {
        1 => fr::PixelType::U8,
        2 => fr::PixelType::U8x2,
        3 => fr::PixelType::U8x3,
        4 => fr::PixelType::U8x4,
        _ => {
            return Err(ImageError::InvalidArgument(format!(
                "resize_fast does not support {C} channels"
            )))
        }
    };

    let src_image = fr::images::ImageRef::new(
        src.width() as u32,
        src.height() as u32,
        src.as_slice(),
        pixel_type,
    )
    .map_err(|e| ImageError::InvalidArgument(e.to_string()))?;

    let (dst_width, dst_height) = (dst.width() as u32, dst.height() as u32);
    let mut dst_image =
        fr::images::Image::from_slice_u8(dst_width, dst_height, dst.as_slice_mut(), pixel_type)
            .map_err(|e| ImageError::InvalidArgument(e.to_string()))?;

    let algorithm = match interpolation {
        InterpolationMode::Bilinear => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
        InterpolationMode::Nearest => fr::ResizeAlg::Nearest,
        InterpolationMode::Area => fr::ResizeAlg::Convolution(fr::FilterType::Box),
    };
    let options = fr::ResizeOptions::new().resize_alg(algorithm);

    fr::Resizer::new()
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| ImageError::InvalidArgument(e.to_string()))?;

    Ok(())
}

/// Resize an image to `new_size` with bilinear interpolation, returning a new image.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::resize::resize;
///
/// let image = Image::<u8, 3>::from_size_val(ImageSize { width: 8, height: 6 }, 7).unwrap();
/// let resized = resize(&image, ImageSize { width: 20, height: 20 }).unwrap();
///
/// assert_eq!(resized.size(), ImageSize { width: 20, height: 20 });
/// assert!(resized.as_slice().iter().all(|&v| v == 7));
/// ```
pub fn resize<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    new_size: ImageSize,
) -> Result<Image<T, C>, ImageError> {
    let mut dst = Image::from_size_val(new_size, T::default())?;
    resize_native(src, &mut dst, InterpolationMode::Bilinear)?;
    Ok(dst)
}

/// The axis a [`scale`] request is expressed along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleKind {
    /// The requested size is the new width.
    Width,
    /// The requested size is the new height.
    Height,
}

impl ScaleKind {
    /// Name of the axis, as accepted by [`str::parse`].
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleKind::Width => "width",
            ScaleKind::Height => "height",
        }
    }
}

impl std::fmt::Display for ScaleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScaleKind {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "width" => Ok(ScaleKind::Width),
            "height" => Ok(ScaleKind::Height),
            _ => Err(ImageError::InvalidArgument(format!(
                "Not supported scale kind: {s}, expected width or height"
            ))),
        }
    }
}

/// Compute the target size of a [`scale`] request.
///
/// With `aspect_ratio = width / height`, the companion dimension is
/// `floor(new_size / aspect_ratio)` for both kinds. It is evaluated as
/// `new_size * height / width` in integer arithmetic.
///
/// # Errors
///
/// * [`ImageError::ScaleNotShrinking`] if `new_size` is not smaller than the
///   current size along `kind`.
/// * [`ImageError::InvalidArgument`] if `size` is empty, `new_size` is zero, or
///   the companion dimension rounds down to zero.
///
/// # Example
///
/// ```
/// use imgkit_image::ImageSize;
/// use imgkit_imgproc::resize::{scale_target, ScaleKind};
///
/// let size = ImageSize { width: 400, height: 300 };
/// let target = scale_target(size, 200, ScaleKind::Width).unwrap();
///
/// assert_eq!(target, ImageSize { width: 200, height: 150 });
/// ```
pub fn scale_target(
    size: ImageSize,
    new_size: usize,
    kind: ScaleKind,
) -> Result<ImageSize, ImageError> {
    if size.width == 0 || size.height == 0 {
        return Err(ImageError::InvalidArgument(format!(
            "cannot scale an empty image ({size})"
        )));
    }

    if new_size == 0 {
        return Err(ImageError::InvalidArgument(
            "scale target size must be positive".to_string(),
        ));
    }

    let current = match kind {
        ScaleKind::Width => size.width,
        ScaleKind::Height => size.height,
    };

    if new_size >= current {
        return Err(ImageError::ScaleNotShrinking {
            axis: kind.as_str(),
            requested: new_size,
            current,
        });
    }

    let companion = ((new_size as u128 * size.height as u128) / size.width as u128) as usize;
    if companion == 0 {
        return Err(ImageError::InvalidArgument(format!(
            "scaling {size} to {kind} {new_size} leaves an empty image"
        )));
    }

    let target = match kind {
        ScaleKind::Width => ImageSize {
            width: new_size,
            height: companion,
        },
        ScaleKind::Height => ImageSize {
            width: companion,
            height: new_size,
        },
    };

    Ok(target)
}

/// Shrink an image along one axis, deriving the other axis from the aspect ratio.
///
/// The target size comes from [`scale_target`] and the pixels are resampled with
/// [`InterpolationMode::Area`]. Requests that would not shrink the image are
/// rejected rather than returning a copy.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `new_size` - The size along `kind`; must be smaller than the current one.
/// * `kind` - The axis `new_size` refers to.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::resize::{scale, ScaleKind};
///
/// let image = Image::<u8, 3>::from_size_val(ImageSize { width: 400, height: 300 }, 0).unwrap();
///
/// let scaled = scale(&image, 200, ScaleKind::Width).unwrap();
/// assert_eq!(scaled.size(), ImageSize { width: 200, height: 150 });
///
/// assert!(scale(&image, 500, ScaleKind::Width).is_err());
/// assert!("bogus".parse::<ScaleKind>().is_err());
/// ```
pub fn scale<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    new_size: usize,
    kind: ScaleKind,
) -> Result<Image<T, C>, ImageError> {
    let target = scale_target(src.size(), new_size, kind)?;

    log::debug!("scaling {} to {target} along {kind}", src.size());

    let mut dst = Image::from_size_val(target, T::default())?;
    resize_native(src, &mut dst, InterpolationMode::Area)?;

    Ok(dst)
}
