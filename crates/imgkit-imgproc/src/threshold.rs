use std::{fmt, str::FromStr};

use num_traits::Zero;

use imgkit_image::{Image, ImageError};

use crate::{filter, padding::PaddingMode, parallel};

/// The type of thresholding to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdType {
    /// `max_value` above the threshold, zero otherwise.
    Binary,
    /// Zero above the threshold, `max_value` otherwise.
    BinaryInv,
    /// Values above the threshold are clamped to it.
    Trunc,
    /// Values at or below the threshold become zero.
    ToZero,
    /// Values above the threshold become zero.
    ToZeroInv,
}

/// Parameters of [`fixed_threshold`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdConfig<T> {
    /// The threshold value.
    pub threshold: T,
    /// The value assigned by the binary threshold types.
    pub max_value: T,
    /// How samples are mapped against the threshold.
    pub threshold_type: ThresholdType,
}

impl Default for ThresholdConfig<u8> {
    fn default() -> Self {
        Self {
            threshold: 120,
            max_value: 255,
            threshold_type: ThresholdType::BinaryInv,
        }
    }
}

fn check_same_size<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &Image<T2, C2>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }
    Ok(())
}

/// Map every sample through `f` after checking the sizes match.
fn threshold_with<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    f: impl Fn(T) -> T + Send + Sync,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    check_same_size(src, dst)?;
    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = f(*src_pixel);
    });
    Ok(())
}

/// Apply a binary threshold to an image.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `dst` - The output image of an arbitrary number of channels and type.
/// * `threshold` - The threshold value. Must be the same type as the image.
/// * `max_value` - The maximum value to use when the input value is greater than the threshold.
///
/// # Examples
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::threshold::threshold_binary;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0).unwrap();
///
/// threshold_binary(&image, &mut thresholded, 100, 255).unwrap();
/// assert_eq!(thresholded.as_slice(), &[0, 255, 0, 255, 255, 255]);
/// ```
pub fn threshold_binary<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    threshold: T,
    max_value: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd + Zero,
{
    threshold_with(src, dst, |v| if v > threshold { max_value } else { T::zero() })
}

/// Apply an inverse binary threshold to an image.
///
/// Samples greater than `threshold` become zero, all others `max_value`.
pub fn threshold_binary_inverse<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    threshold: T,
    max_value: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd + Zero,
{
    threshold_with(src, dst, |v| if v > threshold { T::zero() } else { max_value })
}

/// Apply a truncated threshold to an image.
pub fn threshold_truncate<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    threshold: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd,
{
    threshold_with(src, dst, |v| if v > threshold { threshold } else { v })
}

/// Apply a threshold to an image, setting values below the threshold to zero.
pub fn threshold_to_zero<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    threshold: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd + Zero,
{
    threshold_with(src, dst, |v| if v > threshold { v } else { T::zero() })
}

/// Apply a threshold to an image, setting values above the threshold to zero.
pub fn threshold_to_zero_inverse<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    threshold: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd + Zero,
{
    threshold_with(src, dst, |v| if v > threshold { T::zero() } else { v })
}

/// Apply a fixed threshold, dispatching on [`ThresholdConfig::threshold_type`].
///
/// # Examples
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::threshold::{fixed_threshold, ThresholdConfig};
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![10, 120, 200]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// fixed_threshold(&image, &mut dst, &ThresholdConfig::default()).unwrap();
/// assert_eq!(dst.as_slice(), &[255, 255, 0]);
/// ```
pub fn fixed_threshold<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    config: &ThresholdConfig<T>,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd + Zero,
{
    let ThresholdConfig {
        threshold,
        max_value,
        threshold_type,
    } = *config;

    match threshold_type {
        ThresholdType::Binary => threshold_binary(src, dst, threshold, max_value),
        ThresholdType::BinaryInv => threshold_binary_inverse(src, dst, threshold, max_value),
        ThresholdType::Trunc => threshold_truncate(src, dst, threshold),
        ThresholdType::ToZero => threshold_to_zero(src, dst, threshold),
        ThresholdType::ToZeroInv => threshold_to_zero_inverse(src, dst, threshold),
    }
}

/// Find the threshold maximizing the between-class variance of `histogram`.
fn otsu_level(histogram: &[u64; 256]) -> u8 {
    let total: u64 = histogram.iter().sum();
    let sum_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &n)| i as f64 * n as f64)
        .sum();

    let mut best = (0u8, 0.0f64);
    let (mut weight_back, mut sum_back) = (0u64, 0.0f64);

    for (level, &count) in histogram.iter().enumerate() {
        weight_back += count;
        sum_back += level as f64 * count as f64;

        if weight_back == 0 || weight_back == total {
            continue;
        }

        let weight_fore = (total - weight_back) as f64;
        let mean_back = sum_back / weight_back as f64;
        let mean_fore = (sum_total - sum_back) / weight_fore;
        let variance = weight_back as f64 * weight_fore * (mean_back - mean_fore).powi(2);

        if variance > best.1 {
            best = (level as u8, variance);
        }
    }

    best.0
}

/// Apply Otsu's thresholding to an image.
///
/// The threshold is chosen over the histogram of all samples and then applied
/// with `threshold_type`.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image.
/// * `max_value` - The value assigned by the binary threshold types.
/// * `threshold_type` - The type of thresholding to apply.
///
/// # Returns
///
/// The computed threshold.
pub fn otsu_threshold<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    max_value: u8,
    threshold_type: ThresholdType,
) -> Result<u8, ImageError> {
    check_same_size(src, dst)?;

    let mut histogram = [0u64; 256];
    for &v in src.as_slice() {
        histogram[v as usize] += 1;
    }

    let threshold = otsu_level(&histogram);
    log::debug!("otsu threshold: {threshold}");

    fixed_threshold(
        src,
        dst,
        &ThresholdConfig {
            threshold,
            max_value,
            threshold_type,
        },
    )?;

    Ok(threshold)
}

/// How the local threshold of [`adaptive_threshold`] is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdaptiveMethod {
    /// Mean of the block neighbourhood.
    #[default]
    Mean,
    /// Gaussian weighted sum of the block neighbourhood.
    Gaussian,
}

impl fmt::Display for AdaptiveMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdaptiveMethod::Mean => f.write_str("mean"),
            AdaptiveMethod::Gaussian => f.write_str("gaussian"),
        }
    }
}

impl FromStr for AdaptiveMethod {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(AdaptiveMethod::Mean),
            "gaussian" => Ok(AdaptiveMethod::Gaussian),
            other => Err(ImageError::InvalidArgument(format!(
                "unknown adaptive threshold method `{other}`"
            ))),
        }
    }
}

/// Parameters of [`adaptive_threshold`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveThresholdConfig {
    /// Local threshold method.
    pub method: AdaptiveMethod,
    /// Side of the square neighbourhood. Odd and greater than one.
    pub block_size: usize,
    /// Constant subtracted from the local threshold.
    pub c: f32,
    /// The value assigned to selected pixels.
    pub max_value: u8,
    /// Either [`ThresholdType::Binary`] or [`ThresholdType::BinaryInv`].
    pub threshold_type: ThresholdType,
}

impl Default for AdaptiveThresholdConfig {
    fn default() -> Self {
        Self {
            method: AdaptiveMethod::Mean,
            block_size: 35,
            c: 17.0,
            max_value: 255,
            threshold_type: ThresholdType::BinaryInv,
        }
    }
}

/// Threshold a grayscale image against a per-pixel local threshold.
///
/// The local threshold is the (mean or gaussian weighted) neighbourhood value
/// of `block_size x block_size` pixels minus `c`. Borders replicate the edge.
pub fn adaptive_threshold(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    config: &AdaptiveThresholdConfig,
) -> Result<(), ImageError> {
    let AdaptiveThresholdConfig {
        method,
        block_size,
        c,
        max_value,
        threshold_type,
    } = *config;

    if block_size < 3 || block_size % 2 == 0 {
        return Err(ImageError::InvalidArgument(format!(
            "adaptive threshold block size must be odd and greater than 1, got {block_size}"
        )));
    }

    let inverse = match threshold_type {
        ThresholdType::Binary => false,
        ThresholdType::BinaryInv => true,
        other => {
            return Err(ImageError::InvalidArgument(format!(
                "adaptive threshold supports Binary and BinaryInv, got {other:?}"
            )))
        }
    };

    check_same_size(src, dst)?;

    let kernel = match method {
        AdaptiveMethod::Mean => filter::kernels::box_blur_kernel_1d(block_size),
        AdaptiveMethod::Gaussian => filter::kernels::gaussian_kernel_1d(block_size, 0.0),
    };

    let src_f32 = src.cast::<f32>()?;
    let mut local = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    filter::separable_filter_with_border(
        &src_f32,
        &mut local,
        &kernel,
        &kernel,
        PaddingMode::Replicate,
    )?;

    let (hit, miss) = if inverse {
        (0, max_value)
    } else {
        (max_value, 0)
    };

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice().iter().zip(local.as_slice()))
        .for_each(|(out, (&v, &m))| {
            *out = if v as f32 > m.round() - c { hit } else { miss };
        });

    Ok(())
}
