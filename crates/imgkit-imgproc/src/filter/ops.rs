use std::{fmt, str::FromStr};

use imgkit_image::{Image, ImageDtype, ImageError};

use super::{kernels, separable_filter};

/// Smoothing method selected by name, e.g. from a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoothMethod {
    /// Normalized box filter.
    Blur,
    /// Gaussian filter with sigma derived from the kernel size.
    Gaussian,
}

impl SmoothMethod {
    /// The lowercase name accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            SmoothMethod::Blur => "blur",
            SmoothMethod::Gaussian => "gaussian",
        }
    }
}

impl fmt::Display for SmoothMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SmoothMethod {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blur" => Ok(SmoothMethod::Blur),
            "gaussian" => Ok(SmoothMethod::Gaussian),
            other => Err(ImageError::InvalidArgument(format!(
                "unknown smoothing method `{other}`, expected `blur` or `gaussian`"
            ))),
        }
    }
}

fn check_kernel_size(kernel_size: (usize, usize), odd: bool) -> Result<(), ImageError> {
    let (kx, ky) = kernel_size;
    if kx == 0 || ky == 0 {
        return Err(ImageError::InvalidArgument(format!(
            "kernel size must be positive, got {kx}x{ky}"
        )));
    }
    if odd && (kx % 2 == 0 || ky % 2 == 0) {
        return Err(ImageError::InvalidArgument(format!(
            "gaussian kernel size must be odd, got {kx}x{ky}"
        )));
    }
    Ok(())
}

/// Blur an image using a box blur filter
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_size` - The size of the kernel (kernel_x, kernel_y).
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn box_blur<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel_size: (usize, usize),
) -> Result<(), ImageError> {
    check_kernel_size(kernel_size, false)?;
    let kernel_x = kernels::box_blur_kernel_1d(kernel_size.0);
    let kernel_y = kernels::box_blur_kernel_1d(kernel_size.1);
    separable_filter(src, dst, &kernel_x, &kernel_y)
}

/// Blur an image using a gaussian blur filter
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_size` - The size of the kernel (kernel_x, kernel_y). Both must be odd.
/// * `sigma` - The sigma of the gaussian kernel. Non-positive values are
///   derived from the kernel size.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn gaussian_blur<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel_size: (usize, usize),
    sigma: (f32, f32),
) -> Result<(), ImageError> {
    check_kernel_size(kernel_size, true)?;
    let kernel_x = kernels::gaussian_kernel_1d(kernel_size.0, sigma.0);
    let kernel_y = kernels::gaussian_kernel_1d(kernel_size.1, sigma.1);
    separable_filter(src, dst, &kernel_x, &kernel_y)
}

/// Smooth an image with a square kernel of side `kernel_size`.
///
/// [`SmoothMethod::Gaussian`] derives sigma from the kernel size.
pub fn smooth<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    method: SmoothMethod,
    kernel_size: usize,
) -> Result<(), ImageError> {
    log::debug!("smoothing with {method} kernel of size {kernel_size}");
    match method {
        SmoothMethod::Blur => box_blur(src, dst, (kernel_size, kernel_size)),
        SmoothMethod::Gaussian => {
            gaussian_blur(src, dst, (kernel_size, kernel_size), (0.0, 0.0))
        }
    }
}
