use imgkit_image::{Image, ImageDtype, ImageError};
use rayon::prelude::*;

use crate::padding::PaddingMode;

/// A separable 2D filter that applies horizontal and vertical 1D convolutions sequentially.
///
/// This struct caches the kernel data and precomputed offsets.
struct SeparableFilter<'a> {
    kernel_x: &'a [f32],
    kernel_y: &'a [f32],
    offsets_x: Vec<isize>,
    offsets_y: Vec<isize>,
    border: PaddingMode,
}

impl<'a> SeparableFilter<'a> {
    fn new(kernel_x: &'a [f32], kernel_y: &'a [f32], border: PaddingMode) -> Self {
        let half_x = (kernel_x.len() / 2) as isize;
        let half_y = (kernel_y.len() / 2) as isize;

        Self {
            kernel_x,
            kernel_y,
            offsets_x: (0..kernel_x.len() as isize).map(|i| i - half_x).collect(),
            offsets_y: (0..kernel_y.len() as isize).map(|i| i - half_y).collect(),
            border,
        }
    }

    /// Resolve a possibly out of range index, `None` meaning a zero contribution.
    #[inline]
    fn resolve(&self, i: isize, len: usize) -> Option<usize> {
        if i >= 0 && (i as usize) < len {
            Some(i as usize)
        } else if self.border == PaddingMode::Constant {
            None
        } else {
            Some(self.border.map_index(i, len))
        }
    }

    fn apply<T: ImageDtype, const C: usize>(&self, src: &Image<T, C>, dst: &mut Image<T, C>) {
        let rows = src.rows();
        let cols = src.cols();
        let stride = cols * C;

        let src_data = src.as_slice();
        let mut temp = vec![0.0f32; src_data.len()];

        // horizontal
        temp.par_chunks_exact_mut(stride)
            .zip(src_data.par_chunks_exact(stride))
            .for_each(|(row_temp, row_src)| {
                for c in 0..cols {
                    let mut acc = [0.0f32; C];
                    for (&k, &off) in self.kernel_x.iter().zip(self.offsets_x.iter()) {
                        if let Some(x) = self.resolve(c as isize + off, cols) {
                            let px = &row_src[x * C..(x + 1) * C];
                            for (acc_val, v) in acc.iter_mut().zip(px.iter()) {
                                *acc_val += v.to_f32() * k;
                            }
                        }
                    }
                    row_temp[c * C..(c + 1) * C].copy_from_slice(&acc);
                }
            });

        // vertical
        dst.as_slice_mut()
            .par_chunks_exact_mut(stride)
            .enumerate()
            .for_each(|(r, row_dst)| {
                for c in 0..cols {
                    let mut acc = [0.0f32; C];
                    for (&k, &off) in self.kernel_y.iter().zip(self.offsets_y.iter()) {
                        if let Some(y) = self.resolve(r as isize + off, rows) {
                            let idx = y * stride + c * C;
                            for (acc_val, v) in acc.iter_mut().zip(temp[idx..idx + C].iter()) {
                                *acc_val += v * k;
                            }
                        }
                    }
                    for (out, acc_val) in row_dst[c * C..(c + 1) * C].iter_mut().zip(acc) {
                        *out = T::from_f32(acc_val);
                    }
                }
            });
    }
}

/// Apply a separable filter with an explicit border mode.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
/// * `border` - How samples outside the image are resolved. With
///   [`PaddingMode::Constant`] they contribute zero.
pub fn separable_filter_with_border<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
    border: PaddingMode,
) -> Result<(), ImageError> {
    if kernel_x.is_empty() || kernel_y.is_empty() {
        return Err(ImageError::InvalidArgument(format!(
            "filter kernels must not be empty, got {}x{}",
            kernel_x.len(),
            kernel_y.len()
        )));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if src.numel() == 0 {
        return Ok(());
    }

    SeparableFilter::new(kernel_x, kernel_y, border).apply(src, dst);

    Ok(())
}

/// Apply a separable filter to an image, reflecting at the borders.
///
/// Uses [`PaddingMode::Reflect101`] for samples outside the image.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
pub fn separable_filter<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
) -> Result<(), ImageError> {
    separable_filter_with_border(src, dst, kernel_x, kernel_y, PaddingMode::Reflect101)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgkit_image::ImageSize;

    #[test]
    fn test_separable_filter_constant_border() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 5,
        };

        let mut img = Image::<u8, 1>::from_size_val(size, 0)?;
        img.as_slice_mut()[12] = 255;

        let kernel_x = vec![1.0, 1.0, 1.0];
        let kernel_y = vec![1.0, 1.0, 1.0];
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;
        separable_filter_with_border(&img, &mut dst, &kernel_x, &kernel_y, PaddingMode::Constant)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[0, 0, 0, 0, 0,
            0, 255, 255, 255, 0,
            0, 255, 255, 255, 0,
            0, 255, 255, 255, 0,
            0, 0, 0, 0, 0]
        );
        Ok(())
    }

    #[test]
    fn test_separable_filter_reflect101_keeps_constant() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 3,
        };
        let img = Image::<f32, 2>::from_size_val(size, 3.0)?;
        let kernel = vec![0.2; 5];
        let mut dst = Image::<f32, 2>::from_size_val(size, 0.0)?;
        separable_filter(&img, &mut dst, &kernel, &kernel)?;
        for v in dst.as_slice() {
            approx::assert_relative_eq!(*v, 3.0, epsilon = 1e-5);
        }
        Ok(())
    }

    #[test]
    fn test_separable_filter_errors() -> Result<(), ImageError> {
        let img = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 3,
                height: 3,
            },
            0.0,
        )?;
        let mut dst = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 2,
                height: 3,
            },
            0.0,
        )?;
        assert!(matches!(
            separable_filter(&img, &mut dst, &[], &[1.0]),
            Err(ImageError::InvalidArgument(_))
        ));
        assert_eq!(
            separable_filter(&img, &mut dst, &[1.0], &[1.0]),
            Err(ImageError::InvalidImageSize(3, 3, 2, 3))
        );
        Ok(())
    }
}
