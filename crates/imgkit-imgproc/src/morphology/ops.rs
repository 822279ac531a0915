use imgkit_image::{Image, ImageError};

use super::Kernel;
use crate::parallel;

#[derive(Clone, Copy)]
enum MorphOp {
    Erode,
    Dilate,
}

impl MorphOp {
    fn name(self) -> &'static str {
        match self {
            MorphOp::Erode => "erode",
            MorphOp::Dilate => "dilate",
        }
    }
}

fn morph<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    op: MorphOp,
) -> Result<(), ImageError>
where
    T: Copy + PartialOrd + Send + Sync,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    if kernel.is_identity() {
        log::warn!("{} with a 1x1 kernel copies the image", op.name());
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Ok(());
    }

    // dilation uses the reflected structuring element so that opening and
    // closing stay aligned with the source for even kernel sizes
    let offsets: Vec<(isize, isize)> = match op {
        MorphOp::Erode => kernel.offsets(),
        MorphOp::Dilate => kernel.offsets().iter().map(|&(dy, dx)| (-dy, -dx)).collect(),
    };

    let (rows, cols) = (src.rows() as isize, src.cols() as isize);
    let src_data = src.as_slice();

    parallel::par_fill_rows(dst, |y, row| {
        for x in 0..cols {
            for c in 0..C {
                let mut acc: Option<T> = None;
                for &(dy, dx) in &offsets {
                    let (sy, sx) = (y as isize + dy, x + dx);
                    if sy < 0 || sy >= rows || sx < 0 || sx >= cols {
                        continue;
                    }
                    let v = src_data[(sy * cols + sx) as usize * C + c];
                    acc = Some(match (acc, op) {
                        (None, _) => v,
                        (Some(a), MorphOp::Erode) if v < a => v,
                        (Some(a), MorphOp::Dilate) if v > a => v,
                        (Some(a), _) => a,
                    });
                }
                let own = src_data[(y as isize * cols + x) as usize * C + c];
                row[x as usize * C + c] = acc.unwrap_or(own);
            }
        }
    });

    Ok(())
}

/// Erode an image with a [`Kernel`].
///
/// Each sample becomes the minimum over the kernel neighbourhood. Pixels
/// outside the image do not contribute.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image with the same size as `src`.
/// * `kernel` - The structuring element.
pub fn erode<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
) -> Result<(), ImageError>
where
    T: Copy + PartialOrd + Send + Sync,
{
    morph(src, dst, kernel, MorphOp::Erode)
}

/// Dilate an image with a [`Kernel`].
///
/// Each sample becomes the maximum over the reflected kernel neighbourhood.
/// Pixels outside the image do not contribute.
pub fn dilate<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
) -> Result<(), ImageError>
where
    T: Copy + PartialOrd + Send + Sync,
{
    morph(src, dst, kernel, MorphOp::Dilate)
}

/// Opening: erosion followed by dilation.
///
/// Removes bright specks smaller than the kernel.
pub fn open<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
) -> Result<(), ImageError>
where
    T: Copy + PartialOrd + Send + Sync,
{
    let mut eroded = src.clone();
    erode(src, &mut eroded, kernel)?;
    dilate(&eroded, dst, kernel)
}

/// Closing: dilation followed by erosion.
///
/// Fills dark gaps smaller than the kernel.
pub fn close<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
) -> Result<(), ImageError>
where
    T: Copy + PartialOrd + Send + Sync,
{
    let mut dilated = src.clone();
    dilate(src, &mut dilated, kernel)?;
    erode(&dilated, dst, kernel)
}

/// Reduce stroke thickness: erosion with a 2x2 box kernel.
pub fn thin<T, const C: usize>(src: &Image<T, C>, dst: &mut Image<T, C>) -> Result<(), ImageError>
where
    T: Copy + PartialOrd + Send + Sync,
{
    erode(src, dst, &Kernel::box_kernel(2, 2)?)
}

/// Increase stroke thickness: dilation with a 1x1 box kernel.
///
/// With the default kernel this is a copy. Use [`dilate`] for a visible effect.
pub fn stress<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError>
where
    T: Copy + PartialOrd + Send + Sync,
{
    dilate(src, dst, &Kernel::box_kernel(1, 1)?)
}

/// Remove isolated bright pixels: opening with a 2x2 box kernel.
pub fn remove_noise<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError>
where
    T: Copy + PartialOrd + Send + Sync,
{
    open(src, dst, &Kernel::box_kernel(2, 2)?)
}

/// Fill small gaps in shapes: closing with a 2x2 box kernel.
pub fn fill<T, const C: usize>(src: &Image<T, C>, dst: &mut Image<T, C>) -> Result<(), ImageError>
where
    T: Copy + PartialOrd + Send + Sync,
{
    close(src, dst, &Kernel::box_kernel(2, 2)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgkit_image::ImageSize;

    const SIZE: ImageSize = ImageSize {
        width: 7,
        height: 7,
    };

    /// A 3x3 white square at rows/cols 2..=4 of a black 7x7 image.
    fn square() -> Result<Image<u8, 1>, ImageError> {
        let mut img = Image::<u8, 1>::from_size_val(SIZE, 0)?;
        for y in 2..5 {
            for x in 2..5 {
                img.as_slice_mut()[y * 7 + x] = 255;
            }
        }
        Ok(img)
    }

    fn white(img: &Image<u8, 1>) -> Vec<(usize, usize)> {
        img.as_slice()
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 255)
            .map(|(i, _)| (i / 7, i % 7))
            .collect()
    }

    fn block(from: usize, to: usize) -> Vec<(usize, usize)> {
        (from..=to)
            .flat_map(|y| (from..=to).map(move |x| (y, x)))
            .collect()
    }

    #[test]
    fn test_erode_dilate_box_3x3() -> Result<(), ImageError> {
        let src = square()?;
        let kernel = Kernel::box_kernel(3, 3)?;
        let mut dst = Image::<u8, 1>::from_size_val(SIZE, 0)?;

        erode(&src, &mut dst, &kernel)?;
        assert_eq!(white(&dst), vec![(3, 3)]);

        dilate(&src, &mut dst, &kernel)?;
        assert_eq!(white(&dst), block(1, 5));
        Ok(())
    }

    #[test]
    fn test_outside_pixels_do_not_contribute() -> Result<(), ImageError> {
        let kernel = Kernel::box_kernel(3, 3)?;
        let mut dst = Image::<u8, 1>::from_size_val(SIZE, 0)?;

        let mut corner = Image::<u8, 1>::from_size_val(SIZE, 0)?;
        corner.as_slice_mut()[0] = 255;
        dilate(&corner, &mut dst, &kernel)?;
        assert_eq!(white(&dst), block(0, 1));

        let full = Image::<u8, 1>::from_size_val(SIZE, 255)?;
        erode(&full, &mut dst, &kernel)?;
        assert_eq!(dst, full);
        Ok(())
    }

    #[test]
    fn test_even_kernels() -> Result<(), ImageError> {
        let src = square()?;
        let mut dst = Image::<u8, 1>::from_size_val(SIZE, 0)?;

        thin(&src, &mut dst)?;
        assert_eq!(white(&dst), block(3, 4));

        dilate(&src, &mut dst, &Kernel::box_kernel(2, 2)?)?;
        assert_eq!(white(&dst), block(1, 4));
        Ok(())
    }

    #[test]
    fn test_open_close_keep_square() -> Result<(), ImageError> {
        let src = square()?;
        let mut dst = Image::<u8, 1>::from_size_val(SIZE, 0)?;

        remove_noise(&src, &mut dst)?;
        assert_eq!(dst, src);

        fill(&src, &mut dst)?;
        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn test_remove_noise_and_fill() -> Result<(), ImageError> {
        let mut speck = Image::<u8, 1>::from_size_val(SIZE, 0)?;
        speck.as_slice_mut()[24] = 255;
        let mut dst = Image::<u8, 1>::from_size_val(SIZE, 7)?;
        remove_noise(&speck, &mut dst)?;
        assert!(dst.as_slice().iter().all(|&v| v == 0));

        let mut hole = Image::<u8, 1>::from_size_val(SIZE, 255)?;
        hole.as_slice_mut()[24] = 0;
        fill(&hole, &mut dst)?;
        assert!(dst.as_slice().iter().all(|&v| v == 255));
        Ok(())
    }

    #[test]
    fn test_stress_is_copy() -> Result<(), ImageError> {
        let src = Image::<f32, 2>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![0.1, 0.2, 0.3, 0.4],
        )?;
        let mut dst = Image::<f32, 2>::from_size_val(src.size(), 0.0)?;
        stress(&src, &mut dst)?;
        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn test_size_mismatch() -> Result<(), ImageError> {
        let src = square()?;
        let mut dst = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 7,
            },
            0,
        )?;
        assert_eq!(
            erode(&src, &mut dst, &Kernel::box_kernel(3, 3)?),
            Err(ImageError::InvalidImageSize(7, 7, 4, 7))
        );
        Ok(())
    }
}
