use rayon::prelude::*;

use imgkit_image::Image;

/// Apply a function to each pixel in the image in parallel.
///
/// The closure receives the `C1` samples of a source pixel and the `C2` samples
/// of the matching destination pixel. Rows are distributed over the rayon pool.
pub fn par_iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
{
    let cols = src.cols();
    if cols == 0 {
        return;
    }

    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each sample in the image in parallel.
pub fn par_iter_rows_val<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&T1, &mut T2) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
{
    let cols = src.cols();
    if cols == 0 {
        return;
    }

    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .iter()
                .zip(dst_chunk.iter_mut())
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Fill each destination row in parallel, passing the row index to the closure.
///
/// The closure receives `(y, row)` where `row` holds `width * C` samples.
pub fn par_fill_rows<T, const C: usize>(
    dst: &mut Image<T, C>,
    f: impl Fn(usize, &mut [T]) + Send + Sync,
) where
    T: Send + Sync,
{
    let cols = dst.cols();
    if cols == 0 {
        return;
    }

    dst.as_slice_mut()
        .par_chunks_exact_mut(C * cols)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgkit_image::{ImageError, ImageSize};

    #[test]
    fn iter_rows_pixels() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let src = Image::<u8, 2>::new(size, vec![1, 2, 3, 4, 5, 6, 7, 8])?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;
        par_iter_rows(&src, &mut dst, |s, d| d[0] = s[0] + s[1]);
        assert_eq!(dst.as_slice(), &[3, 7, 11, 15]);
        Ok(())
    }

    #[test]
    fn iter_rows_values() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 2,
            height: 1,
        };
        let src = Image::<u8, 2>::new(size, vec![1, 2, 3, 4])?;
        let mut dst = Image::<u8, 2>::from_size_val(size, 0)?;
        par_iter_rows_val(&src, &mut dst, |s, d| *d = *s * 2);
        assert_eq!(dst.as_slice(), &[2, 4, 6, 8]);
        Ok(())
    }

    #[test]
    fn fill_rows_index() -> Result<(), ImageError> {
        let mut dst = Image::<usize, 1>::from_size_val(
            ImageSize {
                width: 2,
                height: 3,
            },
            0,
        )?;
        par_fill_rows(&mut dst, |y, row| row.fill(y));
        assert_eq!(dst.as_slice(), &[0, 0, 1, 1, 2, 2]);
        Ok(())
    }

    #[test]
    fn empty_image_is_noop() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 0,
            height: 4,
        };
        let src = Image::<u8, 1>::new(size, vec![])?;
        let mut dst = Image::<u8, 1>::new(size, vec![])?;
        par_iter_rows_val(&src, &mut dst, |s, d| *d = *s);
        assert_eq!(dst.numel(), 0);
        Ok(())
    }
}
