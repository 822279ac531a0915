use imgkit_image::{Image, ImageError, ImageSize};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// A rectangular crop request in pixel coordinates.
///
/// Columns span `[x_start, x_end)` and rows span `[y_start, y_end)`. The
/// coordinates are signed so that requests built from arbitrary arithmetic can
/// be validated and rejected with a precise error instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRegion {
    /// First column of the region.
    pub x_start: i64,
    /// One past the last column of the region.
    pub x_end: i64,
    /// First row of the region.
    pub y_start: i64,
    /// One past the last row of the region.
    pub y_end: i64,
}

type CropRule = fn(&CropRegion, ImageSize) -> Result<(), ImageError>;

// Evaluated in order, the first failing rule is the one reported.
const CROP_RULES: [CropRule; 8] = [
    x_start_in_bounds,
    x_end_in_bounds,
    y_start_in_bounds,
    y_end_in_bounds,
    x_ordered,
    y_ordered,
    x_not_degenerate,
    y_not_degenerate,
];

fn in_bounds(name: &'static str, value: i64, limit: usize) -> Result<(), ImageError> {
    if value < 0 || value as u64 > limit as u64 {
        return Err(ImageError::CoordinateOutOfBounds { name, value, limit });
    }
    Ok(())
}

fn ordered(
    start_name: &'static str,
    start: i64,
    end_name: &'static str,
    end: i64,
) -> Result<(), ImageError> {
    if start > end {
        return Err(ImageError::InvalidCropOrdering {
            start_name,
            start,
            end_name,
            end,
        });
    }
    Ok(())
}

fn not_degenerate(
    start_name: &'static str,
    start: i64,
    end_name: &'static str,
    end: i64,
) -> Result<(), ImageError> {
    if start == end {
        return Err(ImageError::DegenerateCropRange {
            start_name,
            end_name,
            value: start,
        });
    }
    Ok(())
}

fn x_start_in_bounds(r: &CropRegion, size: ImageSize) -> Result<(), ImageError> {
    in_bounds("x_start", r.x_start, size.width)
}

fn x_end_in_bounds(r: &CropRegion, size: ImageSize) -> Result<(), ImageError> {
    in_bounds("x_end", r.x_end, size.width)
}

fn y_start_in_bounds(r: &CropRegion, size: ImageSize) -> Result<(), ImageError> {
    in_bounds("y_start", r.y_start, size.height)
}

fn y_end_in_bounds(r: &CropRegion, size: ImageSize) -> Result<(), ImageError> {
    in_bounds("y_end", r.y_end, size.height)
}

fn x_ordered(r: &CropRegion, _: ImageSize) -> Result<(), ImageError> {
    ordered("x_start", r.x_start, "x_end", r.x_end)
}

fn y_ordered(r: &CropRegion, _: ImageSize) -> Result<(), ImageError> {
    ordered("y_start", r.y_start, "y_end", r.y_end)
}

fn x_not_degenerate(r: &CropRegion, _: ImageSize) -> Result<(), ImageError> {
    not_degenerate("x_start", r.x_start, "x_end", r.x_end)
}

fn y_not_degenerate(r: &CropRegion, _: ImageSize) -> Result<(), ImageError> {
    not_degenerate("y_start", r.y_start, "y_end", r.y_end)
}

impl CropRegion {
    /// Create a crop region from its four boundaries.
    pub fn new(x_start: i64, x_end: i64, y_start: i64, y_end: i64) -> Self {
        Self {
            x_start,
            x_end,
            y_start,
            y_end,
        }
    }

    /// Check the region against an image of the given size.
    ///
    /// The checks run in a fixed order: the bounds of `x_start`, `x_end`,
    /// `y_start` and `y_end`, then the ordering of the x pair and the y pair,
    /// then that neither pair is empty. Only the first violation is reported.
    ///
    /// # Errors
    ///
    /// * [`ImageError::CoordinateOutOfBounds`] if a coordinate is outside `0 ..= limit`.
    /// * [`ImageError::InvalidCropOrdering`] if a start is greater than its end.
    /// * [`ImageError::DegenerateCropRange`] if a start equals its end.
    pub fn validate(&self, size: ImageSize) -> Result<(), ImageError> {
        CROP_RULES.iter().try_for_each(|rule| rule(self, size))
    }

    /// Size of the region. Only meaningful once [`CropRegion::validate`] passed.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: (self.x_end - self.x_start) as usize,
            height: (self.y_end - self.y_start) as usize,
        }
    }
}

/// Cut a rectangular region out of an image.
///
/// Returns a new image holding rows `[y_start, y_end)` and columns
/// `[x_start, x_end)` of `src`. The source image is left untouched.
///
/// # Arguments
///
/// * `src` - The source image to crop.
/// * `x_start` - First column of the region, in `0..=width`.
/// * `x_end` - One past the last column of the region, in `0..=width`.
/// * `y_start` - First row of the region, in `0..=height`.
/// * `y_end` - One past the last row of the region, in `0..=height`.
///
/// # Errors
///
/// See [`CropRegion::validate`] for the rules and the order they are checked in.
///
/// # Examples
///
/// ```rust
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::crop::crop;
///
/// let image = Image::<_, 1>::new(ImageSize { width: 4, height: 4 }, vec![
///     0u8, 1, 2, 3,
///     4u8, 5, 6, 7,
///     8u8, 9, 10, 11,
///     12u8, 13, 14, 15
/// ]).unwrap();
///
/// let cropped = crop(&image, 1, 3, 1, 3).unwrap();
/// assert_eq!(cropped.as_slice(), &[5u8, 6, 9, 10]);
///
/// let err = crop(&image, 3, 1, 0, 4).unwrap_err();
/// assert!(err.to_string().contains("greater"));
/// ```
pub fn crop<T, const C: usize>(
    src: &Image<T, C>,
    x_start: i64,
    x_end: i64,
    y_start: i64,
    y_end: i64,
) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Default + Send + Sync,
{
    let region = CropRegion::new(x_start, x_end, y_start, y_end);
    region.validate(src.size())?;

    log::debug!("cropping {region:?} out of {}", src.size());

    let mut dst = Image::from_size_val(region.size(), T::default())?;
    crop_image(src, &mut dst, x_start as usize, y_start as usize)?;

    Ok(dst)
}

/// Copy a window of `src` into `dst`.
///
/// The window has the size of `dst` and its top-left corner at `(x, y)` in `src`.
///
/// # Arguments
///
/// * `src` - The source image to crop.
/// * `dst` - The destination image to store the cropped image.
/// * `x` - The x-coordinate of the top-left corner of the region to crop.
/// * `y` - The y-coordinate of the top-left corner of the region to crop.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the window does not fit inside `src`.
///
/// # Examples
///
/// ```rust
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::crop::crop_image;
///
/// let image = Image::<_, 1>::new(ImageSize { width: 4, height: 4 }, vec![
///     0u8, 1, 2, 3,
///     4u8, 5, 6, 7,
///     8u8, 9, 10, 11,
///     12u8, 13, 14, 15
/// ]).unwrap();
///
/// let mut cropped = Image::<_, 1>::from_size_val(ImageSize { width: 2, height: 2 }, 0u8).unwrap();
///
/// crop_image(&image, &mut cropped, 1, 1).unwrap();
///
/// assert_eq!(cropped.as_slice(), &[5u8, 6, 9, 10]);
/// ```
pub fn crop_image<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    x: usize,
    y: usize,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if x + dst.cols() > src.cols() || y + dst.rows() > src.rows() {
        return Err(ImageError::InvalidImageSize(
            x + dst.cols(),
            y + dst.rows(),
            src.cols(),
            src.rows(),
        ));
    }

    let dst_cols = dst.cols();
    if dst_cols == 0 {
        return Ok(());
    }

    let src_cols = src.cols();
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .enumerate()
        .for_each(|(i, dst_row)| {
            // get the slice at the top left corner
            let offset = (y + i) * src_cols * C + x * C;
            dst_row.copy_from_slice(&src_data[offset..offset + dst_cols * C]);
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(width: usize, height: usize) -> Result<Image<u8, 3>, ImageError> {
        let data = (0..width * height * 3).map(|v| (v % 251) as u8).collect();
        Image::new(ImageSize { width, height }, data)
    }

    #[test]
    fn test_crop_image() -> Result<(), ImageError> {
        let image_size = ImageSize {
            width: 2,
            height: 3,
        };

        #[rustfmt::skip]
        let image = Image::<_, 3>::new(
            image_size,
            vec![
                0u8, 1, 2, 3, 4, 5,
                6u8, 7, 8, 9, 10, 11,
                12u8, 13, 14, 15, 16, 17,
            ],
        )?;

        let data_expected = vec![9u8, 10, 11, 15, 16, 17];

        let crop_size = ImageSize {
            width: 1,
            height: 2,
        };

        let mut cropped = Image::<_, 3>::from_size_val(crop_size, 0u8)?;

        crop_image(&image, &mut cropped, 1, 1)?;

        assert_eq!(cropped.as_slice(), &data_expected);

        Ok(())
    }

    #[test]
    fn test_crop_image_window_too_large() -> Result<(), ImageError> {
        let image = sample(4, 4)?;
        let mut cropped = Image::<_, 3>::from_size_val(
            ImageSize {
                width: 3,
                height: 3,
            },
            0u8,
        )?;
        assert_eq!(
            crop_image(&image, &mut cropped, 2, 0),
            Err(ImageError::InvalidImageSize(5, 3, 4, 4))
        );
        Ok(())
    }

    #[test]
    fn test_crop_values_match_source() -> Result<(), ImageError> {
        let image = sample(7, 5)?;
        for (x0, x1, y0, y1) in [(0, 7, 0, 5), (1, 4, 2, 5), (6, 7, 0, 1), (2, 3, 3, 4)] {
            let cropped = crop(&image, x0, x1, y0, y1)?;
            assert_eq!(cropped.width(), (x1 - x0) as usize);
            assert_eq!(cropped.height(), (y1 - y0) as usize);
            for y in 0..cropped.height() {
                for x in 0..cropped.width() {
                    for c in 0..3 {
                        assert_eq!(
                            cropped.get_pixel(x, y, c)?,
                            image.get_pixel(x + x0 as usize, y + y0 as usize, c)?
                        );
                    }
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_crop_full_region_is_identity() -> Result<(), ImageError> {
        let image = sample(6, 4)?;
        let cropped = crop(&image, 0, 6, 0, 4)?;
        assert_eq!(cropped, image);
        Ok(())
    }

    #[test]
    fn test_crop_pixels_trimmed() -> Result<(), ImageError> {
        let (x_lim, y_lim) = (40, 30);
        let image = sample(x_lim, y_lim)?;
        let crop_pixels = 10;
        let cropped = crop(
            &image,
            0,
            (x_lim - crop_pixels) as i64,
            0,
            (y_lim - crop_pixels) as i64,
        )?;
        assert_eq!(image.height() - cropped.height(), crop_pixels);
        assert_eq!(image.width() - cropped.width(), crop_pixels);
        Ok(())
    }

    #[test]
    fn test_crop_out_of_bounds() -> Result<(), ImageError> {
        let (x_lim, y_lim) = (40i64, 30i64);
        let image = sample(x_lim as usize, y_lim as usize)?;
        let (valid_x, valid_y) = (x_lim - 10, y_lim - 10);

        let cases = [
            ((-1, valid_x, 0, valid_y), "x_start", -1, x_lim),
            ((x_lim + 1, valid_x, 0, valid_y), "x_start", x_lim + 1, x_lim),
            ((valid_x, -1, 0, valid_y), "x_end", -1, x_lim),
            ((valid_x, x_lim + 1, 0, valid_y), "x_end", x_lim + 1, x_lim),
            ((0, valid_x, -1, valid_y), "y_start", -1, y_lim),
            ((0, valid_x, y_lim + 1, valid_y), "y_start", y_lim + 1, y_lim),
            ((0, valid_x, 0, -1), "y_end", -1, y_lim),
            ((0, valid_x, 0, y_lim + 1), "y_end", y_lim + 1, y_lim),
        ];

        for ((x0, x1, y0, y1), name, value, limit) in cases {
            let err = crop(&image, x0, x1, y0, y1).unwrap_err();
            assert_eq!(
                err,
                ImageError::CoordinateOutOfBounds {
                    name,
                    value,
                    limit: limit as usize,
                }
            );
            assert!(err.to_string().contains(name));
        }
        Ok(())
    }

    #[test]
    fn test_crop_ordering() -> Result<(), ImageError> {
        let image = sample(40, 30)?;

        let err = crop(&image, 10, 5, 0, 20).unwrap_err();
        assert!(matches!(err, ImageError::InvalidCropOrdering { .. }));
        let msg = err.to_string();
        for w in ["x_start", "x_end", "greater"] {
            assert!(msg.contains(w), "{msg}");
        }

        let err = crop(&image, 0, 30, 10, 9).unwrap_err();
        let msg = err.to_string();
        for w in ["y_start", "y_end", "greater"] {
            assert!(msg.contains(w), "{msg}");
        }
        Ok(())
    }

    #[test]
    fn test_crop_degenerate() -> Result<(), ImageError> {
        let image = sample(40, 30)?;

        let err = crop(&image, 5, 5, 0, 20).unwrap_err();
        assert_eq!(
            err,
            ImageError::DegenerateCropRange {
                start_name: "x_start",
                end_name: "x_end",
                value: 5,
            }
        );
        for w in ["x_start", "x_end", "same"] {
            assert!(err.to_string().contains(w));
        }

        let err = crop(&image, 0, 30, 20, 20).unwrap_err();
        for w in ["y_start", "y_end", "same"] {
            assert!(err.to_string().contains(w));
        }
        Ok(())
    }

    #[test]
    fn test_crop_rule_order() -> Result<(), ImageError> {
        let image = sample(10, 10)?;

        // bounds are checked before ordering
        let err = crop(&image, 8, 3, 0, 11).unwrap_err();
        assert!(matches!(
            err,
            ImageError::CoordinateOutOfBounds { name: "y_end", .. }
        ));

        // x ordering is checked before y ordering
        let err = crop(&image, 8, 3, 9, 2).unwrap_err();
        assert!(matches!(
            err,
            ImageError::InvalidCropOrdering {
                start_name: "x_start",
                ..
            }
        ));

        // ordering is checked before degeneracy
        let err = crop(&image, 4, 4, 9, 2).unwrap_err();
        assert!(matches!(
            err,
            ImageError::InvalidCropOrdering {
                start_name: "y_start",
                ..
            }
        ));
        Ok(())
    }

    #[test]
    fn test_crop_does_not_touch_source() -> Result<(), ImageError> {
        let image = sample(5, 5)?;
        let before = image.clone();
        let mut cropped = crop(&image, 1, 4, 1, 4)?;
        cropped.as_slice_mut().fill(0);
        assert_eq!(image, before);
        Ok(())
    }

    #[test]
    fn test_crop_random_windows() -> Result<(), ImageError> {
        use rand::Rng;

        let mut rng = rand::rng();
        let (width, height) = (37, 23);
        let image = sample(width, height)?;

        for _ in 0..64 {
            let x_start = rng.random_range(0..width - 1);
            let x_end = rng.random_range(x_start + 1..=width);
            let y_start = rng.random_range(0..height - 1);
            let y_end = rng.random_range(y_start + 1..=height);

            let cropped = crop(
                &image,
                x_start as i64,
                x_end as i64,
                y_start as i64,
                y_end as i64,
            )?;
            assert_eq!(cropped.width(), x_end - x_start);
            assert_eq!(cropped.height(), y_end - y_start);

            for (y, x) in [(0, 0), (cropped.height() - 1, cropped.width() - 1)] {
                for c in 0..3 {
                    assert_eq!(
                        cropped.get_pixel(x, y, c)?,
                        image.get_pixel(x + x_start, y + y_start, c)?
                    );
                }
            }
        }
        Ok(())
    }
}
