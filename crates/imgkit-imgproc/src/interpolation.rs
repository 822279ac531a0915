use imgkit_image::{Image, ImageDtype};

/// Interpolation mode for the resize operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Bilinear interpolation
    #[default]
    Bilinear,
    /// Nearest neighbor interpolation
    Nearest,
    /// Area interpolation: every destination pixel is the coverage-weighted
    /// average of the source pixels it overlaps. Intended for shrinking.
    Area,
}

/// Kernel for bilinear interpolation
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `c` - The channel of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel value.
pub(crate) fn bilinear_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    c: usize,
) -> f32 {
    let (rows, cols) = (image.rows(), image.cols());
    let data = image.as_slice();
    let at = |x: usize, y: usize| data[(y * cols + x) * C + c].to_f32();

    let iu = (u.floor().max(0.0) as usize).min(cols - 1);
    let iv = (v.floor().max(0.0) as usize).min(rows - 1);
    let iu1 = (iu + 1).min(cols - 1);
    let iv1 = (iv + 1).min(rows - 1);

    let frac_u = (u - iu as f32).clamp(0.0, 1.0);
    let frac_v = (v - iv as f32).clamp(0.0, 1.0);

    let val00 = at(iu, iv);
    let val01 = at(iu1, iv);
    let val10 = at(iu, iv1);
    let val11 = at(iu1, iv1);

    val00 * (1.0 - frac_u) * (1.0 - frac_v)
        + val01 * frac_u * (1.0 - frac_v)
        + val10 * (1.0 - frac_u) * frac_v
        + val11 * frac_u * frac_v
}

/// Kernel for nearest neighbor interpolation
pub(crate) fn nearest_neighbor_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    c: usize,
) -> f32 {
    let (rows, cols) = (image.rows(), image.cols());

    let iu = (u.round().max(0.0) as usize).min(cols - 1);
    let iv = (v.round().max(0.0) as usize).min(rows - 1);

    image.as_slice()[(iv * cols + iu) * C + c].to_f32()
}

/// Average of the source samples covered by the box `[x0, x1) x [y0, y1)`,
/// weighting partially covered pixels by their covered fraction.
pub(crate) fn area_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    (x0, x1): (f32, f32),
    (y0, y1): (f32, f32),
    c: usize,
) -> f32 {
    let cols = image.cols();
    let data = image.as_slice();

    let mut acc = 0.0f32;
    let mut total = 0.0f32;

    let ys = y0.floor() as usize;
    let ye = (y1.ceil() as usize).min(image.rows());
    let xs = x0.floor() as usize;
    let xe = (x1.ceil() as usize).min(cols);

    for y in ys..ye {
        let wy = (y1.min((y + 1) as f32) - y0.max(y as f32)).max(0.0);
        if wy == 0.0 {
            continue;
        }
        for x in xs..xe {
            let wx = (x1.min((x + 1) as f32) - x0.max(x as f32)).max(0.0);
            let w = wx * wy;
            acc += data[(y * cols + x) * C + c].to_f32() * w;
            total += w;
        }
    }

    if total > 0.0 {
        acc / total
    } else {
        0.0
    }
}
