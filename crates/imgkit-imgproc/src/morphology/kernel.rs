use imgkit_image::ImageError;

/// A morphological structuring element.
///
/// Stores a binary mask in row-major order. The anchor sits at
/// `(height / 2, width / 2)`, so for even sizes it is the lower-right of the
/// two central candidates.
///
/// # Example
///
/// ```rust
/// use imgkit_imgproc::morphology::Kernel;
///
/// let kernel = Kernel::box_kernel(2, 3).unwrap();
/// assert_eq!(kernel.height(), 2);
/// assert_eq!(kernel.width(), 3);
/// assert_eq!(kernel.anchor(), (1, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    mask: Vec<bool>,
    width: usize,
    height: usize,
}

impl Kernel {
    /// Create a kernel from a row-major mask.
    ///
    /// Fails when a dimension is zero, the mask length differs from
    /// `height * width` or no element is active.
    pub fn from_mask(height: usize, width: usize, mask: Vec<bool>) -> Result<Self, ImageError> {
        if height == 0 || width == 0 {
            return Err(ImageError::InvalidArgument(format!(
                "kernel dimensions must be positive, got {height}x{width}"
            )));
        }
        if mask.len() != height * width {
            return Err(ImageError::InvalidArgument(format!(
                "kernel mask holds {} elements, expected {}",
                mask.len(),
                height * width
            )));
        }
        if !mask.iter().any(|&m| m) {
            return Err(ImageError::InvalidArgument(
                "kernel mask has no active element".to_string(),
            ));
        }

        Ok(Self {
            mask,
            width,
            height,
        })
    }

    /// A rectangular kernel with every element active.
    pub fn box_kernel(height: usize, width: usize) -> Result<Self, ImageError> {
        Self::from_mask(height, width, vec![true; height * width])
    }

    /// Width of the kernel.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the kernel.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Anchor position as `(row, col)`.
    pub fn anchor(&self) -> (usize, usize) {
        (self.height / 2, self.width / 2)
    }

    /// The row-major mask.
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Whether applying the kernel leaves the image untouched.
    pub fn is_identity(&self) -> bool {
        self.width == 1 && self.height == 1
    }

    /// Offsets `(dy, dx)` of the active elements relative to the anchor.
    pub(crate) fn offsets(&self) -> Vec<(isize, isize)> {
        let (ay, ax) = self.anchor();
        self.mask
            .iter()
            .enumerate()
            .filter(|(_, &m)| m)
            .map(|(i, _)| {
                let (ky, kx) = (i / self.width, i % self.width);
                (ky as isize - ay as isize, kx as isize - ax as isize)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_kernel() -> Result<(), ImageError> {
        let kernel = Kernel::box_kernel(3, 3)?;
        assert_eq!(kernel.anchor(), (1, 1));
        assert!(kernel.mask().iter().all(|&m| m));
        assert_eq!(kernel.offsets().len(), 9);
        assert!(!kernel.is_identity());
        assert!(Kernel::box_kernel(1, 1)?.is_identity());
        Ok(())
    }

    #[test]
    fn test_even_kernel_offsets() -> Result<(), ImageError> {
        let kernel = Kernel::box_kernel(2, 2)?;
        assert_eq!(kernel.offsets(), vec![(-1, -1), (-1, 0), (0, -1), (0, 0)]);
        Ok(())
    }

    #[test]
    fn test_invalid_kernels() {
        assert!(Kernel::box_kernel(0, 2).is_err());
        assert!(Kernel::from_mask(1, 2, vec![true]).is_err());
        assert!(Kernel::from_mask(1, 2, vec![false, false]).is_err());
    }
}
