/// An error type for the image and image processing operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two image sizes that should agree do not.
    #[error("Invalid image size. Got {0}x{1}, expected {2}x{3}")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when a pixel coordinate is outside the image.
    #[error("Pixel index ({0}, {1}) is out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when a channel index is outside the image.
    #[error("Channel index {0} is out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a pixel value cannot be cast to the target type.
    #[error("Failed to cast image data")]
    CastError,

    /// A crop coordinate lies outside `0 ..= limit`.
    #[error("Supplied {name}(={value}) argument is out of bounds 0 =< {name} =< {limit}")]
    CoordinateOutOfBounds {
        /// Name of the offending coordinate, e.g. `x_start`.
        name: &'static str,
        /// Value that was supplied.
        value: i64,
        /// Inclusive upper limit for the coordinate.
        limit: usize,
    },

    /// A crop start coordinate is greater than its end coordinate.
    #[error("{start_name}(={start}) index can't be greater than {end_name}(={end})")]
    InvalidCropOrdering {
        /// Name of the start coordinate.
        start_name: &'static str,
        /// Value of the start coordinate.
        start: i64,
        /// Name of the end coordinate.
        end_name: &'static str,
        /// Value of the end coordinate.
        end: i64,
    },

    /// A crop start coordinate equals its end coordinate.
    #[error("{start_name} and {end_name} can't both have the same value (={value})")]
    DegenerateCropRange {
        /// Name of the start coordinate.
        start_name: &'static str,
        /// Name of the end coordinate.
        end_name: &'static str,
        /// The shared value.
        value: i64,
    },

    /// A scale request asked for a size that is not smaller than the current one.
    #[error("Cannot scale {axis} to {requested}: only shrinking below the current {axis} ({current}) is supported")]
    ScaleNotShrinking {
        /// The axis the request was made along.
        axis: &'static str,
        /// The requested size.
        requested: usize,
        /// The current size along the axis.
        current: usize,
    },

    /// An argument has a value the operation does not support.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
