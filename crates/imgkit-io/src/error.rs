/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("Image not found in {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// The file extension does not map to a supported encoder.
    #[error("File does not have a valid extension: {0}")]
    InvalidFileExtension(std::path::PathBuf),

    /// Error to open or write the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] imgkit_image::ImageError),

    /// Error to decode or encode the image.
    #[error("Failed to decode the image. {0}")]
    ImageDecodeError(#[from] image::ImageError),

    /// The decoded pixel layout has no matching [`crate::DynImage`] variant.
    #[error("Unsupported pixel layout: {0}")]
    UnsupportedImageFormat(String),

    /// A save option is outside its accepted range.
    #[error("Invalid save option: {0}")]
    InvalidSaveOption(String),
}
