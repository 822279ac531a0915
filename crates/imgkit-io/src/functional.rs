use std::{fs::File, io::BufWriter, path::Path};

use image::{
    codecs::{
        jpeg::JpegEncoder,
        png::{CompressionType, FilterType, PngEncoder},
    },
    ExtendedColorType, ImageEncoder, ImageFormat,
};
use imgkit_image::{Image, ImageSize};

use crate::error::IoError;

/// How the pixel layout of a file is mapped on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Always three 8-bit channels in RGB order. Alpha is dropped.
    #[default]
    Color,
    /// A single 8-bit luma channel.
    Grayscale,
    /// Keep the stored channel count and bit depth.
    Unchanged,
}

/// An image of any of the pixel layouts [`read_image`] can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum DynImage {
    /// 8-bit grayscale image
    Mono8(Image<u8, 1>),
    /// 8-bit RGB image
    Rgb8(Image<u8, 3>),
    /// 8-bit RGB image with alpha channel
    Rgba8(Image<u8, 4>),
    /// 16-bit grayscale image
    Mono16(Image<u16, 1>),
    /// 16-bit RGB image
    Rgb16(Image<u16, 3>),
}

impl DynImage {
    /// The size of the wrapped image.
    pub fn size(&self) -> ImageSize {
        match self {
            DynImage::Mono8(img) => img.size(),
            DynImage::Rgb8(img) => img.size(),
            DynImage::Rgba8(img) => img.size(),
            DynImage::Mono16(img) => img.size(),
            DynImage::Rgb16(img) => img.size(),
        }
    }

    /// The number of channels of the wrapped image.
    pub fn num_channels(&self) -> usize {
        match self {
            DynImage::Mono8(_) | DynImage::Mono16(_) => 1,
            DynImage::Rgb8(_) | DynImage::Rgb16(_) => 3,
            DynImage::Rgba8(_) => 4,
        }
    }
}

/// Options applied by [`write_image`].
///
/// `jpeg_quality` wins over `png_compression`: when it is set, PNG files are
/// written with the default compression level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaveOptions {
    /// JPEG quality in `0..=100`, higher is better. Defaults to 95.
    pub jpeg_quality: Option<u8>,
    /// PNG compression level in `0..=9`, higher is smaller and slower. Defaults to 3.
    pub png_compression: Option<u8>,
}

impl SaveOptions {
    /// JPEG quality used when none is given.
    pub const DEFAULT_JPEG_QUALITY: u8 = 95;
    /// PNG compression level used when none is given.
    pub const DEFAULT_PNG_COMPRESSION: u8 = 3;

    /// Options with only the JPEG quality set.
    pub fn jpeg(quality: u8) -> Self {
        Self {
            jpeg_quality: Some(quality),
            png_compression: None,
        }
    }

    /// Options with only the PNG compression level set.
    pub fn png(compression: u8) -> Self {
        Self {
            jpeg_quality: None,
            png_compression: Some(compression),
        }
    }

    fn validate(&self) -> Result<(), IoError> {
        if let Some(q) = self.jpeg_quality.filter(|&q| q > 100) {
            return Err(IoError::InvalidSaveOption(format!(
                "jpeg quality must be in 0..=100, got {q}"
            )));
        }
        if let Some(l) = self.png_compression.filter(|&l| l > 9) {
            return Err(IoError::InvalidSaveOption(format!(
                "png compression must be in 0..=9, got {l}"
            )));
        }
        Ok(())
    }

    fn effective_jpeg_quality(&self) -> u8 {
        // the encoder rejects a quality of zero
        self.jpeg_quality
            .unwrap_or(Self::DEFAULT_JPEG_QUALITY)
            .max(1)
    }

    fn effective_png_compression(&self) -> u8 {
        match self.jpeg_quality {
            Some(_) => Self::DEFAULT_PNG_COMPRESSION,
            None => self
                .png_compression
                .unwrap_or(Self::DEFAULT_PNG_COMPRESSION),
        }
    }
}

fn decode(file_path: &Path) -> Result<image::DynamicImage, IoError> {
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    log::debug!(
        "decoded {} as {:?} ({}x{})",
        file_path.display(),
        img.color(),
        img.width(),
        img.height()
    );

    Ok(img)
}

fn size_of(img: &image::DynamicImage) -> ImageSize {
    ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    }
}

/// Reads an image from the given file path.
///
/// The format is guessed from the file content.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
/// * `mode` - How the stored pixel layout is mapped, see [`LoadMode`].
///
/// # Errors
///
/// [`IoError::FileDoesNotExist`] when nothing is found at `file_path`.
pub fn read_image(file_path: impl AsRef<Path>, mode: LoadMode) -> Result<DynImage, IoError> {
    let img = decode(file_path.as_ref())?;
    let size = size_of(&img);

    let image = match mode {
        LoadMode::Color => DynImage::Rgb8(Image::new(size, img.into_rgb8().into_raw())?),
        LoadMode::Grayscale => DynImage::Mono8(Image::new(size, img.into_luma8().into_raw())?),
        LoadMode::Unchanged => match img.color() {
            image::ColorType::L8 => DynImage::Mono8(Image::new(size, img.into_luma8().into_raw())?),
            image::ColorType::Rgb8 => DynImage::Rgb8(Image::new(size, img.into_rgb8().into_raw())?),
            image::ColorType::La8 | image::ColorType::Rgba8 => {
                DynImage::Rgba8(Image::new(size, img.into_rgba8().into_raw())?)
            }
            image::ColorType::L16 => {
                DynImage::Mono16(Image::new(size, img.into_luma16().into_raw())?)
            }
            image::ColorType::Rgb16 => {
                DynImage::Rgb16(Image::new(size, img.into_rgb16().into_raw())?)
            }
            other => return Err(IoError::UnsupportedImageFormat(format!("{other:?}"))),
        },
    };

    Ok(image)
}

/// Reads an image as 8-bit RGB.
///
/// Shortcut for [`read_image`] with [`LoadMode::Color`].
pub fn read_image_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let img = decode(file_path.as_ref())?;
    Ok(Image::new(size_of(&img), img.into_rgb8().into_raw())?)
}

/// Reads an image as 8-bit grayscale.
pub fn read_image_mono8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let img = decode(file_path.as_ref())?;
    Ok(Image::new(size_of(&img), img.into_luma8().into_raw())?)
}

fn png_compression_type(level: u8) -> CompressionType {
    match level {
        0..=2 => CompressionType::Fast,
        3..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

/// Writes an 8-bit image with 1, 3 or 4 channels to disk.
///
/// The encoder is chosen from the file extension. JPEG and PNG honour
/// [`SaveOptions`]; other formats known to the `image` crate use their defaults.
/// JPEG output drops the alpha channel of 4-channel images.
///
/// # Arguments
///
/// * `file_path` - The destination path.
/// * `image` - The image to write.
/// * `options` - Encoder options.
///
/// # Errors
///
/// [`IoError::InvalidFileExtension`] when the extension is missing or unknown.
pub fn write_image<const C: usize>(
    file_path: impl AsRef<Path>,
    image: &Image<u8, C>,
    options: &SaveOptions,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    options.validate()?;

    let color_type = match C {
        1 => ExtendedColorType::L8,
        3 => ExtendedColorType::Rgb8,
        4 => ExtendedColorType::Rgba8,
        _ => {
            return Err(IoError::UnsupportedImageFormat(format!(
                "cannot write images with {C} channels"
            )))
        }
    };

    let format = file_path
        .extension()
        .and_then(ImageFormat::from_extension)
        .ok_or_else(|| IoError::InvalidFileExtension(file_path.to_path_buf()))?;

    let (width, height) = (image.width() as u32, image.height() as u32);

    match format {
        ImageFormat::Jpeg => {
            let quality = options.effective_jpeg_quality();
            log::debug!("writing {} as jpeg, quality {quality}", file_path.display());

            let mut writer = BufWriter::new(File::create(file_path)?);
            let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
            if C == 4 {
                let rgb = image
                    .as_slice()
                    .chunks_exact(4)
                    .flat_map(|px| px[..3].iter().copied())
                    .collect::<Vec<u8>>();
                encoder.write_image(&rgb, width, height, ExtendedColorType::Rgb8)?;
            } else {
                encoder.write_image(image.as_slice(), width, height, color_type)?;
            }
        }
        ImageFormat::Png => {
            let level = options.effective_png_compression();
            log::debug!("writing {} as png, compression {level}", file_path.display());

            let writer = BufWriter::new(File::create(file_path)?);
            let encoder = PngEncoder::new_with_quality(
                writer,
                png_compression_type(level),
                FilterType::Adaptive,
            );
            encoder.write_image(image.as_slice(), width, height, color_type)?;
        }
        other => {
            log::debug!("writing {} as {other:?}", file_path.display());
            image::save_buffer_with_format(
                file_path,
                image.as_slice(),
                width,
                height,
                color_type,
                other,
            )?;
        }
    }

    Ok(())
}
