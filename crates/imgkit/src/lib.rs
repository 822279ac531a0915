#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! ```no_run
//! use imgkit::{imgproc, io::functional as F};
//!
//! let image = F::read_image_rgb8("photo.jpg").unwrap();
//! let cropped = imgproc::crop::crop(&image, 10, 110, 20, 80).unwrap();
//! let scaled = imgproc::resize::scale(&cropped, 50, imgproc::resize::ScaleKind::Width).unwrap();
//! F::write_image("small.png", &scaled, &Default::default()).unwrap();
//! ```

#[doc(inline)]
pub use imgkit_image as image;

#[doc(inline)]
pub use imgkit_imgproc as imgproc;

#[doc(inline)]
pub use imgkit_io as io;
