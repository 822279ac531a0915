use argh::FromArgs;
use std::path::PathBuf;

use imgkit::io::{functional as F, SaveOptions};
use imgkit::{image::metadata, imgproc};

#[derive(FromArgs)]
/// Crop an image, shrink it preserving the aspect ratio and add a border
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// path of the output image
    #[argh(option, short = 'o')]
    output_path: PathBuf,

    /// crop window as x_start,x_end,y_start,y_end
    #[argh(option)]
    crop: Option<String>,

    /// target size along the scale axis
    #[argh(option, short = 's')]
    size: Option<usize>,

    /// scale axis, `width` or `height`
    #[argh(option, default = "String::from(\"width\")")]
    kind: String,

    /// add the default red frame
    #[argh(switch)]
    frame: bool,

    /// jpeg quality of the output
    #[argh(option)]
    quality: Option<u8>,
}

fn parse_window(s: &str) -> Result<[i64; 4], Box<dyn std::error::Error>> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()?;
    values
        .try_into()
        .map_err(|v: Vec<i64>| format!("expected 4 crop coordinates, got {}", v.len()).into())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut image = F::read_image_rgb8(&args.image_path)?;
    log::info!("loaded {:?}", metadata(&image));

    if let Some(window) = args.crop.as_deref() {
        let [x_start, x_end, y_start, y_end] = parse_window(window)?;
        image = imgproc::crop::crop(&image, x_start, x_end, y_start, y_end)?;
    }

    if let Some(size) = args.size {
        let kind: imgproc::resize::ScaleKind = args.kind.parse()?;
        image = imgproc::resize::scale(&image, size, kind)?;
    }

    if args.frame {
        image = imgproc::padding::frame(&image, &Default::default())?;
    }

    let options = SaveOptions {
        jpeg_quality: args.quality,
        png_compression: None,
    };
    F::write_image(&args.output_path, &image, &options)?;

    log::info!("wrote {} ({})", args.output_path.display(), image.size());

    Ok(())
}
