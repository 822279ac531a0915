use argh::FromArgs;
use std::path::PathBuf;

use imgkit::image::Image;
use imgkit::imgproc::{
    filter::{self, SmoothMethod},
    morphology,
    threshold::{self, AdaptiveThresholdConfig, ThresholdConfig, ThresholdType},
};
use imgkit::io::functional as F;

#[derive(FromArgs)]
/// Binarize a scanned document
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// path of the output image
    #[argh(option, short = 'o')]
    output_path: PathBuf,

    /// thresholding method: `fixed`, `otsu`, `mean` or `gaussian`
    #[argh(option, default = "String::from(\"otsu\")")]
    method: String,

    /// smoothing applied before thresholding: `blur` or `gaussian`
    #[argh(option, default = "String::from(\"gaussian\")")]
    smooth: String,

    /// remove isolated pixels from the result
    #[argh(switch)]
    denoise: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let gray = F::read_image_mono8(&args.image_path)?;

    let mut smoothed = Image::<u8, 1>::from_size_val(gray.size(), 0)?;
    let method: SmoothMethod = args.smooth.parse()?;
    filter::smooth(&gray, &mut smoothed, method, 5)?;

    let mut bin = Image::<u8, 1>::from_size_val(gray.size(), 0)?;
    match args.method.as_str() {
        "fixed" => threshold::fixed_threshold(&smoothed, &mut bin, &ThresholdConfig::default())?,
        "otsu" => {
            let level = threshold::otsu_threshold(&smoothed, &mut bin, 255, ThresholdType::BinaryInv)?;
            log::info!("otsu level: {level}");
        }
        adaptive => {
            let config = AdaptiveThresholdConfig {
                method: adaptive.parse()?,
                ..Default::default()
            };
            threshold::adaptive_threshold(&smoothed, &mut bin, &config)?;
        }
    }

    if args.denoise {
        let mut clean = Image::<u8, 1>::from_size_val(bin.size(), 0)?;
        morphology::remove_noise(&bin, &mut clean)?;
        bin = clean;
    }

    F::write_image(&args.output_path, &bin, &Default::default())?;

    Ok(())
}
