//! Crop command

use crate::CropArgs;
use anyhow::Result;
use greycard_calib::pipeline::crop as crop_frame;
use greycard_calib::FramePipeline;
use tracing::info;

pub fn run(args: CropArgs, pipeline: &FramePipeline) -> Result<()> {
    let frame = super::load_png(&args.input)?;
    let rect = args.rect.unwrap_or(pipeline.config().crop);

    let cropped = crop_frame(&frame, &rect)?;
    info!(
        from = ?frame.dimensions(),
        to = ?cropped.dimensions(),
        "cropped"
    );

    super::save_png(&args.output, &cropped)
}
