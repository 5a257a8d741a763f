//! Render command

use crate::RenderArgs;
use anyhow::Result;
use greycard_calib::FramePipeline;
use tracing::info;

pub fn run(args: RenderArgs, pipeline: &FramePipeline) -> Result<()> {
    let frame = super::load_png(&args.input)?;

    let gains = match args.gains {
        Some(g) => g,
        None => super::calibrate(pipeline, &frame, args.patch.selection())?.gains,
    };
    info!(gains = %gains, crop = args.crop, "render");

    let output = if args.crop {
        pipeline.render_cropped(&frame, &gains)?
    } else {
        pipeline.render(&frame, &gains)
    };

    super::save_png(&args.output, &output)?;
    info!(
        output = %args.output.display(),
        w = output.width(),
        h = output.height(),
        "saved"
    );
    Ok(())
}
