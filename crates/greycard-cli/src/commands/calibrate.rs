//! Calibrate command

use crate::CalibrateArgs;
use anyhow::Result;
use greycard_calib::FramePipeline;
use tracing::info;

pub fn run(args: CalibrateArgs, pipeline: &FramePipeline) -> Result<()> {
    let frame = super::load_png(&args.input)?;
    info!(input = %args.input.display(), w = frame.width(), h = frame.height(), "calibrate");

    let cal = super::calibrate(pipeline, &frame, args.patch.selection())?;
    let mean = cal.stats.mean;

    println!("gains:     {}", cal.gains);
    println!("region:    {} ({:?})", cal.region, cal.source);
    println!("mean:      {:.4},{:.4},{:.4}", mean.x, mean.y, mean.z);
    println!("luminance: {:.4}", cal.stats.luminance());
    Ok(())
}
