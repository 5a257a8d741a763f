//! Focus command

use crate::FocusArgs;
use anyhow::{Context, Result};
use greycard_calib::focus::{check_focus, FocusParams};
use greycard_calib::FramePipeline;

pub fn run(args: FocusArgs, pipeline: &FramePipeline) -> Result<()> {
    let frame = super::load_png(&args.input)?;

    let params = FocusParams {
        blur_threshold: args
            .threshold
            .unwrap_or(pipeline.config().focus.blur_threshold),
        ..pipeline.config().focus
    };
    let verdict = check_focus(&frame, &params).context("Focus check failed")?;

    println!("variance:  {:.1}", verdict.variance);
    println!("threshold: {:.1}", params.blur_threshold);
    match verdict.warning() {
        Some(hint) => println!("blurry:    yes ({hint})"),
        None => println!("blurry:    no"),
    }
    Ok(())
}
