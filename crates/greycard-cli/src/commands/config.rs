//! Config command

use anyhow::Result;
use greycard_calib::CalibConfig;

pub fn run(config: &CalibConfig) -> Result<()> {
    print!("{}", config.to_yaml()?);
    Ok(())
}
