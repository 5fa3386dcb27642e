//! Scales command implementation.

use crate::error::Result;
use crate::output::Formatter;
use wsjf_sync::SyncConfig;

/// Execute the scales command.
pub fn execute_scales(config: &SyncConfig, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_scales(&config.scales)?);
    Ok(())
}
