//! Score command implementation.

use crate::cli::ScoreArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::sync::Arc;
use wsjf_domain::{Factor, Properties, PropertyValue};
use wsjf_host::MemoryHost;
use wsjf_sync::{SyncConfig, SyncController};

/// Properties carrying the given factors under their primary keys.
pub(crate) fn factor_properties(args: &ScoreArgs) -> Result<Properties> {
    let values = [
        (Factor::BusinessValue, args.bv),
        (Factor::TimeCriticality, args.tc),
        (Factor::RiskReduction, args.rr),
        (Factor::JobSize, args.js),
    ];
    let mut properties = Properties::new();
    for (factor, value) in values {
        if !value.is_finite() || value < 0.0 {
            return Err(CliError::InvalidInput(format!(
                "{} must be a non-negative number",
                factor.label()
            )));
        }
        properties.insert(factor.primary_key().to_string(), PropertyValue::Number(value));
    }
    Ok(properties)
}

/// Execute the score command.
pub fn execute_score(args: ScoreArgs, config: SyncConfig, formatter: &Formatter) -> Result<()> {
    let properties = factor_properties(&args)?;
    let max_score = config.max_score();
    let controller = SyncController::new(Arc::new(MemoryHost::new()), config);
    let evaluation = controller.evaluate(&properties);

    println!("{}", formatter.format_evaluation(&evaluation, max_score)?);
    Ok(())
}
