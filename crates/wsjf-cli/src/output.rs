//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use wsjf_domain::traits::MessageLevel;
use wsjf_domain::{Factor, FactorScales, FactorSet, Score, Tier, TierPolicy};
use wsjf_host::Message;
use wsjf_sync::{Evaluation, ItemOutcome, MigrationOutcome, SyncMetrics, TreeReport};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a score evaluation.
    pub fn format_evaluation(&self, evaluation: &Evaluation, max_score: f64) -> Result<String> {
        let percent = evaluation.score.and_then(|s| TierPolicy::percent(s, max_score));
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "business_value": evaluation.factors.business_value,
                "time_criticality": evaluation.factors.time_criticality,
                "risk_reduction": evaluation.factors.risk_reduction,
                "job_size": evaluation.factors.job_size,
                "score": evaluation.score.map(|s| s.value()),
                "band": evaluation.band,
                "tier": evaluation.tier,
                "percent_of_max": percent,
                "max_score": max_score,
            }))?),
            OutputFormat::Quiet => Ok(evaluation
                .score
                .map(|s| s.to_string())
                .unwrap_or_default()),
            OutputFormat::Table => {
                let Some(score) = evaluation.score else {
                    return Ok(self.warning(&undefined_reason(&evaluation.factors)));
                };
                let mut builder = Builder::default();
                builder.push_record(["Score", "Band", "Tier", "% of max"]);
                builder.push_record([
                    score.to_string(),
                    evaluation.band.map(|b| b.as_str()).unwrap_or("-").to_string(),
                    evaluation
                        .tier
                        .map(|t| self.tier_label(t))
                        .unwrap_or_else(|| "-".to_string()),
                    percent.map(|p| format!("{}%", p)).unwrap_or_else(|| "-".to_string()),
                ]);
                Ok(self.table(builder))
            }
        }
    }

    /// Format the configured scales.
    pub fn format_scales(&self, scales: &FactorScales) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(scales)?),
            OutputFormat::Quiet => Ok(scales.max_score().to_string()),
            OutputFormat::Table => {
                let mut out = Vec::new();
                for factor in Factor::ALL {
                    let mut builder = Builder::default();
                    builder.push_record(["Value", "Label"]);
                    for option in scales.scale(factor).options() {
                        builder.push_record([option.value.to_string(), option.label.clone()]);
                    }
                    out.push(self.colorize(factor.label(), "cyan"));
                    out.push(self.table(builder));
                }
                let max_score = Score::from_value(scales.max_score());
                out.push(self.info(&format!("Maximum score: {}", max_score)));
                Ok(out.join("\n"))
            }
        }
    }

    /// Format a tree pass report.
    pub fn format_tree_report(&self, report: &TreeReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "page": report.page,
                "visited": report.visited,
                "scored": report.scored,
                "updated": report.updated,
                "tier_writes": report.tier_writes,
            }))?),
            OutputFormat::Quiet => Ok(report.updated.to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Page", "Visited", "Scored", "Updated", "Tier writes"]);
                builder.push_record([
                    report.page.clone(),
                    report.visited.to_string(),
                    report.scored.to_string(),
                    report.updated.to_string(),
                    report.tier_writes.to_string(),
                ]);
                Ok(self.table(builder))
            }
        }
    }

    /// Format a single-item outcome.
    pub fn format_item_outcome(&self, outcome: &ItemOutcome) -> Result<String> {
        let (status, score) = match outcome {
            ItemOutcome::Skipped => ("skipped", None),
            ItemOutcome::Scored { score, .. } => ("scored", Some(score.value())),
            ItemOutcome::Cleared { .. } => ("cleared", None),
            ItemOutcome::Failed => ("failed", None),
        };
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "status": status,
                "score": score,
                "writes": outcome.writes(),
            }))?),
            OutputFormat::Quiet => Ok(status.to_string()),
            OutputFormat::Table => Ok(match outcome {
                ItemOutcome::Scored { score, writes } => {
                    self.success(&format!("Scored {} ({} write(s))", score, writes))
                }
                ItemOutcome::Cleared { writes } => self.warning(&format!(
                    "Factors incomplete; {} derived property write(s)",
                    writes
                )),
                ItemOutcome::Skipped => {
                    self.info("Item missing or without properties; nothing to do")
                }
                ItemOutcome::Failed => self.error("Reconciliation failed"),
            }),
        }
    }

    /// Format a migration outcome.
    pub fn format_migration(&self, outcome: &MigrationOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&match outcome {
                MigrationOutcome::Migrated { remaining, content } => serde_json::json!({
                    "status": "migrated",
                    "remaining": remaining,
                    "content": content,
                }),
                MigrationOutcome::LimitReached => serde_json::json!({ "status": "limit_reached" }),
                MigrationOutcome::Skipped => serde_json::json!({ "status": "skipped" }),
                MigrationOutcome::Failed => serde_json::json!({ "status": "failed" }),
            })?),
            OutputFormat::Quiet => Ok(match outcome {
                MigrationOutcome::Migrated { content, .. } => content.clone(),
                _ => String::new(),
            }),
            OutputFormat::Table => Ok(match outcome {
                MigrationOutcome::Migrated { content, .. } => self.success(content),
                MigrationOutcome::LimitReached => self.warning("Migration limit reached"),
                MigrationOutcome::Skipped => self.info("Item missing or empty; nothing to do"),
                MigrationOutcome::Failed => self.error("Migration failed"),
            }),
        }
    }

    /// Format a message the controller showed to the user.
    pub fn format_message(&self, message: &Message) -> String {
        match message.level {
            MessageLevel::Success => self.success(&message.text),
            MessageLevel::Info => self.info(&message.text),
            MessageLevel::Warning => self.warning(&message.text),
            MessageLevel::Error => self.error(&message.text),
        }
    }

    /// Format run metrics.
    pub fn format_metrics(&self, metrics: &SyncMetrics) -> String {
        self.colorize(&metrics.summary(), "cyan")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn tier_label(&self, tier: Tier) -> String {
        self.colorize(tier.as_str(), tier.color())
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "orange" => text.truecolor(255, 165, 0).to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn undefined_reason(factors: &FactorSet) -> String {
    if factors.is_complete() {
        "Score undefined: job size must be non-zero".to_string()
    } else {
        let missing: Vec<&str> = factors.missing().iter().map(|f| f.label()).collect();
        format!("Score undefined: missing {}", missing.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wsjf_domain::{ColorBand, Properties};

    fn evaluation(score: f64) -> Evaluation {
        Evaluation {
            factors: FactorSet::new(8.0, 5.0, 3.0, 2.0),
            score: Some(Score::from_value(score)),
            band: Some(ColorBand::Green),
            tier: None,
        }
    }

    #[test]
    fn test_json_evaluation() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_evaluation(&evaluation(8.0), 63.0).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["score"], 8.0);
        assert_eq!(value["band"], "green");
        assert_eq!(value["percent_of_max"], 13);
        assert!(value["tier"].is_null());
    }

    #[test]
    fn test_table_evaluation() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_evaluation(&evaluation(8.0), 63.0).unwrap();
        assert!(output.contains("Score"));
        assert!(output.contains("green"));
        assert!(output.contains("13%"));
    }

    #[test]
    fn test_quiet_evaluation() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(formatter.format_evaluation(&evaluation(1.33), 63.0).unwrap(), "1.33");
    }

    #[test]
    fn test_undefined_score_explains_why() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let incomplete = Evaluation {
            factors: FactorSet::from_properties(&Properties::new()),
            score: None,
            band: None,
            tier: None,
        };
        let output = formatter.format_evaluation(&incomplete, 63.0).unwrap();
        assert!(output.contains("missing Business Value"));

        let zero_size = Evaluation {
            factors: FactorSet::new(8.0, 5.0, 3.0, 0.0),
            ..incomplete
        };
        let output = formatter.format_evaluation(&zero_size, 63.0).unwrap();
        assert!(output.contains("job size must be non-zero"));
    }

    #[test]
    fn test_scales_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_scales(&FactorScales::coarse()).unwrap();
        assert!(output.contains("Work Size"));
        assert!(output.contains("Maximum score: 24"));
    }

    #[test]
    fn test_no_color() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("done"), "✓ done");
    }
}
