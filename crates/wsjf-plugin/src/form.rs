//! Prioritization form model

use crate::PluginError;
use wsjf_domain::traits::UiSlot;
use wsjf_domain::{Factor, FactorScales, ItemId, Properties, ScaleOption};

/// UI slot the form renders into
pub const FORM_SLOT: &str = "wsjf-form-modal";

/// Submit button element id
pub const SUBMIT_ID: &str = "wsjf-submit";

/// Cancel button element id
pub const CANCEL_ID: &str = "wsjf-cancel";

const SELECT_STYLE: &str = "width: 100%; padding: 8px; border-radius: 4px; \
    border: 1px solid var(--ls-border-color); \
    background: var(--ls-secondary-background-color); color: var(--ls-primary-text-color);";

const LABEL_STYLE: &str = "display: block; margin-bottom: 5px; \
    color: var(--ls-primary-text-color); font-weight: 600;";

/// Element id of a factor's dropdown
pub fn field_id(factor: Factor) -> String {
    format!("wsjf-{}", factor.code())
}

fn icon(factor: Factor) -> &'static str {
    match factor {
        Factor::BusinessValue => "💰",
        Factor::TimeCriticality => "⏰",
        Factor::RiskReduction => "🛡️",
        Factor::JobSize => "📏",
    }
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// One dropdown of the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Factor this dropdown sets
    pub factor: Factor,
    /// Options in display order
    pub options: Vec<ScaleOption>,
    /// Preselected option value
    pub selected: Option<u32>,
}

impl FormField {
    fn render(&self, html: &mut String, last: bool) {
        let margin = if last { 20 } else { 15 };
        html.push_str(&format!("<div style=\"margin-bottom: {}px;\">", margin));
        html.push_str(&format!(
            "<label style=\"{}\">{} {}:</label>",
            LABEL_STYLE,
            icon(self.factor),
            escape_html(self.factor.label())
        ));
        html.push_str(&format!(
            "<select id=\"{}\" style=\"{}\">",
            field_id(self.factor),
            SELECT_STYLE
        ));
        html.push_str("<option value=\"\">Select...</option>");
        for option in &self.options {
            let selected = if self.selected == Some(option.value) { " selected" } else { "" };
            html.push_str(&format!(
                "<option value=\"{}\"{}>{}</option>",
                option.value,
                selected,
                escape_html(&option.label)
            ));
        }
        html.push_str("</select></div>");
    }
}

/// The modal form for scoring one item
///
/// Built from the configured scales. A factor already stored on the item is
/// preselected when its value is one of the options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrioritizationForm {
    /// Item the form scores
    pub item: ItemId,
    /// Dropdowns in factor order
    pub fields: Vec<FormField>,
}

impl PrioritizationForm {
    /// Build the form for an item's current properties
    pub fn new(item: ItemId, properties: &Properties, scales: &FactorScales) -> Self {
        let fields = Factor::ALL
            .into_iter()
            .map(|factor| {
                let scale = scales.scale(factor);
                let selected = factor
                    .resolve(properties)
                    .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= f64::from(u32::MAX))
                    .map(|v| v as u32)
                    .filter(|v| scale.contains(*v));
                FormField {
                    factor,
                    options: scale.options().to_vec(),
                    selected,
                }
            })
            .collect();
        Self { item, fields }
    }

    /// Preselected value for a factor
    pub fn selected(&self, factor: Factor) -> Option<u32> {
        self.fields
            .iter()
            .find(|f| f.factor == factor)
            .and_then(|f| f.selected)
    }

    /// Modal markup
    pub fn render_html(&self) -> String {
        let mut html = String::with_capacity(4096);
        html.push_str(
            "<div id=\"wsjf-form\" style=\"padding: 20px; \
             background: var(--ls-primary-background-color); \
             border-radius: 8px; max-width: 400px;\">",
        );
        html.push_str(
            "<h3 style=\"margin-top: 0; color: var(--ls-primary-text-color);\">\
             🎯 Prioritize</h3>",
        );
        html.push_str(
            "<p style=\"font-size: 12px; color: var(--ls-secondary-text-color); \
             margin-bottom: 20px;\">Score each factor for this work task.</p>",
        );
        let last = self.fields.len().saturating_sub(1);
        for (i, field) in self.fields.iter().enumerate() {
            field.render(&mut html, i == last);
        }
        html.push_str("<div style=\"display: flex; gap: 10px;\">");
        html.push_str(&format!(
            "<button id=\"{}\" style=\"flex: 1; padding: 10px; background: #3b82f6; color: white; \
             border: none; border-radius: 4px; cursor: pointer; font-weight: 600;\">Apply</button>",
            SUBMIT_ID
        ));
        html.push_str(&format!(
            "<button id=\"{}\" style=\"flex: 1; padding: 10px; \
             background: var(--ls-secondary-background-color); \
             color: var(--ls-primary-text-color); border: 1px solid var(--ls-border-color); \
             border-radius: 4px; cursor: pointer;\">Cancel</button>",
            CANCEL_ID
        ));
        html.push_str("</div></div>");
        html
    }

    /// Centered modal slot carrying the rendered form
    pub fn slot(&self) -> UiSlot {
        let style = [
            ("position", "fixed"),
            ("top", "50%"),
            ("left", "50%"),
            ("transform", "translate(-50%, -50%)"),
            ("zIndex", "999"),
            ("boxShadow", "0 4px 20px rgba(0,0,0,0.3)"),
        ];
        UiSlot {
            key: FORM_SLOT.to_string(),
            template: self.render_html(),
            style: style
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Leading unsigned integer of a dropdown value; unselected is zero
fn parse_selection(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let digits = trimmed.len() - trimmed.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    trimmed[..digits].parse().unwrap_or(0)
}

/// Values the user picked, in factor order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormSubmission {
    /// Business value; zero when unselected
    pub business_value: u32,
    /// Time criticality; zero when unselected
    pub time_criticality: u32,
    /// Risk reduction; zero when unselected
    pub risk_reduction: u32,
    /// Job size; zero when unselected
    pub job_size: u32,
}

impl FormSubmission {
    /// Create a submission from selected values
    pub fn new(
        business_value: u32,
        time_criticality: u32,
        risk_reduction: u32,
        job_size: u32,
    ) -> Self {
        Self {
            business_value,
            time_criticality,
            risk_reduction,
            job_size,
        }
    }

    /// Create a submission from raw dropdown values
    ///
    /// ```
    /// use wsjf_plugin::FormSubmission;
    ///
    /// let submission = FormSubmission::from_raw(["8", "5", "", "2"]);
    /// assert_eq!(submission.risk_reduction, 0);
    /// assert!(submission.validate().is_err());
    /// ```
    pub fn from_raw(values: [&str; 4]) -> Self {
        let [bv, tc, rr, js] = values.map(parse_selection);
        Self::new(bv, tc, rr, js)
    }

    /// Value for a factor
    pub fn get(&self, factor: Factor) -> u32 {
        match factor {
            Factor::BusinessValue => self.business_value,
            Factor::TimeCriticality => self.time_criticality,
            Factor::RiskReduction => self.risk_reduction,
            Factor::JobSize => self.job_size,
        }
    }

    /// Every factor selected and non-zero; returns the values in factor order
    pub fn validate(&self) -> Result<[(Factor, u32); 4], PluginError> {
        let values = Factor::ALL.map(|factor| (factor, self.get(factor)));
        if values.iter().any(|(_, v)| *v == 0) {
            return Err(PluginError::IncompleteForm);
        }
        Ok(values)
    }
}
