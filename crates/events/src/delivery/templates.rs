//! Email template contract.
//!
//! A template is identified by name and declares the data fields it needs.
//! Rendering checks the fields and produces subject, plain-text and HTML
//! bodies.

use serde_json::Value;

use super::email::EmailError;

/// The templates the monitoring engine sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailTemplate {
    /// An alert rule fired.
    AlertTriggered,
}

/// A template rendered against concrete data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

impl EmailTemplate {
    pub fn name(&self) -> &'static str {
        match self {
            EmailTemplate::AlertTriggered => "alert_triggered",
        }
    }

    /// Fields `render` requires in its data object.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            EmailTemplate::AlertTriggered => &[
                "rule_name",
                "module",
                "metric_name",
                "value",
                "condition",
                "threshold",
                "severity",
                "message",
                "triggered_at",
            ],
        }
    }

    pub fn render(&self, data: &Value) -> Result<RenderedEmail, EmailError> {
        let missing: Vec<_> = self
            .required_fields()
            .iter()
            .filter(|f| data.get(**f).map_or(true, Value::is_null))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(EmailError::Template(format!(
                "{} is missing fields: {}",
                self.name(),
                missing.join(", ")
            )));
        }

        let field = |name: &str| match &data[name] {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        match self {
            EmailTemplate::AlertTriggered => {
                let severity = field("severity").to_uppercase();
                let subject = format!("[{severity}] {}", field("rule_name"));
                let text_body = format!(
                    "{}\n\nModule: {}\nMetric: {}\nValue: {} ({} {})\nTriggered at: {}",
                    field("message"),
                    field("module"),
                    field("metric_name"),
                    field("value"),
                    field("condition"),
                    field("threshold"),
                    field("triggered_at"),
                );
                let html_body = format!(
                    "<h2>{}</h2><p>{}</p><table>\
                     <tr><th>Module</th><td>{}</td></tr>\
                     <tr><th>Metric</th><td>{}</td></tr>\
                     <tr><th>Value</th><td>{} ({} {})</td></tr>\
                     <tr><th>Triggered at</th><td>{}</td></tr>\
                     </table>",
                    escape_html(&subject),
                    escape_html(&field("message")),
                    escape_html(&field("module")),
                    escape_html(&field("metric_name")),
                    escape_html(&field("value")),
                    escape_html(&field("condition")),
                    escape_html(&field("threshold")),
                    escape_html(&field("triggered_at")),
                );
                Ok(RenderedEmail {
                    subject,
                    text_body,
                    html_body,
                })
            }
        }
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alert_data() -> Value {
        json!({
            "rule_name": "DB nearly full",
            "module": "database",
            "metric_name": "usage_percent",
            "value": 95.0,
            "condition": ">",
            "threshold": 90.0,
            "severity": "critical",
            "message": "DB nearly full: database.usage_percent is 95 (> 90)",
            "triggered_at": "2026-03-01T12:00:00Z",
        })
    }

    #[test]
    fn renders_alert_triggered() {
        let email = EmailTemplate::AlertTriggered.render(&alert_data()).unwrap();
        assert_eq!(email.subject, "[CRITICAL] DB nearly full");
        assert!(email.text_body.contains("Metric: usage_percent"));
        assert!(email.text_body.contains("Value: 95.0 (> 90.0)"));
        assert!(email.html_body.contains("(&gt; 90.0)"));
    }

    #[test]
    fn missing_fields_are_reported() {
        let mut data = alert_data();
        data.as_object_mut().unwrap().remove("threshold");
        data["module"] = Value::Null;
        let err = EmailTemplate::AlertTriggered.render(&data).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("module"));
        assert!(msg.contains("threshold"));
    }

    #[test]
    fn template_name() {
        assert_eq!(EmailTemplate::AlertTriggered.name(), "alert_triggered");
    }
}
