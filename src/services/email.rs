//! Outbound form mail — contact, quote, booking, and custom enquiries.
//!
//! The core treats delivery as a collaborator: form payloads are freeform
//! JSON from the site's forms, rendered into a simple key/value email.

use resend_rs::Resend;
use resend_rs::types::CreateEmailBaseOptions;

/// Resend configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_key: String,
    pub from: String,
    pub to: String,
}

impl EmailConfig {
    /// Load from `RESEND_API_KEY`, `EMAIL_FROM`, `EMAIL_TO`. Returns `None`
    /// if any are missing (form mail will be disabled).
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("RESEND_API_KEY").ok()?;
        let from = std::env::var("EMAIL_FROM").ok()?;
        let to = std::env::var("EMAIL_TO").ok()?;
        Some(Self { api_key, from, to })
    }
}

/// The form surfaces that dispatch mail through this endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Contact,
    Quote,
    Booking,
    Custom,
}

impl FormKind {
    #[must_use]
    pub fn subject(self) -> &'static str {
        match self {
            Self::Contact => "New contact enquiry",
            Self::Quote => "New quote request",
            Self::Booking => "New booking request",
            Self::Custom => "New custom trip request",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("email delivery failed: {0}")]
    Delivery(String),
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the form payload as a key/value HTML body. Objects become one row
/// per field; anything else is rendered verbatim.
#[must_use]
pub fn render_form_html(kind: FormKind, data: &serde_json::Value) -> String {
    let mut html = format!("<h2>{}</h2><table>", kind.subject());
    match data {
        serde_json::Value::Object(fields) => {
            for (key, value) in fields {
                let rendered = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                html.push_str(&format!(
                    "<tr><td><strong>{}</strong></td><td>{}</td></tr>",
                    escape_html(key),
                    escape_html(&rendered)
                ));
            }
        }
        serde_json::Value::String(s) => {
            html.push_str(&format!("<tr><td>{}</td></tr>", escape_html(s)));
        }
        other => {
            html.push_str(&format!("<tr><td>{}</td></tr>", escape_html(&other.to_string())));
        }
    }
    html.push_str("</table>");
    html
}

/// Send a form submission, returning the provider message id.
pub async fn send_form(config: &EmailConfig, kind: FormKind, data: &serde_json::Value) -> Result<String, EmailError> {
    let resend = Resend::new(&config.api_key);
    let to = [config.to.as_str()];
    let html = render_form_html(kind, data);

    let email = CreateEmailBaseOptions::new(&config.from, to, kind.subject()).with_html(&html);
    let sent = resend
        .emails
        .send(email)
        .await
        .map_err(|e| EmailError::Delivery(e.to_string()))?;
    Ok(sent.id.to_string())
}

#[cfg(test)]
#[path = "email_test.rs"]
mod tests;
