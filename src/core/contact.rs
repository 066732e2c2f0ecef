use std::sync::Arc;

use crate::domain::model::ContactMessage;
use crate::domain::ports::Mailer;
use crate::utils::error::{PortfolioError, Result};
use crate::utils::validation::validate_email_address;

impl ContactMessage {
    pub fn subject(&self) -> String {
        format!("New Portfolio Contact from {}", self.name.trim())
    }

    /// HTML body for the site owner. Visitor input is escaped.
    pub fn html_body(&self) -> String {
        format!(
            "<p>Name: {}</p><p>Email: {}</p><p>Message: {}</p>",
            escape_html(self.name.trim()),
            escape_html(self.email.trim()),
            escape_html(self.message.trim()).replace('\n', "<br>")
        )
    }

    pub fn text_body(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\nMessage: {}",
            self.name.trim(),
            self.email.trim(),
            self.message.trim()
        )
    }
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
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

#[derive(Clone)]
pub struct ContactService {
    mailer: Arc<dyn Mailer>,
}

impl ContactService {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    pub async fn send(&self, message: ContactMessage) -> Result<()> {
        if [&message.name, &message.email, &message.message]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(PortfolioError::validation("All fields are required."));
        }
        validate_email_address(&message.email)?;

        self.mailer.send(&message).await?;
        tracing::info!("Relayed contact message from {}", message.email.trim());
        Ok(())
    }
}
