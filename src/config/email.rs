// src/config/email.rs
use serde::Deserialize;

fn default_smtp_port() -> u16 {
    587
}

/// SMTP settings for the daily e-mail. Credentials normally come from the
/// environment (`SMTP_*`, `EMAIL_*`), not from the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub smtp_server: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Defaults to `username` when unset.
    pub from: Option<String>,
    pub recipients: Vec<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_server: None,
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
            from: None,
            recipients: Vec::new(),
        }
    }
}

impl EmailConfig {
    pub fn sender(&self) -> Option<&str> {
        self.from.as_deref().or(self.username.as_deref())
    }

    pub(crate) fn apply_env_from<F>(&mut self, get: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = get("SMTP_SERVER") {
            self.smtp_server = Some(v);
        }
        if let Some(v) = get("SMTP_PORT") {
            match v.parse::<u16>() {
                Ok(p) => self.smtp_port = p,
                Err(_) => tracing::warn!(value = %v, "ignoring invalid SMTP_PORT"),
            }
        }
        if let Some(v) = get("SMTP_USERNAME") {
            self.username = Some(v);
        }
        if let Some(v) = get("SMTP_PASSWORD") {
            self.password = Some(v);
        }
        if let Some(v) = get("EMAIL_SENDER") {
            self.from = Some(v);
        }
        if let Some(v) = get("EMAIL_RECIPIENTS") {
            self.recipients = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
    }
}
