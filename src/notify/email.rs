use anyhow::{anyhow, Context, Result};
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use super::EmailContent;
use crate::config::EmailConfig;

pub struct EmailSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailSender {
    /// STARTTLS relay on the configured port, authenticated when a username
    /// is set.
    pub fn from_config(cfg: &EmailConfig) -> Result<Self> {
        let host = cfg
            .smtp_server
            .as_deref()
            .ok_or_else(|| anyhow!("SMTP_SERVER missing"))?;
        let from_addr = cfg
            .sender()
            .ok_or_else(|| anyhow!("EMAIL_SENDER / SMTP_USERNAME missing"))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .with_context(|| format!("invalid SMTP_SERVER {host}"))?
            .port(cfg.smtp_port);
        if let Some(user) = &cfg.username {
            let pass = cfg.password.clone().unwrap_or_default();
            builder = builder.credentials(Credentials::new(user.clone(), pass));
        }

        let from = from_addr
            .parse()
            .with_context(|| format!("invalid sender address {from_addr}"))?;

        Ok(Self {
            mailer: builder.build(),
            from,
        })
    }

    pub fn build_message(from: &Mailbox, recipient: &str, content: &EmailContent) -> Result<Message> {
        let to: Mailbox = recipient
            .parse()
            .with_context(|| format!("invalid recipient {recipient}"))?;
        Message::builder()
            .from(from.clone())
            .to(to)
            .subject(content.subject.clone())
            .header(header::ContentType::TEXT_HTML)
            .body(content.html.clone())
            .context("build email")
    }

    pub async fn send(&self, recipient: &str, content: &EmailContent) -> Result<()> {
        let msg = Self::build_message(&self.from, recipient, content)?;
        self.mailer.send(msg).await.context("send email")?;
        Ok(())
    }

    /// Send to every recipient; one failure does not stop the rest.
    /// Returns how many messages went out.
    pub async fn send_all(&self, recipients: &[String], content: &EmailContent) -> usize {
        let mut sent = 0;
        for r in recipients {
            match self.send(r, content).await {
                Ok(()) => {
                    tracing::info!(target: "notify", recipient = %r, "email sent");
                    sent += 1;
                }
                Err(e) => tracing::warn!(target: "notify", recipient = %r, error = ?e, "failed to send email"),
            }
        }
        sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> EmailContent {
        EmailContent {
            subject: "Bitcoin Sentiment Alert: Neutral on 2025-01-06".into(),
            html: "<p>hi</p>".into(),
        }
    }

    #[test]
    fn builds_html_message() {
        let from: Mailbox = "Sage <sage@example.com>".parse().unwrap();
        let msg = EmailSender::build_message(&from, "ops@example.com", &content()).unwrap();
        let raw = String::from_utf8(msg.formatted()).unwrap();
        assert!(raw.contains("Content-Type: text/html"));
        assert!(raw.contains("To: ops@example.com"));
    }

    #[test]
    fn rejects_bad_recipient() {
        let from: Mailbox = "sage@example.com".parse().unwrap();
        assert!(EmailSender::build_message(&from, "not an address", &content()).is_err());
    }

    #[test]
    fn config_without_server_is_an_error() {
        let cfg = EmailConfig::default();
        assert!(EmailSender::from_config(&cfg).is_err());
    }
}
