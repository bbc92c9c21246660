use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::MailError;
use crate::grant::format_date;

/// An outgoing HTML email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Something that can deliver an [`Email`]
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), MailError>;
}

/// Subject line for the report sent on `today`
pub fn subject_line(today: NaiveDate) -> String {
    format!("🟢 New Grants for Nonprofits – {}", format_date(today))
}

/// Emails grant reports to a single fixed recipient
pub struct Notifier {
    transport: Box<dyn MailTransport>,
    sender: String,
    recipient: String,
}

impl Notifier {
    pub fn new(transport: Box<dyn MailTransport>, sender: impl Into<String>, recipient: impl Into<String>) -> Self {
        Notifier {
            transport,
            sender: sender.into(),
            recipient: recipient.into(),
        }
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Send `html` as the report for `today`
    pub async fn notify(&self, html: &str, today: NaiveDate) -> Result<(), MailError> {
        let email = Email {
            from: self.sender.clone(),
            to: self.recipient.clone(),
            subject: subject_line(today),
            html: html.to_string(),
        };
        log::debug!("sending grant report to {}", email.to);
        self.transport.send(&email).await
    }
}

#[cfg(feature = "web")]
pub use smtp::SmtpMailTransport;

#[cfg(feature = "web")]
mod smtp {
    use super::{Email, MailTransport};
    use crate::config::MailConfig;
    use crate::error::MailError;
    use async_trait::async_trait;
    use lettre::message::{Mailbox, MultiPart, SinglePart};
    use lettre::transport::smtp::authentication::Credentials;
    use lettre::transport::smtp::client::{Tls, TlsParameters};
    use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
    use std::time::Duration;

    /// SMTP relay over implicit TLS with password authentication
    pub struct SmtpMailTransport {
        smtp: AsyncSmtpTransport<Tokio1Executor>,
        timeout: Duration,
    }

    impl SmtpMailTransport {
        pub fn new(config: &MailConfig, timeout: Duration) -> Result<Self, MailError> {
            let creds = Credentials::new(config.sender.clone(), config.app_password.clone());

            let tls_parameters = TlsParameters::new(config.smtp_host.clone())
                .map_err(|e| MailError::Transport(e.to_string()))?;

            let smtp = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .map_err(|e| MailError::Transport(e.to_string()))?
                .credentials(creds)
                .port(config.smtp_port)
                .tls(Tls::Wrapper(tls_parameters))
                .build();

            Ok(SmtpMailTransport { smtp, timeout })
        }
    }

    #[async_trait]
    impl MailTransport for SmtpMailTransport {
        async fn send(&self, email: &Email) -> Result<(), MailError> {
            let message = build_message(email)?;
            tokio::time::timeout(self.timeout, self.smtp.send(message))
                .await
                .map_err(|_| MailError::Transport(format!("timed out after {:?}", self.timeout)))?
                .map_err(|e| MailError::Transport(e.to_string()))?;
            Ok(())
        }
    }

    /// Compose a multipart/alternative message carrying the HTML body
    pub(super) fn build_message(email: &Email) -> Result<Message, MailError> {
        let from: Mailbox = email
            .from
            .parse()
            .map_err(|_| MailError::Address(email.from.clone()))?;
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|_| MailError::Address(email.to.clone()))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.clone())
            .multipart(MultiPart::alternative().singlepart(SinglePart::html(email.html.clone())))
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::formatter::format_html_table;
    use crate::grant::sample_grants;
    use std::sync::{Arc, Mutex};

    /// Keeps every email instead of sending it
    #[derive(Clone, Default)]
    pub(crate) struct RecordingTransport {
        pub(crate) sent: Arc<Mutex<Vec<Email>>>,
        pub(crate) fail: bool,
    }

    impl RecordingTransport {
        pub(crate) fn failing() -> Self {
            RecordingTransport {
                fail: true,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(&self, email: &Email) -> Result<(), MailError> {
            self.sent.lock().unwrap().push(email.clone());
            if self.fail {
                return Err(MailError::Transport("535 authentication failed".to_string()));
            }
            Ok(())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    #[test]
    fn subject_carries_date() {
        assert_eq!(subject_line(today()), "🟢 New Grants for Nonprofits – 07/01/2025");
    }

    #[tokio::test]
    async fn sends_exactly_one_message_to_recipient() {
        let transport = RecordingTransport::default();
        let notifier = Notifier::new(Box::new(transport.clone()), "me@example.com", "board@example.org");
        let html = format_html_table(&sample_grants(today()));

        notifier.notify(&html, today()).await.unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "board@example.org");
        assert_eq!(sent[0].from, "me@example.com");
        assert_eq!(sent[0].html, html);
        assert_eq!(sent[0].subject, subject_line(today()));
    }

    #[tokio::test]
    async fn transport_error_is_returned() {
        let notifier = Notifier::new(
            Box::new(RecordingTransport::failing()),
            "me@example.com",
            "board@example.org",
        );
        let err = notifier.notify("<html></html>", today()).await.unwrap_err();
        assert!(matches!(err, MailError::Transport(_)));
    }

    #[cfg(feature = "web")]
    #[test]
    fn message_is_html_alternative() {
        let email = Email {
            from: "me@example.com".to_string(),
            to: "board@example.org".to_string(),
            subject: subject_line(today()),
            html: "<html><body>hi</body></html>".to_string(),
        };
        let message = smtp::build_message(&email).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/html"));
        assert!(raw.contains("To: board@example.org"));
    }

    #[cfg(feature = "web")]
    #[test]
    fn bad_address_is_rejected() {
        let email = Email {
            from: "not an address".to_string(),
            to: "board@example.org".to_string(),
            subject: "s".to_string(),
            html: String::new(),
        };
        assert!(matches!(smtp::build_message(&email), Err(MailError::Address(_))));
    }
}
