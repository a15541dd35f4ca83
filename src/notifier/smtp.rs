use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};

use super::{Notifier, NotifyError, VerificationEmailContent, verification_link};
use crate::config::EmailConfig;

/// Delivers email through an SMTP relay.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    /// Port 465 uses implicit TLS. Any other port uses STARTTLS when TLS is on.
    pub fn new(config: &EmailConfig) -> Result<Self, NotifyError> {
        let host = config.host.as_str();
        let mut builder = if config.use_tls {
            let tls = TlsParameters::new(host.to_owned())
                .map_err(|e| NotifyError::InvalidConfig(format!("TLS configuration error: {e}")))?;

            if config.port == 465 {
                AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                    .map_err(|e| NotifyError::InvalidConfig(format!("SMTP relay error: {e}")))?
                    .port(config.port)
                    .tls(Tls::Wrapper(tls))
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                    .map_err(|e| NotifyError::InvalidConfig(format!("SMTP relay error: {e}")))?
                    .port(config.port)
                    .tls(Tls::Required(tls))
            }
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(config.port)
        };

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(
                user.clone(),
                pass.expose_secret().to_owned(),
            ));
        }

        let from = config
            .from
            .parse()
            .map_err(|e| NotifyError::InvalidConfig(format!("Invalid from address: {e}")))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_verification_email(
        &self,
        to: &str,
        name: &str,
        token: &str,
        base_url: &str,
    ) -> Result<(), NotifyError> {
        let content = VerificationEmailContent::new(name, &verification_link(base_url, token));

        let message = Message::builder()
            .from(self.from.clone())
            .to(to
                .parse()
                .map_err(|e| NotifyError::SendFailed(format!("Invalid recipient: {e}")))?)
            .subject(content.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(content.text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(content.html),
                    ),
            )
            .map_err(|e| NotifyError::SendFailed(format!("Failed to build email: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(port: u16, use_tls: bool) -> EmailConfig {
        EmailConfig {
            host: "localhost".to_owned(),
            port,
            username: Some("user".to_owned()),
            password: Some("pass".into()),
            from: "noreply@localhost".to_owned(),
            use_tls,
        }
    }

    #[test]
    fn test_plain_transport() {
        assert!(SmtpNotifier::new(&config(25, false)).is_ok());
    }

    #[test]
    fn test_bad_from_address() {
        let mut config = config(25, false);
        config.from = "not an address".to_owned();
        assert!(matches!(
            SmtpNotifier::new(&config),
            Err(NotifyError::InvalidConfig(_))
        ));
    }
}
