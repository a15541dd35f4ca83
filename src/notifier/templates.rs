/// Link a user follows to redeem a verification token.
pub fn verification_link(base_url: &str, token: &str) -> String {
    format!("{}/verify-email?token={token}", base_url.trim_end_matches('/'))
}

/// Rendered verification email.
pub struct VerificationEmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl VerificationEmailContent {
    pub fn new(name: &str, link: &str) -> Self {
        Self {
            subject: "Verify Your Email Address".to_owned(),
            text: format!(
                "Hi {name},\n\nPlease confirm your email address by opening the link below:\n\n{link}\n\nIf you did not create an account, you can ignore this email.\n"
            ),
            html: format!(
                r#"<!DOCTYPE html>
<html>
<body style="font-family: sans-serif; line-height: 1.6; color: #333;">
    <h1>Verify Your Email Address</h1>
    <p>Hi {name},</p>
    <p>Please confirm your email address by clicking the button below.</p>
    <p><a href="{link}" style="display: inline-block; padding: 12px 24px; background: #2563eb; color: #fff; text-decoration: none; border-radius: 6px;">Verify Email</a></p>
    <p>Or paste this link into your browser:<br>{link}</p>
    <p style="color: #888; font-size: 12px;">If you did not create an account, you can ignore this email.</p>
</body>
</html>"#
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_link() {
        assert_eq!(
            verification_link("http://localhost:3000", "abc"),
            "http://localhost:3000/verify-email?token=abc"
        );
        assert_eq!(
            verification_link("https://app.example.com/", "abc"),
            "https://app.example.com/verify-email?token=abc"
        );
    }

    #[test]
    fn test_content_embeds_link() {
        let content = VerificationEmailContent::new("Jane", "http://x/verify-email?token=abc");
        assert_eq!(content.subject, "Verify Your Email Address");
        assert!(content.text.contains("Hi Jane"));
        assert!(content.text.contains("token=abc"));
        assert!(content.html.contains("href=\"http://x/verify-email?token=abc\""));
    }
}
