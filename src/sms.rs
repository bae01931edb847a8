//! Adapter for the Mobitel enterprise SMS SOAP API. One message per call:
//! open a session, send, close. Failures are logged and reported as a bool;
//! nothing user-facing ever blocks on this gateway.

use std::time::Duration;

use thiserror::Error;

use crate::config::SmsSettings;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
enum SmsError {
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("gateway response missing <{0}>")]
    MissingTag(&'static str),
    #[error("gateway rejected the session")]
    SessionRejected,
}

#[derive(Clone)]
pub struct SmsClient {
    http: reqwest::Client,
    settings: SmsSettings,
}

impl SmsClient {
    pub fn new(settings: SmsSettings) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build SMS gateway HTTP client");
        Self { http, settings }
    }

    /// Best-effort send. Returns false on any failure; the error is logged
    /// and never propagated.
    pub async fn send(&self, mobile: &str, message: &str) -> bool {
        match self.try_send(mobile, message).await {
            Ok(()) => {
                tracing::info!(mobile, "SMS sent");
                true
            }
            Err(err) => {
                tracing::warn!(mobile, error = %err, "SMS send failed");
                false
            }
        }
    }

    async fn try_send(&self, mobile: &str, message: &str) -> Result<(), SmsError> {
        let session = self.create_session().await?;
        let recipient = normalize_mobile(mobile);
        let result = self.send_messages(&session, message, &recipient).await;
        // The session is closed regardless of the send outcome.
        self.close_session(&session).await;
        result.map(|_| ())
    }

    async fn create_session(&self) -> Result<String, SmsError> {
        let envelope = format!(
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:api="http://api.soap.global.sms.sti.hsenid.com">
  <soapenv:Body>
    <api:createSession>
      <user>
        <id></id>
        <username>{username}</username>
        <password>{password}</password>
        <customer></customer>
      </user>
    </api:createSession>
  </soapenv:Body>
</soapenv:Envelope>"#,
            username = xml_escape(&self.settings.username),
            password = xml_escape(&self.settings.password),
        );

        let body = self.post(envelope).await?;
        let session = extract_tag(&body, "return").ok_or(SmsError::MissingTag("return"))?;
        if session.is_empty() {
            return Err(SmsError::SessionRejected);
        }
        Ok(session)
    }

    async fn send_messages(
        &self,
        session: &str,
        message: &str,
        recipient: &str,
    ) -> Result<String, SmsError> {
        let envelope = format!(
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:api="http://api.soap.global.sms.sti.hsenid.com">
  <soapenv:Body>
    <api:sendMessages>
      <session>{session}</session>
      <smsMessage>
        <message>{message}</message>
        <messageId></messageId>
        <recipients>{recipient}</recipients>
        <retries></retries>
        <sender>{sender}</sender>
        <messageType>0</messageType>
        <sequenceNum></sequenceNum>
        <status></status>
        <time></time>
        <type></type>
        <user></user>
      </smsMessage>
    </api:sendMessages>
  </soapenv:Body>
</soapenv:Envelope>"#,
            session = xml_escape(session),
            message = xml_escape(message),
            recipient = xml_escape(recipient),
            sender = xml_escape(&self.settings.alias),
        );

        let body = self.post(envelope).await?;
        extract_tag(&body, "return").ok_or(SmsError::MissingTag("return"))
    }

    async fn close_session(&self, session: &str) {
        let envelope = format!(
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:api="http://api.soap.global.sms.sti.hsenid.com">
  <soapenv:Body>
    <api:closeSession>
      <session>{}</session>
    </api:closeSession>
  </soapenv:Body>
</soapenv:Envelope>"#,
            xml_escape(session),
        );

        if let Err(err) = self.post(envelope).await {
            tracing::warn!(error = %err, "SMS session close failed");
        }
    }

    async fn post(&self, envelope: String) -> Result<String, SmsError> {
        let response = self
            .http
            .post(&self.settings.endpoint)
            .header("Content-Type", "text/xml; charset=utf-8")
            .body(envelope)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

/// International numbers arrive as +94XXXXXXXXX; the gateway wants the
/// local 07XXXXXXXX form.
pub fn normalize_mobile(mobile: &str) -> String {
    match mobile.strip_prefix("+94") {
        Some(rest) => format!("0{rest}"),
        None => mobile.to_string(),
    }
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Pulls the text content of the first `<tag>...</tag>` pair, ignoring any
/// namespace prefix on the tag.
fn extract_tag(body: &str, tag: &str) -> Option<String> {
    let open_plain = format!("<{tag}>");
    let start = match body.find(&open_plain) {
        Some(idx) => idx + open_plain.len(),
        None => {
            let open_ns = format!(":{tag}>");
            body.find(&open_ns)? + open_ns.len()
        }
    };
    let end = body[start..].find("</")?;
    Some(body[start..start + end].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_international_mobile_is_normalized_to_local() {
        assert_eq!(normalize_mobile("+94711111111"), "0711111111");
    }

    #[test]
    fn test_local_mobile_passes_through() {
        assert_eq!(normalize_mobile("0711111111"), "0711111111");
    }

    #[test]
    fn test_extract_tag_reads_plain_and_namespaced() {
        let plain = "<soap:Body><return>session-123</return></soap:Body>";
        assert_eq!(extract_tag(plain, "return").as_deref(), Some("session-123"));

        let namespaced = "<soap:Body><ns2:return>session-456</ns2:return></soap:Body>";
        assert_eq!(
            extract_tag(namespaced, "return").as_deref(),
            Some("session-456")
        );
    }

    #[test]
    fn test_extract_tag_missing_returns_none() {
        assert!(extract_tag("<soap:Body></soap:Body>", "return").is_none());
    }

    #[test]
    fn test_xml_escape_covers_markup_characters() {
        assert_eq!(xml_escape("a<b>&c"), "a&lt;b&gt;&amp;c");
    }
}
