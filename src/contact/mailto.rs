use crate::contact::ContactMessage;
use std::fmt::Write;

/// Builds the `mailto:` link used when no email service is configured.
pub fn mailto_link(recipient: &str, message: &ContactMessage) -> String {
    let subject = format!("{} - from {}", message.subject, message.name);
    let body = format!("From: {} ({})\n\n{}", message.name, message.email, message.message);

    format!(
        "mailto:{}?subject={}&body={}",
        recipient,
        encode_uri_component(&subject),
        encode_uri_component(&body)
    )
}

/// Percent-encodes everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub fn encode_uri_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || b"-_.!~*'()".contains(&byte) {
            encoded.push(byte as char);
        } else {
            let _ = write!(encoded, "%{:02X}", byte);
        }
    }
    encoded
}
