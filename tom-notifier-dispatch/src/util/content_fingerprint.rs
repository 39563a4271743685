use sha2::{Digest, Sha256};

///
/// Lowercase hex SHA-256 of `recipient_id:channel_type:title:body`.
///
/// Notifications with equal fingerprints are treated as the same content.
///
pub fn content_fingerprint(
    recipient_id: &str,
    channel_type: &str,
    title: &str,
    body: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(recipient_id.as_bytes());
    hasher.update(b":");
    hasher.update(channel_type.as_bytes());
    hasher.update(b":");
    hasher.update(title.as_bytes());
    hasher.update(b":");
    hasher.update(body.as_bytes());

    hex::encode(hasher.finalize())
}
