mod content_fingerprint;

pub use content_fingerprint::content_fingerprint;
