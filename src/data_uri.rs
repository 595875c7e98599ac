use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// A 1x1 transparent PNG, served when no slide resolves at all.
pub const TRANSPARENT_PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mP8/x8AAwMCAO3f0CkAAAAASUVORK5CYII=";

/// Inline `bytes` as a `data:` URI with the given MIME type.
#[must_use]
pub fn encode(bytes: &[u8], mime: &str) -> String {
    let payload = STANDARD.encode(bytes);
    let mut uri = String::with_capacity(mime.len() + payload.len() + 13);
    uri.push_str("data:");
    uri.push_str(mime);
    uri.push_str(";base64,");
    uri.push_str(&payload);
    uri
}
