//! Minimal request/response shim around the pipeline.
//!
//! Transports hand over the raw query string and get back a status, a content type and a body.
//! The only input handling done here is parameter extraction; defaults and truncation come from
//! [`GarbleConfig::request_text`].

use crate::assets::fonts::FontProvider;
use crate::config::GarbleConfig;
use crate::foundation::rng::RandomSource;
use crate::render::pipeline::render_png;

/// Parsed image request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageRequest {
    /// Decoded `text` parameter, if present.
    pub text: Option<String>,
}

impl ImageRequest {
    /// Parse a URL query string such as `text=hello%20world`. A leading `?` is ignored and the
    /// first `text` parameter wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let text = query
            .split('&')
            .filter_map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(k) == "text").then(|| decode_component(v))
            })
            .next();
        Self { text }
    }
}

/// Transport-neutral response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageResponse {
    /// HTTP-style status code.
    pub status: u16,
    /// MIME type of `body`.
    pub content_type: &'static str,
    /// Response payload.
    pub body: Vec<u8>,
}

impl ImageResponse {
    /// `true` for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Render the image for `query`. Failures become a 500 with a plain-text body.
pub fn handle_request(
    query: &str,
    config: &GarbleConfig,
    fonts: &dyn FontProvider,
    rng: &mut RandomSource,
) -> ImageResponse {
    let req = ImageRequest::from_query(query);
    let text = config.request_text(req.text.as_deref());
    match render_png(&text, config, fonts, rng) {
        Ok(img) => ImageResponse {
            status: 200,
            content_type: img.content_type(),
            body: img.png,
        },
        Err(e) => {
            tracing::error!(error = %e, "image generation failed");
            ImageResponse {
                status: 500,
                content_type: "text/plain; charset=utf-8",
                body: format!("image generation failed: {e}").into_bytes(),
            }
        }
    }
}

/// Decode `+` and `%XX` escapes; malformed escapes are kept literally and invalid UTF-8 is
/// replaced.
fn decode_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 2;
                    }
                    _ => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/unit/request.rs"]
mod tests;
