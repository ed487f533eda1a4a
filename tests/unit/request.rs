use super::*;
use crate::assets::fonts::FontFace;
use crate::foundation::error::{GarbleError, GarbleResult};

#[test]
fn query_text_is_decoded() {
    let req = ImageRequest::from_query("?size=2&text=hello+w%C3%B6rld%21");
    assert_eq!(req.text.as_deref(), Some("hello wörld!"));
}

#[test]
fn missing_text_is_none() {
    assert_eq!(ImageRequest::from_query("").text, None);
    assert_eq!(ImageRequest::from_query("foo=bar").text, None);
}

#[test]
fn bare_key_is_empty_text() {
    assert_eq!(ImageRequest::from_query("text").text.as_deref(), Some(""));
}

#[test]
fn first_text_parameter_wins() {
    let req = ImageRequest::from_query("text=a&text=b");
    assert_eq!(req.text.as_deref(), Some("a"));
}

#[test]
fn malformed_escapes_are_literal() {
    assert_eq!(decode_component("100%"), "100%");
    assert_eq!(decode_component("%zz1"), "%zz1");
    assert_eq!(decode_component("%4"), "%4");
    assert_eq!(decode_component("%41"), "A");
}

struct Broken;

impl FontProvider for Broken {
    fn resolve(&self, _candidates: &[String]) -> GarbleResult<Vec<FontFace>> {
        Err(GarbleError::font_asset("no fonts available"))
    }
}

#[test]
fn failures_map_to_500() {
    let cfg = GarbleConfig::default();
    let resp = handle_request("text=hi", &cfg, &Broken, &mut RandomSource::seeded(0));
    assert_eq!(resp.status, 500);
    assert!(!resp.is_success());
    assert!(resp.content_type.starts_with("text/plain"));
    assert!(String::from_utf8_lossy(&resp.body).contains("font"));
}

#[test]
fn success_returns_png() {
    let Some(fonts) = crate::test_support::system_fonts() else { return };
    let cfg = GarbleConfig {
        fonts: crate::config::FontConfig {
            candidates: fonts.ids(),
            ..Default::default()
        },
        ..GarbleConfig::default()
    };
    let resp = handle_request("text=CAPTCHA", &cfg, &fonts, &mut RandomSource::seeded(1));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.content_type, "image/png");
    assert_eq!(&resp.body[..4], b"\x89PNG");
}
