use super::*;
use crate::test_support::{system_font_paths, system_fonts};

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("fonts/a.ttf").unwrap(), "fonts/a.ttf");
    assert_eq!(normalize_rel_path("fonts\\a.ttf").unwrap(), "fonts/a.ttf");
    assert_eq!(normalize_rel_path("./fonts//a.ttf").unwrap(), "fonts/a.ttf");
    assert!(normalize_rel_path("../x.ttf").is_err());
    assert!(normalize_rel_path("/abs.ttf").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./.").is_err());
}

#[test]
fn garbage_bytes_are_not_a_font() {
    assert!(!is_loadable_font(b"definitely not a font"));
    assert!(!is_loadable_font(&[]));
}

#[test]
fn missing_files_yield_font_asset_error() {
    let provider = FsFontProvider::new("/nonexistent-font-root");
    let err = provider
        .resolve(&["a.ttf".to_string(), "b.ttf".to_string()])
        .unwrap_err();
    assert!(err.is_font_asset());
    assert!(err.to_string().contains("no fonts available"));
}

#[test]
fn memory_provider_filters_unparsable_faces() {
    let provider = MemoryFontProvider::new().with_face("junk", b"junk".to_vec());
    let err = provider.resolve(&["junk".to_string()]).unwrap_err();
    assert!(err.is_font_asset());
}

#[test]
fn fs_provider_resolves_absolute_paths_and_caches_bytes() {
    let paths = system_font_paths();
    let Some(path) = paths.first() else {
        eprintln!("no system fonts found; skipping");
        return;
    };
    let provider = FsFontProvider::new(".");
    let candidates = vec![
        "missing/Nope.ttf".to_string(),
        path.to_string(),
        path.to_string(),
    ];
    let a = provider.resolve(&candidates).unwrap();
    assert_eq!(a.len(), 1);
    assert_eq!(a[0].id, *path);

    let b = provider.resolve(&candidates).unwrap();
    assert!(Arc::ptr_eq(&a[0].data, &b[0].data));
}

#[test]
fn memory_provider_keeps_candidate_order() {
    let Some(provider) = system_fonts() else {
        return;
    };
    let mut ids = provider.ids();
    ids.reverse();
    let faces = provider.resolve(&ids).unwrap();
    let got: Vec<_> = faces.iter().map(|f| f.id.clone()).collect();
    assert_eq!(got, ids);
}
