use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, RwLock};

use crate::config::FontConfig;
use crate::foundation::error::{GarbleError, GarbleResult};

/// A loadable font face: its identifier and raw file bytes.
#[derive(Clone, Debug)]
pub struct FontFace {
    /// Candidate identifier the face was resolved from.
    pub id: String,
    /// Font file bytes, shared read-only across requests.
    pub data: Arc<Vec<u8>>,
}

/// Resolves candidate font identifiers into loadable faces.
///
/// Implementations return the candidates that load, in candidate order, and fail with
/// [`GarbleError::FontAsset`] when none do. The pipeline never touches the filesystem itself.
pub trait FontProvider: Send + Sync {
    /// Resolve `candidates` into usable faces.
    fn resolve(&self, candidates: &[String]) -> GarbleResult<Vec<FontFace>>;
}

static FONT_CACHE: LazyLock<RwLock<HashMap<PathBuf, Arc<Vec<u8>>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Filesystem-backed provider with a process-wide byte cache.
#[derive(Clone, Debug)]
pub struct FsFontProvider {
    root: PathBuf,
}

impl FsFontProvider {
    /// Provider resolving relative identifiers against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Provider rooted at [`FontConfig::root`].
    pub fn from_config(cfg: &FontConfig) -> Self {
        Self::new(cfg.root.clone())
    }

    fn path_for(&self, id: &str) -> GarbleResult<PathBuf> {
        if Path::new(id).is_absolute() {
            return Ok(PathBuf::from(id));
        }
        let norm = normalize_rel_path(id)?;
        Ok(self.root.join(Path::new(&norm)))
    }

    fn load(&self, id: &str) -> GarbleResult<Arc<Vec<u8>>> {
        let path = self.path_for(id)?;
        {
            let cache = FONT_CACHE
                .read()
                .map_err(|_| GarbleError::evaluation("font cache lock poisoned"))?;
            if let Some(bytes) = cache.get(&path) {
                return Ok(bytes.clone());
            }
        }

        let bytes = std::fs::read(&path).map_err(|e| {
            GarbleError::font_asset(format!("failed to read font '{}': {e}", path.display()))
        })?;
        if !is_loadable_font(&bytes) {
            return Err(GarbleError::font_asset(format!(
                "'{}' contains no usable font family",
                path.display()
            )));
        }

        let bytes = Arc::new(bytes);
        let mut cache = FONT_CACHE
            .write()
            .map_err(|_| GarbleError::evaluation("font cache lock poisoned"))?;
        Ok(cache.entry(path).or_insert(bytes).clone())
    }
}

impl FontProvider for FsFontProvider {
    fn resolve(&self, candidates: &[String]) -> GarbleResult<Vec<FontFace>> {
        let mut out = Vec::<FontFace>::new();
        for id in candidates {
            if out.iter().any(|f| &f.id == id) {
                continue;
            }
            match self.load(id) {
                Ok(data) => out.push(FontFace {
                    id: id.clone(),
                    data,
                }),
                Err(e) => tracing::warn!(font = %id, error = %e, "skipping font candidate"),
            }
        }
        if out.is_empty() {
            return Err(GarbleError::font_asset(format!(
                "no fonts available (tried {} candidates under '{}')",
                candidates.len(),
                self.root.display()
            )));
        }
        tracing::debug!(faces = out.len(), "resolved font faces");
        Ok(out)
    }
}

/// In-memory provider for embedded fonts and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryFontProvider {
    faces: Vec<FontFace>,
}

impl MemoryFontProvider {
    /// Empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register font bytes under `id`.
    pub fn with_face(mut self, id: impl Into<String>, data: Vec<u8>) -> Self {
        self.faces.push(FontFace {
            id: id.into(),
            data: Arc::new(data),
        });
        self
    }

    /// Identifiers of every registered face, in registration order.
    pub fn ids(&self) -> Vec<String> {
        self.faces.iter().map(|f| f.id.clone()).collect()
    }
}

impl FontProvider for MemoryFontProvider {
    fn resolve(&self, candidates: &[String]) -> GarbleResult<Vec<FontFace>> {
        let mut out = Vec::<FontFace>::new();
        for id in candidates {
            if out.iter().any(|f| &f.id == id) {
                continue;
            }
            let Some(face) = self.faces.iter().find(|f| &f.id == id) else {
                continue;
            };
            if is_loadable_font(&face.data) {
                out.push(face.clone());
            } else {
                tracing::warn!(font = %id, "skipping unparsable in-memory font");
            }
        }
        if out.is_empty() {
            return Err(GarbleError::font_asset(
                "no fonts available among in-memory faces",
            ));
        }
        Ok(out)
    }
}

/// `true` when `bytes` register at least one font family.
pub fn is_loadable_font(bytes: &[u8]) -> bool {
    let mut ctx = parley::FontContext::default();
    !ctx.collection
        .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None)
        .is_empty()
}

/// Normalize and validate a relative font path.
///
/// The result uses `/` separators, drops `.` segments, and rejects absolute paths or parent
/// traversals (`..`).
pub(crate) fn normalize_rel_path(source: &str) -> GarbleResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(GarbleError::font_asset("relative font path expected"));
    }
    if s.is_empty() {
        return Err(GarbleError::font_asset("font path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(GarbleError::font_asset("font paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(GarbleError::font_asset("font path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
