use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{LeafletError, LeafletResult};
use crate::model::style::FontStyle;

/// File name of the optional alias manifest read by [`FontBook::load_dir`].
pub const FONT_MANIFEST: &str = "fonts.json";

/// One registered font face.
#[derive(Clone)]
pub struct FontFace {
    /// Family name styles refer to (may be an alias of the face's internal name).
    pub family: String,
    pub weight: u16,
    pub style: FontStyle,
    /// Raw font file bytes (TTF/OTF).
    pub data: Arc<Vec<u8>>,
}

impl FontFace {
    /// Registry key, `family-weight-style`.
    pub fn key(&self) -> String {
        font_key(&self.family, self.weight, self.style)
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("weight", &self.weight)
            .field("style", &self.style)
            .field("bytes", &self.data.len())
            .finish()
    }
}

pub(crate) fn font_key(family: &str, weight: u16, style: FontStyle) -> String {
    format!("{family}-{weight}-{style}")
}

/// Registry of font faces available to text rendering.
///
/// Populate it up front, then share it behind an [`Arc`]; lookups never touch the filesystem.
#[derive(Debug, Default)]
pub struct FontBook {
    faces: Vec<FontFace>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register font bytes for `(family, weight, style)`.
    ///
    /// When `family` is `None` the family name is read from the font itself. Registering the same
    /// key twice replaces the earlier face. Returns the family name used.
    pub fn register_bytes(
        &mut self,
        family: Option<&str>,
        weight: u16,
        style: FontStyle,
        bytes: Vec<u8>,
    ) -> LeafletResult<String> {
        if weight == 0 {
            return Err(LeafletError::validation("font weight must be > 0"));
        }
        if bytes.is_empty() {
            return Err(LeafletError::validation("font data is empty"));
        }
        let family = match family {
            Some(f) if !f.trim().is_empty() => f.trim().to_owned(),
            Some(_) => return Err(LeafletError::validation("font family must be non-empty")),
            None => family_name_of(&bytes)?,
        };

        let face = FontFace {
            family: family.clone(),
            weight,
            style,
            data: Arc::new(bytes),
        };
        let key = face.key();
        self.faces.retain(|f| f.key() != key);
        tracing::debug!(font = %key, "font registered");
        self.faces.push(face);
        Ok(family)
    }

    /// Register a font file, taking weight and style from its file name
    /// (`Family-SemiBoldItalic.ttf`) and the family from the font data unless `family` is given.
    pub fn register_file(&mut self, path: &Path, family: Option<&str>) -> LeafletResult<String> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| LeafletError::validation("font file name must be valid UTF-8"))?;
        let (weight, style) = weight_style_from_stem(stem);
        self.register_bytes(family, weight, style, bytes)
    }

    /// Register every `*.ttf`/`*.otf` in `dir`, plus the aliases listed in `fonts.json` if present.
    ///
    /// The manifest maps family names to `"<weight>[italic]" -> file` entries, so a family can be
    /// served by a file with a different internal name. Returns the number of faces registered.
    pub fn load_dir(&mut self, dir: &Path) -> LeafletResult<usize> {
        let mut n = 0usize;

        let mut entries = std::fs::read_dir(dir)
            .with_context(|| format!("read font directory '{}'", dir.display()))?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("list font directory '{}'", dir.display()))?;
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let path = entry.path();
            let is_font = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"));
            if is_font && path.is_file() {
                self.register_file(&path, None)?;
                n += 1;
            }
        }

        let manifest_path = dir.join(FONT_MANIFEST);
        if manifest_path.is_file() {
            let raw = std::fs::read_to_string(&manifest_path)
                .with_context(|| format!("read '{}'", manifest_path.display()))?;
            let manifest: BTreeMap<String, BTreeMap<String, String>> = serde_json::from_str(&raw)
                .with_context(|| format!("parse '{}'", manifest_path.display()))?;
            for (family, variants) in &manifest {
                for (variant, file) in variants {
                    let (weight, style) = parse_variant(variant)?;
                    let path = dir.join(file);
                    let bytes = std::fs::read(&path)
                        .with_context(|| format!("read font '{}'", path.display()))?;
                    self.register_bytes(Some(family), weight, style, bytes)?;
                    n += 1;
                }
            }
        }

        tracing::debug!(dir = %dir.display(), faces = n, "font directory loaded");
        Ok(n)
    }

    /// Pick the face serving `(family, weight, style)`.
    ///
    /// Preference: exact match, then the closest weight in the same style, then the closest
    /// weight in any style. Ties go to the lighter face. Family names compare case-insensitively.
    pub fn resolve(
        &self,
        family: &str,
        weight: u16,
        style: FontStyle,
    ) -> LeafletResult<&FontFace> {
        if let Some(f) = self
            .family_faces(family)
            .find(|f| f.weight == weight && f.style == style)
        {
            return Ok(f);
        }
        if let Some(f) = self
            .family_faces(family)
            .filter(|f| f.style == style)
            .min_by_key(|f| (f.weight.abs_diff(weight), f.weight))
        {
            return Ok(f);
        }
        self.family_faces(family)
            .min_by_key(|f| (f.weight.abs_diff(weight), f.weight))
            .ok_or_else(|| {
                LeafletError::font(format!(
                    "no font registered for family \"{family}\" ({})",
                    font_key(family, weight, style)
                ))
            })
    }

    fn family_faces<'a>(&'a self, family: &str) -> impl Iterator<Item = &'a FontFace> {
        self.faces
            .iter()
            .filter(move |f| f.family.eq_ignore_ascii_case(family))
    }

    /// Whether a face with exactly this key was registered.
    pub fn is_loaded(&self, family: &str, weight: u16, style: FontStyle) -> bool {
        let key = font_key(family, weight, style);
        self.faces.iter().any(|f| f.key() == key)
    }

    /// Keys (`family-weight-style`) of every registered face, sorted.
    pub fn loaded_fonts(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.faces.iter().map(FontFace::key).collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

fn family_name_of(bytes: &[u8]) -> LeafletResult<String> {
    let mut font_ctx = parley::FontContext::default();
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| LeafletError::font("no font families found in font data"))?;
    font_ctx
        .collection
        .family_name(family_id)
        .map(str::to_owned)
        .ok_or_else(|| LeafletError::font("registered font family has no name"))
}

/// `"600"`, `"600italic"`, `"400 italic"`.
fn parse_variant(s: &str) -> LeafletResult<(u16, FontStyle)> {
    let lower = s.trim().to_ascii_lowercase();
    let (num, style) = match lower.strip_suffix("italic") {
        Some(rest) => (rest.trim(), FontStyle::Italic),
        None => (lower.as_str(), FontStyle::Normal),
    };
    let weight: u16 = num
        .parse()
        .map_err(|_| LeafletError::validation(format!("invalid font variant \"{s}\"")))?;
    if weight == 0 {
        return Err(LeafletError::validation(format!("invalid font variant \"{s}\"")));
    }
    Ok((weight, style))
}

/// Weight and style from the `Family-Weight[Italic]` file stem convention.
pub(crate) fn weight_style_from_stem(stem: &str) -> (u16, FontStyle) {
    let Some((_, suffix)) = stem.rsplit_once('-') else {
        return (400, FontStyle::Normal);
    };
    let lower = suffix.to_ascii_lowercase();
    let (name, style) = match lower.strip_suffix("italic") {
        Some(rest) => (rest, FontStyle::Italic),
        None => (lower.as_str(), FontStyle::Normal),
    };
    let weight = match name {
        "thin" | "hairline" => 100,
        "extralight" | "ultralight" => 200,
        "light" => 300,
        "medium" => 500,
        "semibold" | "demibold" => 600,
        "bold" => 700,
        "extrabold" | "ultrabold" => 800,
        "black" | "heavy" => 900,
        _ => 400,
    };
    (weight, style)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
