use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;

use crate::assets::decode::DecodedImage;
use crate::export::encode::{ImageFormat, data_url};
use crate::foundation::error::{LeafletError, LeafletResult};
use crate::model::canvas::{AspectRatio, CanvasDimensions};
use crate::model::config::RenderConfig;
use crate::render::poster::PosterRenderer;
use crate::text::Typesetter;

/// How to serialize an exported poster.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportOptions {
    pub format: ImageFormat,
    /// `0..=1`, JPEG only.
    pub quality: Option<f32>,
    /// Overrides the generated `leaflet-{slug}-{ms}.{ext}` name.
    pub filename: Option<String>,
}

impl ExportOptions {
    pub fn png() -> Self {
        Self::default()
    }

    pub fn jpeg(quality: Option<f32>) -> Self {
        Self {
            format: ImageFormat::Jpeg,
            quality,
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Outcome of an export. Failures are reported here rather than as `Err`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportResult {
    pub success: bool,
    pub filename: String,
    /// Encoded image bytes.
    pub blob: Option<Vec<u8>>,
    pub data_url: Option<String>,
    /// Where [`download`] saved the file.
    pub path: Option<PathBuf>,
    pub error: Option<String>,
}

impl ExportResult {
    fn failed(filename: String, err: &LeafletError) -> Self {
        Self {
            success: false,
            filename,
            error: Some(err.to_string()),
            ..Self::default()
        }
    }
}

/// Lowercase `preset_name` and turn each whitespace run into one `-`.
pub(crate) fn slug(preset_name: &str) -> String {
    let mut out = String::with_capacity(preset_name.len());
    let mut in_space = false;
    for c in preset_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else {
            out.extend(c.to_lowercase());
            in_space = false;
        }
    }
    out
}

/// `leaflet-{slug}-{epoch_ms}.{ext}`.
pub fn filename_at(preset_name: &str, format: ImageFormat, epoch_ms: u128) -> String {
    format!(
        "leaflet-{}-{epoch_ms}.{}",
        slug(preset_name),
        format.extension()
    )
}

/// [`filename_at`] with the current time.
pub fn filename(preset_name: &str, format: ImageFormat) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    filename_at(preset_name, format, now)
}

/// Pixel size of an export for `aspect_ratio`.
pub fn export_dimensions(aspect_ratio: AspectRatio) -> CanvasDimensions {
    aspect_ratio.dimensions()
}

/// Render `config` onto a fresh surface and encode it.
///
/// Rendering happens before this returns, on a renderer nothing else can see; the returned future
/// only encodes, on the blocking pool, and owns everything it needs.
pub fn export_frame(
    config: &RenderConfig,
    background: &DecodedImage,
    filter: &DecodedImage,
    typesetter: &mut dyn Typesetter,
    options: &ExportOptions,
) -> impl Future<Output = ExportResult> + Send + use<> {
    let rendered = render_isolated(config, background, filter, typesetter);
    let preset_name = config.preset.name.as_str();
    let format = options.format;
    let quality = options.quality;
    let chosen_name = options
        .filename
        .clone()
        .unwrap_or_else(|| filename(preset_name, format));

    async move {
        let renderer = match rendered {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "export render failed");
                return ExportResult::failed(String::new(), &e);
            }
        };

        let blob = match renderer.to_blob(format, quality).await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error = %e, "export encoding failed");
                return ExportResult::failed(String::new(), &e);
            }
        };

        tracing::debug!(filename = %chosen_name, bytes = blob.len(), %format, "export encoded");
        let data_url = data_url(&blob, format);
        ExportResult {
            success: true,
            filename: chosen_name,
            blob: Some(blob),
            data_url: Some(data_url),
            path: None,
            error: None,
        }
    }
}

/// The exported poster as a `data:` URL, or `None` if the export failed.
pub fn export_to_data_url(
    config: &RenderConfig,
    background: &DecodedImage,
    filter: &DecodedImage,
    typesetter: &mut dyn Typesetter,
    options: &ExportOptions,
) -> impl Future<Output = Option<String>> + Send + use<> {
    let export = export_frame(config, background, filter, typesetter, options);
    async move {
        let result = export.await;
        if result.success { result.data_url } else { None }
    }
}

/// Export and save the poster as `out_dir/<filename>`.
///
/// Bytes go to a temporary file in `out_dir` that is renamed into place on success and removed
/// on failure, so a failed download never leaves a partial file behind.
pub fn download(
    config: &RenderConfig,
    background: &DecodedImage,
    filter: &DecodedImage,
    typesetter: &mut dyn Typesetter,
    options: &ExportOptions,
    out_dir: &Path,
) -> impl Future<Output = ExportResult> + Send + use<> {
    let export = export_frame(config, background, filter, typesetter, options);
    let out_dir = out_dir.to_path_buf();

    async move {
        let mut result = export.await;
        let Some(blob) = result.blob.as_ref() else {
            return result;
        };

        let bytes = blob.clone();
        let name = result.filename.clone();
        let saved = tokio::task::spawn_blocking(move || save_atomically(&out_dir, &name, &bytes))
            .await
            .map_err(|e| LeafletError::Other(anyhow::anyhow!("download task failed: {e}")))
            .and_then(|r| r);

        match saved {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "poster saved");
                result.path = Some(path);
                result
            }
            Err(e) => {
                tracing::warn!(error = %e, filename = %result.filename, "download failed");
                ExportResult::failed(result.filename, &e)
            }
        }
    }
}

#[tracing::instrument(skip_all, fields(preset = %config.preset.id))]
fn render_isolated(
    config: &RenderConfig,
    background: &DecodedImage,
    filter: &DecodedImage,
    typesetter: &mut dyn Typesetter,
) -> LeafletResult<PosterRenderer> {
    config.validate()?;
    let mut renderer = PosterRenderer::new(config.aspect_ratio)?;
    renderer.render(config, background, filter, typesetter)?;
    Ok(renderer)
}

fn save_atomically(dir: &Path, name: &str, bytes: &[u8]) -> LeafletResult<PathBuf> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(LeafletError::validation(format!(
            "export filename \"{name}\" must be a bare file name"
        )));
    }

    let mut tmp = tempfile::Builder::new()
        .prefix(".leaflet-")
        .suffix(".part")
        .tempfile_in(dir)
        .with_context(|| format!("create temporary file in '{}'", dir.display()))?;
    tmp.write_all(bytes).context("write poster bytes")?;
    tmp.flush().context("flush poster bytes")?;

    let dest = dir.join(name);
    tmp.persist(&dest)
        .map_err(|e| e.error)
        .with_context(|| format!("save poster to '{}'", dest.display()))?;
    Ok(dest)
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
