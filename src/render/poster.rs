use crate::assets::decode::DecodedImage;
use crate::export::encode::ImageFormat;
use crate::foundation::error::LeafletResult;
use crate::layout::engine::{PosterTextLayout, TextLayoutEngine};
use crate::model::canvas::{AspectRatio, CanvasDimensions};
use crate::model::config::RenderConfig;
use crate::render::surface::Surface;
use crate::text::Typesetter;

/// Draws complete posters onto one owned [`Surface`].
///
/// A render always goes background, filter overlay, then text. Only the surface allocation and
/// its aspect ratio carry over between renders.
#[derive(Debug)]
pub struct PosterRenderer {
    surface: Surface,
}

impl PosterRenderer {
    pub fn new(aspect_ratio: AspectRatio) -> LeafletResult<Self> {
        Ok(Self {
            surface: Surface::new(aspect_ratio)?,
        })
    }

    /// Resize the surface if `aspect_ratio` differs from the current one.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: AspectRatio) -> LeafletResult<()> {
        if aspect_ratio != self.surface.aspect_ratio() {
            self.surface.set_size(aspect_ratio)?;
        }
        Ok(())
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.surface.aspect_ratio()
    }

    pub fn dimensions(&self) -> CanvasDimensions {
        self.surface.dimensions()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Render one full frame and return the text layout drawn.
    #[tracing::instrument(
        skip_all,
        fields(preset = %config.preset.id, aspect_ratio = %config.aspect_ratio)
    )]
    pub fn render(
        &mut self,
        config: &RenderConfig,
        background: &DecodedImage,
        filter: &DecodedImage,
        typesetter: &mut dyn Typesetter,
    ) -> LeafletResult<PosterTextLayout> {
        self.set_aspect_ratio(config.aspect_ratio)?;
        self.render_background(background, filter, config.filter_opacity())?;
        self.render_text(config, typesetter)
    }

    /// Clear, cover-draw `background`, then multiply `filter` at `filter_opacity`.
    ///
    /// Pass [`RenderConfig::filter_opacity`] to match [`PosterRenderer::render`].
    pub fn render_background(
        &mut self,
        background: &DecodedImage,
        filter: &DecodedImage,
        filter_opacity: f32,
    ) -> LeafletResult<()> {
        self.surface.clear();
        self.surface.draw_cover(background)?;
        self.surface.draw_filter_overlay(filter, filter_opacity)
    }

    /// Lay out and draw quote then author over whatever is on the surface.
    pub fn render_text(
        &mut self,
        config: &RenderConfig,
        typesetter: &mut dyn Typesetter,
    ) -> LeafletResult<PosterTextLayout> {
        let mut engine = TextLayoutEngine::new(self.surface.dimensions(), typesetter);
        let layout = engine.compose_layout(
            &config.quote_text,
            &config.author_text,
            &config.preset.quote_style,
            &config.preset.author_style,
            config.quote_alignment,
            config.author_alignment,
        )?;
        engine.render_poster_text(&layout, &mut self.surface)?;
        Ok(layout)
    }

    pub fn encode(&self, format: ImageFormat, quality: Option<f32>) -> LeafletResult<Vec<u8>> {
        self.surface.encode(format, quality)
    }

    pub fn to_data_url(&self, format: ImageFormat, quality: Option<f32>) -> LeafletResult<String> {
        self.surface.to_data_url(format, quality)
    }

    pub fn to_blob(
        &self,
        format: ImageFormat,
        quality: Option<f32>,
    ) -> impl Future<Output = LeafletResult<Vec<u8>>> + Send + use<> {
        self.surface.to_blob(format, quality)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/poster.rs"]
mod tests;
