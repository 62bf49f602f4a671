use serde::Serialize;

use crate::assets::color::TextColor;
use crate::foundation::error::LeafletResult;
use crate::model::canvas::CanvasDimensions;
use crate::model::style::{FontStyle, TextAlignment, TypographyStyle};
use crate::render::surface::Surface;
use crate::text::Typesetter;

/// A wrapped, positioned run of lines sharing one style.
///
/// Derived per layout call; nothing caches it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub lines: Vec<String>,
    /// Pixels between consecutive line tops.
    pub line_height: f64,
    pub total_height: f64,
    pub font_size: f64,
    pub font_family: String,
    pub font_weight: u16,
    pub font_style: FontStyle,
    pub color: TextColor,
    pub alignment: TextAlignment,
    pub max_width: f64,
    /// Top of the first line.
    pub y: f64,
}

impl TextBlock {
    /// The style the block was laid out with.
    pub fn style(&self) -> TypographyStyle {
        TypographyStyle {
            font_family: self.font_family.clone(),
            font_weight: self.font_weight,
            font_style: self.font_style,
            font_size: self.font_size,
            line_height: self.line_height / self.font_size,
            color: self.color.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Quote and author blocks positioned on a surface.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterTextLayout {
    pub quote: TextBlock,
    pub author: TextBlock,
    /// Quote height + gap + author height.
    pub total_height: f64,
}

/// Horizontal anchor for a block of width `max_width` on a surface `surface_width` wide.
///
/// Left returns the block's left edge, center the surface center, right the block's right edge.
/// The result is only meaningful together with the alignment it was computed for.
pub fn x_for(alignment: TextAlignment, max_width: f64, surface_width: f64) -> f64 {
    let block_start = (surface_width - max_width) / 2.0;
    match alignment {
        TextAlignment::Left => block_start,
        TextAlignment::Center => surface_width / 2.0,
        TextAlignment::Right => block_start + max_width,
    }
}

/// Wraps text into lines and stacks the quote and author blocks on a surface.
pub struct TextLayoutEngine<'t> {
    dimensions: CanvasDimensions,
    typesetter: &'t mut dyn Typesetter,
}

impl<'t> TextLayoutEngine<'t> {
    /// Quote block width as a fraction of the surface width.
    pub const QUOTE_MAX_WIDTH_RATIO: f64 = 0.75;
    /// Author block width as a fraction of the surface width.
    pub const AUTHOR_MAX_WIDTH_RATIO: f64 = 0.6;
    /// Vertical gap between quote and author, when an author is present.
    pub const QUOTE_AUTHOR_GAP: f64 = 40.0;
    /// Top and bottom padding of the region the content is centered in.
    pub const VERTICAL_PADDING: f64 = 100.0;

    pub fn new(dimensions: CanvasDimensions, typesetter: &'t mut dyn Typesetter) -> Self {
        Self {
            dimensions,
            typesetter,
        }
    }

    pub fn set_dimensions(&mut self, dimensions: CanvasDimensions) {
        self.dimensions = dimensions;
    }

    pub fn dimensions(&self) -> CanvasDimensions {
        self.dimensions
    }

    /// Width of `text` in `style`.
    pub fn measure(&mut self, text: &str, style: &TypographyStyle) -> LeafletResult<f64> {
        self.typesetter.measure(text, style)
    }

    /// Greedy word wrap.
    ///
    /// Words are whitespace-separated and joined by single spaces. A word is moved to a new line
    /// only when the current line is non-empty and adding the word would make it wider than
    /// `max_width`, so a word wider than `max_width` sits alone on its line and overflows.
    pub fn wrap(
        &mut self,
        text: &str,
        style: &TypographyStyle,
        max_width: f64,
    ) -> LeafletResult<Vec<String>> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_owned()
            } else {
                format!("{current} {word}")
            };

            if !current.is_empty() && self.typesetter.measure(&candidate, style)? > max_width {
                lines.push(std::mem::replace(&mut current, word.to_owned()));
            } else {
                current = candidate;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        Ok(lines)
    }

    /// Wrap `text` into a block `max_width_ratio` of the surface wide, positioned at `y = 0`.
    pub fn block_layout(
        &mut self,
        text: &str,
        style: &TypographyStyle,
        alignment: TextAlignment,
        max_width_ratio: f64,
    ) -> LeafletResult<TextBlock> {
        let max_width = f64::from(self.dimensions.width) * max_width_ratio;
        let lines = self.wrap(text, style, max_width)?;
        let line_height = style.line_height_px();
        let total_height = lines.len() as f64 * line_height;

        Ok(TextBlock {
            lines,
            line_height,
            total_height,
            font_size: style.font_size,
            font_family: style.font_family.clone(),
            font_weight: style.font_weight,
            font_style: style.font_style,
            color: style.color.clone(),
            alignment,
            max_width,
            y: 0.0,
        })
    }

    /// [`x_for`] against this engine's surface width.
    pub fn x_for(&self, alignment: TextAlignment, max_width: f64) -> f64 {
        x_for(alignment, max_width, f64::from(self.dimensions.width))
    }

    /// Lay out quote and author and center them vertically inside the padded region.
    ///
    /// The padding is subtracted before centering and content is offset from the top padding,
    /// so content taller than the padded region starts above it.
    #[tracing::instrument(skip_all, fields(width = self.dimensions.width, height = self.dimensions.height))]
    pub fn compose_layout(
        &mut self,
        quote_text: &str,
        author_text: &str,
        quote_style: &TypographyStyle,
        author_style: &TypographyStyle,
        quote_alignment: TextAlignment,
        author_alignment: TextAlignment,
    ) -> LeafletResult<PosterTextLayout> {
        let mut quote = self.block_layout(
            quote_text,
            quote_style,
            quote_alignment,
            Self::QUOTE_MAX_WIDTH_RATIO,
        )?;
        let mut author = self.block_layout(
            author_text,
            author_style,
            author_alignment,
            Self::AUTHOR_MAX_WIDTH_RATIO,
        )?;

        let gap = if author_text.trim().is_empty() {
            0.0
        } else {
            Self::QUOTE_AUTHOR_GAP
        };
        let total_height = quote.total_height + gap + author.total_height;

        let available = f64::from(self.dimensions.height) - 2.0 * Self::VERTICAL_PADDING;
        let start_y = Self::VERTICAL_PADDING + (available - total_height) / 2.0;

        quote.y = start_y;
        author.y = quote.y + quote.total_height + gap;

        tracing::debug!(
            quote_lines = quote.lines.len(),
            author_lines = author.lines.len(),
            total_height,
            start_y,
            "text layout composed"
        );

        Ok(PosterTextLayout {
            quote,
            author,
            total_height,
        })
    }

    /// Draw one block onto `surface`.
    pub fn render(&mut self, block: &TextBlock, surface: &mut Surface) -> LeafletResult<()> {
        surface.draw_text_block(block, &mut *self.typesetter)
    }

    /// Draw the quote, then the author.
    pub fn render_poster_text(
        &mut self,
        layout: &PosterTextLayout,
        surface: &mut Surface,
    ) -> LeafletResult<()> {
        self.render(&layout.quote, surface)?;
        self.render(&layout.author, surface)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
