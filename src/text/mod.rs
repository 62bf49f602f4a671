use crate::foundation::core::Point;
use crate::foundation::error::LeafletResult;
use crate::model::style::{TextAlignment, TypographyStyle};

pub(crate) mod shaper;

#[cfg(test)]
#[path = "../../tests/unit/text/fixed.rs"]
pub(crate) mod fixed;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl TextBrushRgba8 {
    pub fn from_style(style: &TypographyStyle) -> Self {
        let [r, g, b, a] = style.color.rgba8();
        Self { r, g, b, a }
    }
}

/// Measures and draws single lines of text.
///
/// `measure` and `fill_line` must agree: the width a line is measured at is the width it is
/// drawn at, so wrapped lines never overflow their block.
pub trait Typesetter {
    /// Advance width of `text` in pixels when set in `style`.
    fn measure(&mut self, text: &str, style: &TypographyStyle) -> LeafletResult<f64>;

    /// Fill `text` into `ctx`.
    ///
    /// `anchor.x` is the left edge, center or right edge of the line per `alignment`; `anchor.y`
    /// is the top of the em box.
    fn fill_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        style: &TypographyStyle,
        alignment: TextAlignment,
        anchor: Point,
    ) -> LeafletResult<()>;
}

/// Left edge of a line of width `width` anchored at `anchor_x` with `alignment`.
pub fn aligned_left(alignment: TextAlignment, anchor_x: f64, width: f64) -> f64 {
    match alignment {
        TextAlignment::Left => anchor_x,
        TextAlignment::Center => anchor_x - width / 2.0,
        TextAlignment::Right => anchor_x - width,
    }
}
