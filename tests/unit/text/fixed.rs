//! Font-free typesetter for tests.

use crate::foundation::core::{Point, Rect, rect_to_cpu};
use crate::foundation::error::LeafletResult;
use crate::model::style::{TextAlignment, TypographyStyle};
use crate::text::{Typesetter, aligned_left};

/// Every character advances by `advance` pixels; lines are filled as solid boxes one em tall.
#[derive(Debug)]
pub(crate) struct FixedAdvanceTypesetter {
    pub(crate) advance: f64,
    pub(crate) measured: Vec<String>,
    pub(crate) filled: Vec<(String, TextAlignment, Point)>,
}

impl FixedAdvanceTypesetter {
    pub(crate) fn new(advance: f64) -> Self {
        Self {
            advance,
            measured: Vec::new(),
            filled: Vec::new(),
        }
    }
}

impl Typesetter for FixedAdvanceTypesetter {
    fn measure(&mut self, text: &str, _style: &TypographyStyle) -> LeafletResult<f64> {
        self.measured.push(text.to_owned());
        Ok(text.chars().count() as f64 * self.advance)
    }

    fn fill_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        style: &TypographyStyle,
        alignment: TextAlignment,
        anchor: Point,
    ) -> LeafletResult<()> {
        self.filled.push((text.to_owned(), alignment, anchor));
        let width = text.chars().count() as f64 * self.advance;
        let x0 = aligned_left(alignment, anchor.x, width);
        let [r, g, b, a] = style.color.rgba8();
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.fill_rect(&rect_to_cpu(Rect::new(
            x0,
            anchor.y,
            x0 + width,
            anchor.y + style.font_size,
        )));
        Ok(())
    }
}
