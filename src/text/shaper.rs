use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::fonts::FontBook;
use crate::foundation::core::{Affine, Point, Vec2, affine_to_cpu};
use crate::foundation::error::{LeafletError, LeafletResult};
use crate::model::style::{FontStyle, TextAlignment, TypographyStyle};
use crate::text::{TextBrushRgba8, Typesetter, aligned_left};

#[derive(Clone)]
struct RegisteredFace {
    family: String,
    weight: u16,
    style: FontStyle,
    font: vello_cpu::peniko::FontData,
}

/// [`Typesetter`] backed by Parley shaping and `vello_cpu` glyph filling.
///
/// Faces come from a shared [`FontBook`] and are registered into this typesetter's own Parley
/// collection on first use.
pub struct ParleyTypesetter {
    fonts: Arc<FontBook>,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    faces: HashMap<String, RegisteredFace>,
}

impl std::fmt::Debug for ParleyTypesetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyTypesetter")
            .field("fonts", &self.fonts)
            .field("registered", &self.faces.len())
            .finish()
    }
}

impl ParleyTypesetter {
    pub fn new(fonts: Arc<FontBook>) -> Self {
        Self {
            fonts,
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: HashMap::new(),
        }
    }

    pub fn fonts(&self) -> &Arc<FontBook> {
        &self.fonts
    }

    fn face_for(&mut self, style: &TypographyStyle) -> LeafletResult<RegisteredFace> {
        let face = self
            .fonts
            .resolve(&style.font_family, style.font_weight, style.font_style)
            .map_err(|e| match e {
                LeafletError::Font(msg) => {
                    LeafletError::font(format!("cannot set {}: {msg}", style.font_spec()))
                }
                other => other,
            })?;
        let key = face.key();
        if let Some(r) = self.faces.get(&key) {
            return Ok(r.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(face.data.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            LeafletError::font(format!("no font families registered from \"{key}\""))
        })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| LeafletError::font("registered font family has no name"))?
            .to_string();

        let registered = RegisteredFace {
            family,
            weight: face.weight,
            style: face.style,
            font: vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(face.data.to_vec()),
                0,
            ),
        };
        tracing::debug!(font = %key, family = %registered.family, "font face shaped");
        self.faces.insert(key, registered.clone());
        Ok(registered)
    }

    /// Shape `text` as a single unbroken line.
    fn layout_line(
        &mut self,
        text: &str,
        style: &TypographyStyle,
    ) -> LeafletResult<(parley::Layout<TextBrushRgba8>, RegisteredFace)> {
        style.validate()?;
        let face = self.face_for(style)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(face.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(
            style.font_size as f32,
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(face.weight)),
        ));
        builder.push_default(parley::style::StyleProperty::FontStyle(match face.style {
            FontStyle::Normal => parley::style::FontStyle::Normal,
            FontStyle::Italic => parley::style::FontStyle::Italic,
        }));
        builder.push_default(parley::style::StyleProperty::Brush(
            TextBrushRgba8::from_style(style),
        ));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok((layout, face))
    }
}

impl Typesetter for ParleyTypesetter {
    fn measure(&mut self, text: &str, style: &TypographyStyle) -> LeafletResult<f64> {
        if text.is_empty() {
            return Ok(0.0);
        }
        let (layout, _) = self.layout_line(text, style)?;
        Ok(f64::from(layout.full_width()))
    }

    fn fill_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        style: &TypographyStyle,
        alignment: TextAlignment,
        anchor: Point,
    ) -> LeafletResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let (layout, face) = self.layout_line(text, style)?;
        let Some(first) = layout.lines().next() else {
            return Ok(());
        };
        let m = first.metrics();
        let em_top = f64::from(m.baseline - m.ascent);
        let x = aligned_left(alignment, anchor.x, f64::from(layout.full_width()));
        let y = anchor.y - em_top;

        ctx.set_transform(affine_to_cpu(Affine::translate(Vec2::new(x, y))));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                // Pen positions: advances accumulated along the run, y on the baseline.
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&face.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/shaper.rs"]
mod tests;
