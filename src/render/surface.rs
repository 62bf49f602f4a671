use std::sync::Arc;

use crate::assets::decode::DecodedImage;
use crate::export::encode::{ImageFormat, data_url, encode_rgba};
use crate::foundation::core::{Affine, Point, Rect, Vec2, affine_to_cpu, rect_to_cpu};
use crate::foundation::error::{LeafletError, LeafletResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::layout::engine::{TextBlock, x_for};
use crate::model::canvas::{AspectRatio, CanvasDimensions};
use crate::render::composite::{BlendMode, composite_in_place};
use crate::text::Typesetter;

/// Blend mode and opacity for one draw call.
///
/// The surface stores neither; every draw states both.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawParams {
    pub blend: BlendMode,
    /// Clamped to `[0, 1]` at draw time.
    pub opacity: f32,
}

impl DrawParams {
    pub const NORMAL: Self = Self {
        blend: BlendMode::Normal,
        opacity: 1.0,
    };

    pub fn new(blend: BlendMode, opacity: f32) -> Self {
        Self { blend, opacity }
    }

    /// Multiply at `opacity`.
    pub fn multiply(opacity: f32) -> Self {
        Self::new(BlendMode::Multiply, opacity)
    }

    pub fn clamped_opacity(self) -> f32 {
        if self.opacity.is_nan() {
            0.0
        } else {
            self.opacity.clamp(0.0, 1.0)
        }
    }
}

impl Default for DrawParams {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Where a cover-scaled image lands on a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl CoverRect {
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Maps image pixel space onto the surface.
    pub fn transform(self) -> Affine {
        Affine::translate(Vec2::new(self.x, self.y)) * Affine::scale(self.scale)
    }
}

/// Uniform scale that makes an `image_width`x`image_height` image cover the whole surface,
/// centered. One axis may overflow on both sides; nothing is letterboxed.
///
/// Intrinsic sizes must be positive; [`DecodedImage`] guarantees it.
pub fn cover_rect(surface: CanvasDimensions, image_width: u32, image_height: u32) -> CoverRect {
    let sw = f64::from(surface.width);
    let sh = f64::from(surface.height);
    let iw = f64::from(image_width);
    let ih = f64::from(image_height);

    let scale = (sw / iw).max(sh / ih);
    let width = iw * scale;
    let height = ih * scale;
    CoverRect {
        x: (sw - width) / 2.0,
        y: (sh - height) / 2.0,
        width,
        height,
        scale,
    }
}

/// A fixed-size premultiplied RGBA8 drawing surface.
///
/// Each draw rasterizes onto a transparent scratch layer and composites that layer onto the
/// surface with the draw's own [`DrawParams`].
pub struct Surface {
    aspect_ratio: AspectRatio,
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("aspect_ratio", &self.aspect_ratio)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Surface {
    /// Allocate a transparent surface for `aspect_ratio`.
    pub fn new(aspect_ratio: AspectRatio) -> LeafletResult<Self> {
        let (width, height) = pixmap_size(aspect_ratio.dimensions())?;
        Ok(Self {
            aspect_ratio,
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
        })
    }

    /// Reallocate for `aspect_ratio`. Content is always discarded, even when the size is unchanged.
    pub fn set_size(&mut self, aspect_ratio: AspectRatio) -> LeafletResult<()> {
        let (width, height) = pixmap_size(aspect_ratio.dimensions())?;
        self.aspect_ratio = aspect_ratio;
        self.width = width;
        self.height = height;
        self.pixmap = vello_cpu::Pixmap::new(width, height);
        tracing::debug!(aspect_ratio = %aspect_ratio, width, height, "surface resized");
        Ok(())
    }

    /// Wipe to transparent.
    pub fn clear(&mut self) {
        self.pixmap.data_as_u8_slice_mut().fill(0);
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn dimensions(&self) -> CanvasDimensions {
        CanvasDimensions {
            width: u32::from(self.width),
            height: u32::from(self.height),
        }
    }

    /// Where `image` lands when cover-drawn on this surface.
    pub fn cover_rect_for(&self, image: &DecodedImage) -> CoverRect {
        cover_rect(self.dimensions(), image.width, image.height)
    }

    /// Cover-draw `image` normally at full opacity.
    pub fn draw_cover(&mut self, image: &DecodedImage) -> LeafletResult<()> {
        self.draw_cover_with(image, DrawParams::NORMAL)
    }

    /// Cover-draw `image` with an explicit blend mode and opacity.
    pub fn draw_cover_with(
        &mut self,
        image: &DecodedImage,
        params: DrawParams,
    ) -> LeafletResult<()> {
        let opacity = params.clamped_opacity();
        if opacity <= 0.0 {
            return Ok(());
        }

        let cover = self.cover_rect_for(image);
        let paint = image_paint(image)?;
        let layer = self.scratch_layer(|ctx| {
            ctx.set_transform(affine_to_cpu(cover.transform()));
            ctx.set_paint(paint);
            ctx.fill_rect(&rect_to_cpu(Rect::new(
                0.0,
                0.0,
                f64::from(image.width),
                f64::from(image.height),
            )));
            Ok(())
        })?;
        composite_in_place(
            self.pixmap.data_as_u8_slice_mut(),
            layer.data_as_u8_slice(),
            params.blend,
            opacity,
        )
    }

    /// Multiply `image` over the surface at `opacity_fraction` (clamped to `[0, 1]`).
    ///
    /// Later draws are unaffected: blend state only lives in the call.
    pub fn draw_filter_overlay(
        &mut self,
        image: &DecodedImage,
        opacity_fraction: f32,
    ) -> LeafletResult<()> {
        self.draw_cover_with(image, DrawParams::multiply(opacity_fraction))
    }

    /// Draw every line of `block`, one line height apart from `block.y` down.
    ///
    /// Lines are anchored at [`x_for`] of the block's alignment, with `y` at the top of the em box.
    pub fn draw_text_block<T>(
        &mut self,
        block: &TextBlock,
        typesetter: &mut T,
    ) -> LeafletResult<()>
    where
        T: Typesetter + ?Sized,
    {
        if block.lines.is_empty() {
            return Ok(());
        }

        let style = block.style();
        let x = x_for(block.alignment, block.max_width, f64::from(self.width));
        let layer = self.scratch_layer(|ctx| {
            for (i, line) in block.lines.iter().enumerate() {
                let y = block.y + i as f64 * block.line_height;
                typesetter.fill_line(ctx, line, &style, block.alignment, Point::new(x, y))?;
            }
            Ok(())
        })?;
        composite_in_place(
            self.pixmap.data_as_u8_slice_mut(),
            layer.data_as_u8_slice(),
            BlendMode::Normal,
            1.0,
        )
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Straight-alpha copy of the surface.
    pub fn to_rgba_image(&self) -> LeafletResult<image::RgbaImage> {
        let mut data = self.pixels().to_vec();
        unpremultiply_rgba8_in_place(&mut data);
        image::RgbaImage::from_raw(u32::from(self.width), u32::from(self.height), data).ok_or_else(
            || LeafletError::evaluation("surface buffer does not match its dimensions"),
        )
    }

    /// Encode the current content.
    pub fn encode(&self, format: ImageFormat, quality: Option<f32>) -> LeafletResult<Vec<u8>> {
        encode_rgba(&self.to_rgba_image()?, format, quality)
    }

    /// Encode the current content as a `data:` URL.
    pub fn to_data_url(&self, format: ImageFormat, quality: Option<f32>) -> LeafletResult<String> {
        Ok(data_url(&self.encode(format, quality)?, format))
    }

    /// Encode the current content on the blocking pool.
    ///
    /// The pixels are snapshotted before the future is returned, so the surface may be redrawn
    /// while encoding runs.
    pub fn to_blob(
        &self,
        format: ImageFormat,
        quality: Option<f32>,
    ) -> impl Future<Output = LeafletResult<Vec<u8>>> + Send + use<> {
        let snapshot = self.to_rgba_image();
        async move {
            let snapshot = snapshot?;
            tokio::task::spawn_blocking(move || encode_rgba(&snapshot, format, quality))
                .await
                .map_err(|e| LeafletError::encode(format!("encoder task failed: {e}")))?
        }
    }

    fn scratch_layer<F>(&self, paint: F) -> LeafletResult<vello_cpu::Pixmap>
    where
        F: FnOnce(&mut vello_cpu::RenderContext) -> LeafletResult<()>,
    {
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        paint(&mut ctx)?;
        ctx.flush();
        let mut layer = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut layer);
        Ok(layer)
    }
}

fn pixmap_size(dims: CanvasDimensions) -> LeafletResult<(u16, u16)> {
    let w: u16 = dims
        .width
        .try_into()
        .map_err(|_| LeafletError::surface(format!("surface width {} exceeds u16", dims.width)))?;
    let h: u16 = dims.height.try_into().map_err(|_| {
        LeafletError::surface(format!("surface height {} exceeds u16", dims.height))
    })?;
    if w == 0 || h == 0 {
        return Err(LeafletError::surface("surface dimensions must be non-zero"));
    }
    Ok((w, h))
}

fn image_paint(image: &DecodedImage) -> LeafletResult<vello_cpu::Image> {
    let pixmap = image_premul_bytes_to_pixmap(&image.rgba8_premul, image.width, image.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> LeafletResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| LeafletError::evaluation("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| LeafletError::evaluation("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(LeafletError::evaluation("decoded image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect::<Vec<_>>();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
