pub use kurbo::{Affine, Point, Rect, Vec2};

/// Convert a geometry transform into the rasterizer's own `kurbo` version.
pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

/// Convert a rectangle into the rasterizer's own `kurbo` version.
pub(crate) fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}
