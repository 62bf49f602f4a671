//! Leaflet composes quote posters: a background image scaled to cover a fixed-size surface, a
//! filter image multiplied over it, and a wrapped quote plus author line centered on top.
//!
//! The pipeline, leaf first:
//!
//! - Resolve a [`RenderConfig`] from a [`PresetConfig`] (or a [`PosterSpec`] file)
//! - Decode images into an [`ImageStore`] and register fonts into a [`FontBook`]
//! - Draw a frame with a [`PosterRenderer`], which drives the [`Surface`] compositor and the
//!   [`TextLayoutEngine`]
//! - Serialize it with [`export_frame`] or save it with [`download`]
#![forbid(unsafe_code)]

mod assets;
mod export;
mod foundation;
mod layout;
mod model;
mod render;
mod text;

pub use crate::foundation::core::{Affine, Point, Rect, Vec2};
pub use crate::foundation::error::{LeafletError, LeafletResult};

pub use crate::assets::color::TextColor;
pub use crate::assets::decode::{DecodedImage, decode_image};
pub use crate::assets::fonts::{FONT_MANIFEST, FontBook, FontFace};
pub use crate::assets::store::{ImageStore, RenderImages};
pub use crate::export::encode::{DEFAULT_JPEG_QUALITY, ImageFormat, data_url, encode_rgba};
pub use crate::export::pipeline::{
    ExportOptions, ExportResult, download, export_dimensions, export_frame, export_to_data_url,
    filename, filename_at,
};
pub use crate::layout::engine::{PosterTextLayout, TextBlock, TextLayoutEngine, x_for};
pub use crate::model::canvas::{AspectRatio, CanvasDimensions};
pub use crate::model::config::{PosterSpec, RenderConfig};
pub use crate::model::preset::{
    DEFAULTS, Defaults, PresetConfig, PresetName, default_preset, preset_by_id, presets,
};
pub use crate::model::style::{FontStyle, TextAlignment, TypographyStyle};
pub use crate::render::composite::BlendMode;
pub use crate::render::poster::PosterRenderer;
pub use crate::render::surface::{CoverRect, DrawParams, Surface, cover_rect};
pub use crate::text::shaper::ParleyTypesetter;
pub use crate::text::{TextBrushRgba8, Typesetter, aligned_left};
