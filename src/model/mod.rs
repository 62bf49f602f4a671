pub(crate) mod canvas;
pub(crate) mod config;
pub(crate) mod preset;
pub(crate) mod style;
