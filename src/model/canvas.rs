use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::LeafletError;

/// Pixel size of a poster surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasDimensions {
    pub width: u32,
    pub height: u32,
}

/// Supported poster aspect ratios; each maps to a fixed pixel size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:5")]
    Portrait,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 2] = [AspectRatio::Square, AspectRatio::Portrait];

    pub fn dimensions(self) -> CanvasDimensions {
        match self {
            Self::Square => CanvasDimensions {
                width: 1080,
                height: 1080,
            },
            Self::Portrait => CanvasDimensions {
                width: 1080,
                height: 1350,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Portrait => "4:5",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = LeafletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1:1" => Ok(Self::Square),
            "4:5" => Ok(Self::Portrait),
            other => Err(LeafletError::validation(format!(
                "unknown aspect ratio \"{other}\" (expected 1:1 or 4:5)"
            ))),
        }
    }
}
