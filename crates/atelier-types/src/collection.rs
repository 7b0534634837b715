use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Logical remote collection.
///
/// Each collection is a flat keyed map in the remote store. The path names
/// are part of the external contract and must not change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Designs,
    Layers,
    LayerImages,
    ColorPalettes,
    Surfaces,
    SurfaceOptions,
    Tags,
    Orders,
}

impl Collection {
    /// Every collection, in declaration order.
    pub const ALL: [Collection; 8] = [
        Self::Designs,
        Self::Layers,
        Self::LayerImages,
        Self::ColorPalettes,
        Self::Surfaces,
        Self::SurfaceOptions,
        Self::Tags,
        Self::Orders,
    ];

    /// Remote path of this collection.
    pub fn path(self) -> &'static str {
        match self {
            Self::Designs => "designs",
            Self::Layers => "layers",
            Self::LayerImages => "layerImages",
            Self::ColorPalettes => "colorPalettes",
            Self::Surfaces => "surfaces",
            Self::SurfaceOptions => "surfaceOptions",
            Self::Tags => "tags",
            Self::Orders => "orders",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Collection {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.path() == s)
            .ok_or_else(|| TypeError::UnknownCollection(s.to_string()))
    }
}
