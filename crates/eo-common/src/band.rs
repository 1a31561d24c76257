//! Spectral band identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EoError;

/// The fixed set of reflectance bands carried by a scene.
///
/// Each band maps to the Sentinel-2 L2A asset that provides it. The
/// ordering follows wavelength, which keeps band maps deterministic when
/// serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    /// Blue, 490 nm (B02)
    Blue,
    /// Green, 560 nm (B03)
    Green,
    /// Red, 665 nm (B04)
    Red,
    /// Vegetation red edge, 705 nm (B05)
    RedEdge1,
    /// Near infrared, 842 nm (B08)
    Nir,
    /// Short-wave infrared, 1610 nm (B11)
    Swir,
}

impl Band {
    /// All bands in wavelength order.
    pub const ALL: [Band; 6] = [
        Band::Blue,
        Band::Green,
        Band::Red,
        Band::RedEdge1,
        Band::Nir,
        Band::Swir,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Blue => "blue",
            Band::Green => "green",
            Band::Red => "red",
            Band::RedEdge1 => "red_edge1",
            Band::Nir => "nir",
            Band::Swir => "swir",
        }
    }

    /// Sentinel-2 asset code for this band.
    pub fn sentinel2_code(&self) -> &'static str {
        match self {
            Band::Blue => "B02",
            Band::Green => "B03",
            Band::Red => "B04",
            Band::RedEdge1 => "B05",
            Band::Nir => "B08",
            Band::Swir => "B11",
        }
    }
}

impl FromStr for Band {
    type Err = EoError;

    /// Parse from a band name or Sentinel-2 code (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        if let Some(band) = Band::ALL
            .into_iter()
            .find(|b| b.sentinel2_code().eq_ignore_ascii_case(key))
        {
            return Ok(band);
        }

        match key.to_lowercase().as_str() {
            "blue" => Ok(Band::Blue),
            "green" => Ok(Band::Green),
            "red" => Ok(Band::Red),
            "red_edge1" | "rededge1" | "red-edge-1" => Ok(Band::RedEdge1),
            "nir" => Ok(Band::Nir),
            "swir" | "swir16" => Ok(Band::Swir),
            other => Err(EoError::invalid_parameter("band", format!("unknown band '{}'", other))),
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
