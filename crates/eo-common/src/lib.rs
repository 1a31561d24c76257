//! Common types shared across the water quality workspace.
//!
//! Holds the raster time-series data model consumed by the index
//! processor: band identifiers, per-band grids with explicit no-data,
//! scenes and the ordered series, plus time lookup helpers.

pub mod band;
pub mod bbox;
pub mod error;
pub mod grid;
pub mod series;
pub mod time;

pub use band::Band;
pub use bbox::BoundingBox;
pub use error::{EoError, EoResult};
pub use grid::{BandGrid, Grid, GridShape, IndexGrid, MaskGrid};
pub use series::{RasterTimeSeries, Scene};
pub use time::{closest, index_of, TimeRange};
