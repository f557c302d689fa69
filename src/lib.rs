//! Cassini VIMS data access toolkit.
//!
//! Reads VIMS (Visual and Infrared Mapping Spectrometer) hyperspectral
//! cubes, maps spectral channels to calibrated wavelengths, converts
//! between the mission time systems and projects footprints onto
//! cartographic maps.
//!
//! Architecture:
//! ```text
//!  v*.qub / C*_ir.cub
//!        │
//!        ▼
//!   ┌──────────┐
//!   │   cube    │  PVL labels, QUB / ISIS binary decoding
//!   └──────────┘
//!        │
//!        ├──▶ wvlns        channel → wavelength calibration
//!        ├──▶ cassini      image IDs, spacecraft clock ↔ UTC
//!        ├──▶ flybys       targeted encounter catalog
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ projections  │  equirectangular / stereographic /
//!   └──────────────┘  orthographic / mollweide
//!        │
//!        ├──▶ geojson      footprint export
//!        └──▶ img          band plane PNG rendering
//! ```

pub mod angles;
pub mod cassini;
pub mod color;
pub mod cube;
pub mod errors;
pub mod fetch;
pub mod flybys;
pub mod geojson;
pub mod greatcircle;
pub mod img;
pub mod interp;
pub mod planets;
pub mod projections;
pub mod times;
pub mod vectors;
pub mod wvlns;

pub use cube::{IsisCube, Qub};
pub use errors::{Result, VimsError};
pub use planets::Planet;
pub use projections::{
    Equirectangular, MapPath, Mollweide, Orthographic, Projection, Stereographic,
};
