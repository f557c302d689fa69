//! Cube layer: label parsing and binary decoding.
//!
//! Architecture:
//! ```text
//!  v*.qub / C*_ir.cub
//!        │
//!        ▼
//!   ┌──────────┐
//!   │   pvl    │  ASCII header → Label (blocks + keys)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ qub / isis   │  binary planes → DNs / scaled values
//!   └──────────────┘
//!        │
//!        ▼
//!   band images, pixel spectra, suffix planes
//! ```

pub mod isis;
pub mod pvl;
pub mod qub;

pub use isis::{ByteOrder, IsisCube, PixelType};
pub use pvl::{Block, Label, Value};
pub use qub::{Qub, SuffixPlane};
