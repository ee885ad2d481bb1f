//! Image inputs: asset types and header-only inspection.
//!
//! Nothing here decodes pixels. Dimensions come straight from the container
//! headers (PNG IHDR, JPEG SOFn, WebP VP8X) and feed the configurable
//! [`DimensionGate`].
//!
//! # Submodules
//!
//! - `models`: `ImageAsset`, `ImageFormat`, `Dimensions`, `ContentHash`.
//! - `sniff`: dimension parsers and the size gate.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod models;
pub mod sniff;

pub use models::{ContentHash, Dimensions, ImageAsset, ImageFormat};
pub use sniff::{sniff_dimensions, DimensionGate};
