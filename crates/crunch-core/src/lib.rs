//! Core library for packing trimmed, deduplicated PNG bitmaps into MaxRects
//! texture atlas pages, with XML/JSON/BIN manifest export and a content
//! fingerprint for incremental builds.
//!
//! This crate owns the pipeline; it never touches argv, the filesystem, or
//! process exit codes — those live in the `crunch-cli` binary crate.

pub mod bitmap;
pub mod compositing;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod manifest;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod serialize;

pub use bitmap::{build_bitmap, DecodedImage};
pub use config::Config;
pub use error::{CrunchError, Result};
pub use manifest::{build_manifest, Manifest, ManifestImage, ManifestPage};
pub use model::{Bitmap, Page, Placement, Rect};
pub use pipeline::{pack, PackOutput};

/// Convenience re-export of the primary APIs.
pub mod prelude {
    pub use crate::bitmap::{build_bitmap, DecodedImage};
    pub use crate::compositing::blit_rgba;
    pub use crate::config::Config;
    pub use crate::error::{CrunchError, Result};
    pub use crate::fingerprint::compute as compute_fingerprint;
    pub use crate::manifest::{build_manifest, Manifest};
    pub use crate::model::{Bitmap, Page, Placement, Rect};
    pub use crate::pipeline::{pack, PackOutput};
    pub use crate::serialize::{to_bin, to_json, to_xml};
}
