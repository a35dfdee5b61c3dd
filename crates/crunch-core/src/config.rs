use std::str::FromStr;

use crate::error::{CrunchError, Result};

/// Allowed atlas page dimensions (pages are square: one size serves as both
/// width and height).
const ALLOWED_PAGE_SIZES: [u32; 7] = [64, 128, 256, 512, 1024, 2048, 4096];

/// Maximum padding between placements, in pixels.
const MAX_PADDING: u32 = 16;

/// Packing configuration, built once from CLI flags and threaded by
/// reference through the pipeline. No global mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Width and height of each output page, in pixels.
    pub page_size: u32,
    /// Pixels of padding between adjacent placements.
    pub padding: u32,
    /// Premultiply RGB channels by alpha before packing.
    pub premultiply: bool,
    /// Trim fully-transparent borders from each bitmap before packing.
    pub trim: bool,
    /// Coalesce bitmaps with identical pixel content into alias placements.
    pub unique: bool,
    /// Allow 90 degree rotation when it improves placement.
    pub allow_rotation: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: 4096,
            padding: 1,
            premultiply: false,
            trim: false,
            unique: false,
            allow_rotation: false,
        }
    }
}

impl Config {
    /// Re-validates `page_size`/`padding` against the same rules applied at
    /// CLI parse time. Callers building a `Config` directly (not through the
    /// CLI's clap value parsers) should call this before packing.
    pub fn validate(&self) -> Result<()> {
        parse_page_size(&self.page_size.to_string()).map_err(|_| CrunchError::InvalidOptionValue {
            flag: "size".into(),
            raw: self.page_size.to_string(),
        })?;
        parse_padding(&self.padding.to_string()).map_err(|_| CrunchError::InvalidOptionValue {
            flag: "pad".into(),
            raw: self.padding.to_string(),
        })?;
        Ok(())
    }
}

/// Parses a `--size` value, accepting only the allowed page dimensions.
/// Used directly as the `clap` value parser for the CLI's `--size` flag.
pub fn parse_page_size(raw: &str) -> std::result::Result<u32, String> {
    let v: u32 = u32::from_str(raw).map_err(|_| format!("`{raw}` is not a number"))?;
    if ALLOWED_PAGE_SIZES.contains(&v) {
        Ok(v)
    } else {
        Err(format!(
            "page size must be one of {ALLOWED_PAGE_SIZES:?}, got {v}"
        ))
    }
}

/// Parses a `--pad` value, bounded by `MAX_PADDING`. Used directly as the
/// `clap` value parser for the CLI's `--pad` flag.
pub fn parse_padding(raw: &str) -> std::result::Result<u32, String> {
    let v: u32 = u32::from_str(raw).map_err(|_| format!("`{raw}` is not a number"))?;
    if v <= MAX_PADDING {
        Ok(v)
    } else {
        Err(format!("padding must be at most {MAX_PADDING}, got {v}"))
    }
}
