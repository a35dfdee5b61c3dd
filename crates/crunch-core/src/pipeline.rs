use tracing::instrument;

use crate::config::Config;
use crate::error::{CrunchError, Result};
use crate::model::{Bitmap, Page};
use crate::packer::PagePacker;

/// Output of a full packing run: every page produced, in order.
pub struct PackOutput {
    pub pages: Vec<Page>,
}

/// Orders bitmaps, loops creating pages until every bitmap is placed, and
/// fails if a single round places nothing at all.
///
/// Bitmaps are sorted ascending by area and then consumed from the back, so
/// each page is built largest-first, the order that gives MaxRects the best
/// packing density.
#[instrument(skip_all)]
pub fn pack(bitmaps: &[Bitmap], cfg: &Config) -> Result<PackOutput> {
    let mut order: Vec<usize> = (0..bitmaps.len()).collect();
    order.sort_by_key(|&i| bitmaps[i].area());

    let mut remaining: Vec<usize> = order.into_iter().rev().collect();
    let mut pages = Vec::new();

    while !remaining.is_empty() {
        let mut packer = PagePacker::new(cfg.page_size, cfg.page_size, cfg.padding);
        let result = packer.pack(bitmaps, &remaining, cfg);

        if result.placements.is_empty() {
            let name = bitmaps[remaining[0]].name.clone();
            return Err(CrunchError::PackingImpossible(name));
        }

        pages.push(Page {
            width: cfg.page_size,
            height: cfg.page_size,
            padding: cfg.padding,
            placements: result.placements,
        });
        remaining = result.unfit;
    }

    Ok(PackOutput { pages })
}
