use std::collections::HashMap;

use crate::config::Config;
use crate::model::{Bitmap, Placement};
use crate::packer::FreeRectStore;

/// Outcome of packing one batch of bitmaps onto a single page.
pub struct PageResult {
    pub placements: Vec<Placement>,
    /// Indices (into the shared bitmap slice) that didn't fit this round.
    pub unfit: Vec<usize>,
}

/// Builds one occupied page from a batch of bitmaps: runs dedup, drives
/// `FreeRectStore`, and tracks placements plus whatever didn't fit.
///
/// Dedup groups bitmaps by `hash_value` and then confirms each group by
/// exact pixel-buffer equality, so a hash collision alone never merges two
/// distinct images.
pub struct PagePacker {
    store: FreeRectStore,
    padding: u32,
}

impl PagePacker {
    pub fn new(width: u32, height: u32, padding: u32) -> Self {
        Self {
            store: FreeRectStore::new(width, height),
            padding,
        }
    }

    /// Packs `indices` (referring into `bitmaps`) onto this page, honoring
    /// dedup (`unique`) and rotation (`allow_rotation`). Placements come back
    /// in input order; indices that didn't fit are returned for the next page.
    pub fn pack(&mut self, bitmaps: &[Bitmap], indices: &[usize], cfg: &Config) -> PageResult {
        let canonical = if cfg.unique {
            Self::canonicalize(bitmaps, indices)
        } else {
            indices.iter().map(|&i| (i, i)).collect()
        };

        let mut placements = Vec::with_capacity(indices.len());
        let mut placed_at: HashMap<usize, (u32, u32, bool)> = HashMap::new();
        let mut unfit = Vec::new();

        for &idx in indices {
            let canon = canonical[&idx];
            if canon == idx {
                let bmp = &bitmaps[idx];
                let w = bmp.width + self.padding;
                let h = bmp.height + self.padding;
                match self.store.insert(w, h, cfg.allow_rotation) {
                    Some((x, y, rotated)) => {
                        placed_at.insert(idx, (x, y, rotated));
                        placements.push(Placement {
                            bitmap_ref: idx,
                            x,
                            y,
                            rotated,
                            duplicate_of: None,
                        });
                    }
                    None => unfit.push(idx),
                }
            } else if let Some(&(x, y, rotated)) = placed_at.get(&canon) {
                placements.push(Placement {
                    bitmap_ref: idx,
                    x,
                    y,
                    rotated,
                    duplicate_of: Some(canon),
                });
            } else {
                // canonical didn't make it onto this page either; retry both
                // together next round so dedup grouping is rebuilt fresh.
                unfit.push(idx);
            }
        }

        PageResult { placements, unfit }
    }

    /// Maps each index to the first-encountered index sharing identical
    /// pixel bytes (itself, if it's the first of its kind).
    fn canonicalize(bitmaps: &[Bitmap], indices: &[usize]) -> HashMap<usize, usize> {
        let mut by_hash: HashMap<u64, Vec<usize>> = HashMap::new();
        for &idx in indices {
            by_hash.entry(bitmaps[idx].hash_value).or_default().push(idx);
        }

        let mut canonical = HashMap::with_capacity(indices.len());
        for group in by_hash.values() {
            let mut representatives: Vec<usize> = Vec::new();
            for &idx in group {
                let existing = representatives
                    .iter()
                    .find(|&&rep| bitmaps[rep].pixels.as_raw() == bitmaps[idx].pixels.as_raw());
                match existing {
                    Some(&rep) => {
                        canonical.insert(idx, rep);
                    }
                    None => {
                        representatives.push(idx);
                        canonical.insert(idx, idx);
                    }
                }
            }
        }
        canonical
    }
}
