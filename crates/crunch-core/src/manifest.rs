use crate::model::{Bitmap, Page};

/// One image's placement data as it appears in an output manifest. Unlike
/// [`crate::model::Placement`], this carries the resolved width/height/frame
/// fields (looked up from the referenced `Bitmap`) since every serializer
/// needs them and none of them need `duplicate_of` — alias bookkeeping is
/// purely an internal packing concern, not part of any manifest format.
#[derive(Debug, Clone)]
pub struct ManifestImage {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub frame_x: u32,
    pub frame_y: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    pub rotated: bool,
}

#[derive(Debug, Clone)]
pub struct ManifestPage {
    pub name: String,
    pub images: Vec<ManifestImage>,
}

#[derive(Debug, Clone)]
pub struct Manifest {
    pub pages: Vec<ManifestPage>,
}

/// Builds the manifest data model from packed pages, resolving each
/// placement against its bitmap. `atlas_name` is the output path's stem
/// ("<relativePath>" in spec terms); page names are `"{atlas_name}{index}"`.
pub fn build_manifest(atlas_name: &str, pages: &[Page], bitmaps: &[Bitmap]) -> Manifest {
    let pages = pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let images = page
                .placements
                .iter()
                .map(|p| {
                    let bmp = &bitmaps[p.bitmap_ref];
                    ManifestImage {
                        name: bmp.name.clone(),
                        x: p.x,
                        y: p.y,
                        width: bmp.width,
                        height: bmp.height,
                        frame_x: bmp.frame_x,
                        frame_y: bmp.frame_y,
                        frame_width: bmp.frame_width,
                        frame_height: bmp.frame_height,
                        rotated: p.rotated,
                    }
                })
                .collect();
            ManifestPage {
                name: format!("{atlas_name}{i}"),
                images,
            }
        })
        .collect();

    Manifest { pages }
}
