use serde_json::json;

use crate::manifest::Manifest;

/// Serializes a [`Manifest`] as `{"textures": [...]}`, with each image
/// carrying `n`/`x`/`y`/`w`/`h` and the optional `fx`/`fy`/`fw`/`fh`/`r`
/// fields gated by `with_trim`/`with_rotate`.
pub fn to_json(manifest: &Manifest, with_trim: bool, with_rotate: bool) -> serde_json::Value {
    let textures: Vec<_> = manifest
        .pages
        .iter()
        .map(|page| {
            let images: Vec<_> = page
                .images
                .iter()
                .map(|img| {
                    let mut v = json!({
                        "n": img.name,
                        "x": img.x,
                        "y": img.y,
                        "w": img.width,
                        "h": img.height,
                    });
                    if with_trim {
                        v["fx"] = json!(img.frame_x);
                        v["fy"] = json!(img.frame_y);
                        v["fw"] = json!(img.frame_width);
                        v["fh"] = json!(img.frame_height);
                    }
                    if with_rotate && img.rotated {
                        v["r"] = json!(1);
                    }
                    v
                })
                .collect();
            json!({ "name": page.name, "images": images })
        })
        .collect();

    json!({ "textures": textures })
}
