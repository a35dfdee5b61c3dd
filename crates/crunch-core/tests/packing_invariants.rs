use crunch_core::prelude::*;
use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng};

fn solid(name: &str, w: u32, h: u32, color: [u8; 4]) -> DecodedImage {
    let mut img = RgbaImage::new(w, h);
    for px in img.pixels_mut() {
        *px = Rgba(color);
    }
    DecodedImage {
        name: name.to_string(),
        pixels: img,
    }
}

fn effective_rect(placement: &Placement, bitmaps: &[Bitmap]) -> (u32, u32, u32, u32) {
    let bmp = &bitmaps[placement.bitmap_ref];
    let (w, h) = if placement.rotated {
        (bmp.height, bmp.width)
    } else {
        (bmp.width, bmp.height)
    };
    (placement.x, placement.y, w, h)
}

fn chebyshev_gap(a: (u32, u32, u32, u32), b: (u32, u32, u32, u32)) -> i64 {
    let (ax, ay, aw, ah) = a;
    let (bx, by, bw, bh) = b;
    let (ax, ay, aw, ah) = (ax as i64, ay as i64, aw as i64, ah as i64);
    let (bx, by, bw, bh) = (bx as i64, by as i64, bw as i64, bh as i64);
    let dx = (ax - (bx + bw)).max(bx - (ax + aw));
    let dy = (ay - (by + bh)).max(by - (ay + ah));
    dx.max(dy)
}

// Invariant 1 & 2: no overlap, and padding/bounds respected.
#[test]
fn random_batch_has_no_overlap_and_respects_padding() {
    let cfg = Config {
        page_size: 512,
        padding: 2,
        ..Config::default()
    };
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let bitmaps: Vec<Bitmap> = (0..60)
        .map(|i| {
            let w = rng.gen_range(4..=48);
            let h = rng.gen_range(4..=48);
            build_bitmap(solid(&format!("r{i}"), w, h, [10, 20, 30, 255]), false, false)
        })
        .collect();

    let out = pack(&bitmaps, &cfg).expect("pack");
    for page in &out.pages {
        let rects: Vec<_> = page
            .placements
            .iter()
            .map(|p| effective_rect(p, &bitmaps))
            .collect();
        for (x, y, w, h) in &rects {
            assert!(*x + *w <= page.width);
            assert!(*y + *h <= page.height);
        }
        for i in 0..rects.len() {
            for j in (i + 1)..rects.len() {
                assert!(chebyshev_gap(rects[i], rects[j]) >= cfg.padding as i64);
            }
        }
    }
}

// Invariant 3: every non-alias bitmap is placed exactly once.
#[test]
fn every_bitmap_is_placed_exactly_once() {
    let cfg = Config {
        page_size: 64,
        padding: 0,
        ..Config::default()
    };
    let bitmaps: Vec<Bitmap> = (0..10)
        .map(|i| build_bitmap(solid(&format!("r{i}"), 16, 16, [i as u8, 0, 0, 255]), false, false))
        .collect();

    let out = pack(&bitmaps, &cfg).expect("pack");
    let mut seen = vec![0usize; bitmaps.len()];
    for page in &out.pages {
        for p in &page.placements {
            seen[p.bitmap_ref] += 1;
        }
    }
    assert!(seen.iter().all(|&c| c == 1));
}

// Invariant 4: alias placements share their canonical's geometry and pixels.
#[test]
fn alias_placements_match_canonical_geometry_and_pixels() {
    let cfg = Config {
        page_size: 64,
        padding: 0,
        unique: true,
        ..Config::default()
    };
    let bitmaps: Vec<Bitmap> = vec![
        build_bitmap(solid("x", 8, 8, [1, 2, 3, 255]), false, false),
        build_bitmap(solid("y", 8, 8, [1, 2, 3, 255]), false, false),
    ];

    let out = pack(&bitmaps, &cfg).expect("pack");
    assert_eq!(out.pages.len(), 1);
    let placements = &out.pages[0].placements;
    let canonical = placements.iter().find(|p| p.duplicate_of.is_none()).unwrap();
    let alias = placements.iter().find(|p| p.duplicate_of.is_some()).unwrap();

    assert_eq!(alias.duplicate_of, Some(canonical.bitmap_ref));
    assert_eq!((alias.x, alias.y, alias.rotated), (canonical.x, canonical.y, canonical.rotated));
    assert_eq!(
        bitmaps[alias.bitmap_ref].pixels.as_raw(),
        bitmaps[canonical.bitmap_ref].pixels.as_raw()
    );
}

// Invariant 5: round-trip through blit_rgba reproduces the source pixels.
#[test]
fn blitted_page_reproduces_source_pixels_accounting_for_rotation() {
    let cfg = Config {
        page_size: 64,
        padding: 1,
        allow_rotation: true,
        ..Config::default()
    };
    let bitmaps: Vec<Bitmap> = vec![
        build_bitmap(solid("tall", 4, 12, [200, 0, 0, 255]), false, false),
        build_bitmap(solid("wide", 12, 4, [0, 200, 0, 255]), false, false),
    ];

    let out = pack(&bitmaps, &cfg).expect("pack");
    for page in &out.pages {
        let mut canvas = RgbaImage::new(page.width, page.height);
        for p in &page.placements {
            if p.duplicate_of.is_some() {
                continue;
            }
            let bmp = &bitmaps[p.bitmap_ref];
            blit_rgba(&bmp.pixels, &mut canvas, p.x, p.y, p.rotated);
        }
        for p in &page.placements {
            if p.duplicate_of.is_some() {
                continue;
            }
            let bmp = &bitmaps[p.bitmap_ref];
            let (w, h) = (bmp.width, bmp.height);
            let (rw, rh) = if p.rotated { (h, w) } else { (w, h) };
            for yy in 0..rh {
                for xx in 0..rw {
                    let (sx, sy) = if p.rotated { (yy, h - 1 - xx) } else { (xx, yy) };
                    assert_eq!(
                        *canvas.get_pixel(p.x + xx, p.y + yy),
                        *bmp.pixels.get_pixel(sx, sy)
                    );
                }
            }
        }
    }
}

// Invariant 7: fingerprint sensitivity to CLI tokens and input bytes.
#[test]
fn fingerprint_changes_with_either_input() {
    let args_a = vec!["out".to_string(), "-t".to_string()];
    let args_b = vec!["out".to_string(), "-r".to_string()];
    let files_a = vec![vec![1u8, 2, 3]];
    let files_b = vec![vec![1u8, 2, 4]];

    let base = compute_fingerprint(&args_a, &files_a);
    assert_ne!(base, compute_fingerprint(&args_b, &files_a));
    assert_ne!(base, compute_fingerprint(&args_a, &files_b));
    assert_eq!(base, compute_fingerprint(&args_a, &files_a));
}

// Invariant 8: the three manifest formats agree on every field.
#[test]
fn manifest_formats_agree_across_xml_json_bin() {
    let cfg = Config {
        page_size: 64,
        padding: 1,
        trim: true,
        allow_rotation: true,
        ..Config::default()
    };
    let bitmaps: Vec<Bitmap> = vec![
        build_bitmap(solid("a", 10, 10, [9, 9, 9, 255]), false, true),
        build_bitmap(solid("b", 4, 20, [7, 7, 7, 255]), false, true),
    ];
    let out = pack(&bitmaps, &cfg).expect("pack");
    let manifest = build_manifest("atlas", &out.pages, &bitmaps);

    let xml = to_xml(&manifest, true, true);
    let json = to_json(&manifest, true, true);
    let bin = to_bin(&manifest, true, true);

    for page in &manifest.pages {
        for img in &page.images {
            assert!(xml.contains(&format!("n=\"{}\" x=\"{}\" y=\"{}\" w=\"{}\" h=\"{}\"", img.name, img.x, img.y, img.width, img.height)));
        }
    }
    let json_images = &json["textures"][0]["images"];
    assert_eq!(json_images.as_array().unwrap().len(), manifest.pages[0].images.len());
    assert!(!bin.is_empty());
}

// S5: 50 64x64 bitmaps on a 128x128 page with no padding pack into ceil(50/4) pages.
#[test]
fn fifty_tiles_on_a_128_page_need_thirteen_pages() {
    let cfg = Config {
        page_size: 128,
        padding: 0,
        ..Config::default()
    };
    let bitmaps: Vec<Bitmap> = (0..50)
        .map(|i| build_bitmap(solid(&format!("t{i}"), 64, 64, [1, 1, 1, 255]), false, false))
        .collect();

    let out = pack(&bitmaps, &cfg).expect("pack");
    assert_eq!(out.pages.len(), 13);
}

// PackingImpossible surfaces the offending bitmap's name.
#[test]
fn a_bitmap_larger_than_the_page_fails_by_name() {
    let cfg = Config {
        page_size: 64,
        ..Config::default()
    };
    let bitmaps = vec![build_bitmap(solid("huge", 200, 200, [0, 0, 0, 255]), false, false)];
    let err = pack(&bitmaps, &cfg).unwrap_err();
    match err {
        CrunchError::PackingImpossible(name) => assert_eq!(name, "huge"),
        other => panic!("unexpected error: {other:?}"),
    }
}
