use image::RgbaImage;

use crate::fingerprint::fnv1a64;
use crate::model::Bitmap;

/// A decoded source image handed to the pipeline, before trimming.
pub struct DecodedImage {
    pub name: String,
    pub pixels: RgbaImage,
}

/// Builds a [`Bitmap`] from a decoded image: optional premultiply, optional
/// trim to the tight opaque bounding box, and a content hash over the final
/// pixel buffer.
pub fn build_bitmap(image: DecodedImage, premultiply: bool, trim: bool) -> Bitmap {
    let DecodedImage { name, mut pixels } = image;

    if premultiply {
        premultiply_alpha(&mut pixels);
    }

    let (width, height) = pixels.dimensions();
    let (frame_x, frame_y, frame_width, frame_height, pixels) = if trim {
        match compute_trim_rect(&pixels) {
            Some((fx, fy, fw, fh)) => {
                let cropped = crop(&pixels, fx, fy, fw, fh);
                (fx, fy, fw, fh, cropped)
            }
            None => {
                // fully transparent: 1x1 empty bitmap per the trim contract
                (0, 0, 0, 0, RgbaImage::new(1, 1))
            }
        }
    } else {
        (0, 0, width, height, pixels)
    };

    let hash_value = fnv1a64(pixels.as_raw());
    let (width, height) = pixels.dimensions();

    Bitmap {
        name,
        width,
        height,
        frame_x,
        frame_y,
        frame_width,
        frame_height,
        pixels,
        hash_value,
    }
}

/// Multiplies R, G, B by `A/255` with round-to-nearest, in place.
fn premultiply_alpha(img: &mut RgbaImage) {
    for px in img.pixels_mut() {
        let a = u32::from(px.0[3]);
        for c in 0..3 {
            let v = u32::from(px.0[c]);
            px.0[c] = ((v * a + 127) / 255) as u8;
        }
    }
}

/// Scans for the tightest axis-aligned rectangle containing any pixel with
/// `alpha != 0`. Returns `None` if the image is entirely transparent.
fn compute_trim_rect(img: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = img.dimensions();
    let mut min_x = w;
    let mut min_y = h;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut found = false;

    for y in 0..h {
        for x in 0..w {
            if img.get_pixel(x, y).0[3] != 0 {
                found = true;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }
    }

    if !found {
        return None;
    }

    Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

fn crop(img: &RgbaImage, x: u32, y: u32, w: u32, h: u32) -> RgbaImage {
    let mut out = RgbaImage::new(w, h);
    for yy in 0..h {
        for xx in 0..w {
            out.put_pixel(xx, yy, *img.get_pixel(x + xx, y + yy));
        }
    }
    out
}
