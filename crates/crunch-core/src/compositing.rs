use image::RgbaImage;

/// Blits `src` onto `canvas` at `(dx, dy)`, rotating 90 degrees clockwise
/// first when `rotated` is set. Pixels that would land outside `canvas` are
/// clipped rather than written.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32, rotated: bool) {
    let (sw, sh) = src.dimensions();
    let (cw, ch) = canvas.dimensions();
    let (rw, rh) = if rotated { (sh, sw) } else { (sw, sh) };

    for yy in 0..rh {
        for xx in 0..rw {
            let (sx, sy) = if rotated {
                (yy, sh - 1 - xx)
            } else {
                (xx, yy)
            };
            if dx + xx < cw && dy + yy < ch {
                let px = *src.get_pixel(sx, sy);
                canvas.put_pixel(dx + xx, dy + yy, px);
            }
        }
    }
}
