use crate::manifest::Manifest;

/// Serializes a [`Manifest`] into the bit-exact binary layout: all integers
/// signed 16-bit little-endian, strings null-terminated UTF-8. `with_trim`
/// and `with_rotate` gate the optional frame/rotated fields per image.
pub fn to_bin(manifest: &Manifest, with_trim: bool, with_rotate: bool) -> Vec<u8> {
    let mut out = Vec::new();

    push_i16(&mut out, manifest.pages.len() as i16);
    for page in &manifest.pages {
        push_string(&mut out, &page.name);
        push_i16(&mut out, page.images.len() as i16);
        for img in &page.images {
            push_string(&mut out, &img.name);
            push_i16(&mut out, img.x as i16);
            push_i16(&mut out, img.y as i16);
            push_i16(&mut out, img.width as i16);
            push_i16(&mut out, img.height as i16);
            if with_trim {
                push_i16(&mut out, img.frame_x as i16);
                push_i16(&mut out, img.frame_y as i16);
                push_i16(&mut out, img.frame_width as i16);
                push_i16(&mut out, img.frame_height as i16);
            }
            if with_rotate {
                out.push(u8::from(img.rotated));
            }
        }
    }

    out
}

fn push_i16(out: &mut Vec<u8>, v: i16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_string(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(s.as_bytes());
    out.push(0);
}
