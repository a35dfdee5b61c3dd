use std::fmt::Write as _;

use crate::manifest::Manifest;

/// Serializes a [`Manifest`] as `<atlas><tex><img/></tex></atlas>`.
pub fn to_xml(manifest: &Manifest, with_trim: bool, with_rotate: bool) -> String {
    let mut out = String::new();
    out.push_str("<atlas>\n");
    for page in &manifest.pages {
        let _ = writeln!(out, "  <tex n=\"{}\">", xml_escape(&page.name));
        for img in &page.images {
            let _ = write!(
                out,
                "    <img n=\"{}\" x=\"{}\" y=\"{}\" w=\"{}\" h=\"{}\"",
                xml_escape(&img.name),
                img.x,
                img.y,
                img.width,
                img.height
            );
            if with_trim {
                let _ = write!(
                    out,
                    " fx=\"{}\" fy=\"{}\" fw=\"{}\" fh=\"{}\"",
                    img.frame_x, img.frame_y, img.frame_width, img.frame_height
                );
            }
            if with_rotate && img.rotated {
                out.push_str(" r=\"1\"");
            }
            out.push_str("/>\n");
        }
        out.push_str("  </tex>\n");
    }
    out.push_str("</atlas>\n");
    out
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
