//! Renderings of a layout
//!
//! The C source format declares three arrays: the bitmap columns,
//!     the width of every line and the end of every line.
//! The PBM format is a binary (P4) bitmap 16 pixels wide with one row per column,
//!     so the text reads top to bottom when the image is viewed.

use fhf::Layout;

pub fn c_source(layout: &Layout) -> String {
    let mut s = String::new();
    push_array(&mut s, "uint16_t bitmap", layout.columns.iter().map(|c| format!("0x{c:X}")));
    push_array(&mut s, "size_t line_widths", layout.lines.iter().map(|l| l.width.to_string()));
    push_array(&mut s, "size_t line_ends", layout.lines.iter().map(|l| l.end.to_string()));
    s
}

fn push_array(s: &mut String, declaration: &str, values: impl Iterator<Item = String>) {
    s.push_str(declaration);
    s.push_str("[] = {\n    ");
    for value in values {
        s.push_str(&value);
        s.push_str(", ");
    }
    s.push_str("\n};\n");
}

pub fn pbm(layout: &Layout) -> Vec<u8> {
    let mut b = format!("P4\n16 {}\n", layout.columns.len()).into_bytes();
    for column in &layout.columns {
        b.extend(column.to_be_bytes());
    }
    b
}

pub fn json(layout: &Layout) -> Result<String, String> {
    let mut s = serde_json::to_string_pretty(layout)
        .map_err(|err| format!("Failed to serialize the layout: {err}"))?;
    s.push('\n');
    Ok(s)
}
