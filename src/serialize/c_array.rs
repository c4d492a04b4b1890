use std::fmt::Write as _;

use crate::foundation::error::{ForgeError, ForgeResult};

const BYTES_PER_LINE: usize = 16;

/// Render `data` as a C translation unit defining `<name>_size` and `<name>[]`.
///
/// `origin` is only echoed in the header comment.
pub fn render_c_array(data: &[u8], name: &str, origin: &str) -> ForgeResult<String> {
    if !is_c_identifier(name) {
        return Err(ForgeError::validation(format!(
            "'{name}' is not a valid C identifier"
        )));
    }

    let mut out = String::with_capacity(data.len() * 6 + 256);
    let _ = writeln!(out, "// Auto-generated from {origin}");
    let _ = writeln!(out, "// File size: {} bytes", data.len());
    out.push('\n');
    out.push_str("#include <stdint.h>\n\n");
    let _ = writeln!(out, "const uint32_t {name}_size = {};", data.len());
    let _ = writeln!(out, "const uint8_t {name}[] = {{");
    for chunk in data.chunks(BYTES_PER_LINE) {
        let line: Vec<String> = chunk.iter().map(|b| format!("0x{b:02x}")).collect();
        let _ = writeln!(out, "    {},", line.join(", "));
    }
    out.push_str("};\n");
    Ok(out)
}

fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
