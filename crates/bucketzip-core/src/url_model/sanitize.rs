//! Linux-safe filename sanitization.

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Sanitizes a candidate filename for safe use on Linux.
///
/// - NUL, `/`, `\`, whitespace and control characters become `_`
/// - runs of `_` collapse to one
/// - leading/trailing dots, spaces and underscores are trimmed
/// - the result is cut to 255 bytes on a char boundary
pub fn sanitize_filename_for_linux(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let c = if c == '/' || c == '\\' || c.is_control() || c.is_whitespace() {
            '_'
        } else {
            c
        };
        if c == '_' && prev_underscore {
            continue;
        }
        prev_underscore = c == '_';
        out.push(c);
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.' || c == '_');
    let mut take = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}
