//! Utility functions and helpers

/// Strips module paths from a type name, keeping generic arguments readable.
///
/// `alloc::sync::Arc<my_crate::Foo>` becomes `Arc<Foo>`.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    for (i, c) in full.char_indices() {
        match c {
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | ';' => {
                out.push_str(last_segment(&full[segment_start..i]));
                out.push(c);
                segment_start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    out.push_str(last_segment(&full[segment_start..]));
    out
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}
