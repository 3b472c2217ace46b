use crate::render::text::TextRaster;

#[derive(Debug, PartialEq, Eq)]
struct Word<'a> {
    text: &'a str,
    spaced: bool,
}

/// Split at whitespace, and after `,` or `|` which stay with the preceding word.
fn words(text: &str) -> Vec<Word<'_>> {
    let mut out = Vec::new();
    let mut start = None;
    let mut spaced = false;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                out.push(Word {
                    text: &text[s..i],
                    spaced,
                });
            }
            spaced = !out.is_empty();
            continue;
        }
        let s = *start.get_or_insert(i);
        if c == ',' || c == '|' {
            let end = i + c.len_utf8();
            out.push(Word {
                text: &text[s..end],
                spaced,
            });
            start = None;
            spaced = false;
        }
    }
    if let Some(s) = start {
        out.push(Word {
            text: &text[s..],
            spaced,
        });
    }
    out
}

/// Greedy line breaking: words accumulate while the line fits in `max_width` pixels.
///
/// A single word wider than the limit gets a line of its own.
pub fn wrap_text(
    text: &str,
    max_width: f32,
    font_size: f32,
    raster: &mut dyn TextRaster,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in words(text) {
        if line.is_empty() {
            line.push_str(word.text);
            continue;
        }
        let mut candidate = line.clone();
        if word.spaced {
            candidate.push(' ');
        }
        candidate.push_str(word.text);
        if raster.measure(&candidate, font_size) <= max_width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.text.to_string()));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/panels/wrap.rs"]
mod tests;
