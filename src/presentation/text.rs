// Fixed-width text wrapping for the layout text boxes

/// Wrap `text` at `width` characters, keeping at most `max_lines` lines.
///
/// Breaks at whitespace where possible; a word longer than `width` is
/// split to fill the current line. Character counts, not pixels, decide
/// the breaks since every layout font is monospaced.
pub fn wrap_text(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while !word.is_empty() {
            let sep = usize::from(current_len > 0);
            if current_len + sep + word.len() <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.extend(word.iter());
                current_len += sep + word.len();
                break;
            }

            if word.len() > width {
                let space_left = width.saturating_sub(current_len + sep);
                if space_left > 0 {
                    let rest = word.split_off(space_left);
                    if sep == 1 {
                        current.push(' ');
                    }
                    current.extend(word.iter());
                    word = rest;
                }
            }

            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines.truncate(max_lines);
    lines
}
