//! Text layout helpers shared by the panes

/// Greedy word wrap of one paragraph-structured text to `width` columns.
///
/// Explicit `\n` always starts a new row; words longer than `width` are split.
/// Widths are counted in chars.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for line in text.split('\n') {
        let mut row = String::new();
        let mut row_len = 0;

        for word in line.split(' ') {
            let word_len = word.chars().count();
            let needed = if row_len == 0 { word_len } else { row_len + 1 + word_len };

            if needed <= width {
                if row_len > 0 {
                    row.push(' ');
                    row_len += 1;
                }
                row.push_str(word);
                row_len += word_len;
                continue;
            }

            if row_len > 0 {
                rows.push(std::mem::take(&mut row));
                row_len = 0;
            }

            // Hard-split words that cannot fit on a row of their own
            let mut chars = word.chars().peekable();
            while chars.peek().is_some() {
                let chunk: String = chars.by_ref().take(width).collect();
                let chunk_len = chunk.chars().count();
                if chunk_len == width && chars.peek().is_some() {
                    rows.push(chunk);
                } else {
                    row = chunk;
                    row_len = chunk_len;
                }
            }
        }
        rows.push(row);
    }
    rows
}

/// Hard-wrap `text` at `width` chars and locate `cursor` (a char index) in
/// the result as (column, row).
pub(crate) fn layout_input(
    text: &str,
    cursor: usize,
    width: usize,
) -> (Vec<String>, (usize, usize)) {
    let width = width.max(1);
    let mut rows = vec![String::new()];
    let mut position = (0, 0);
    let mut col = 0;

    for (i, ch) in text.chars().enumerate() {
        if ch != '\n' && col == width {
            rows.push(String::new());
            col = 0;
        }
        if i == cursor {
            position = (col, rows.len() - 1);
        }
        if ch == '\n' {
            rows.push(String::new());
            col = 0;
            continue;
        }
        if let Some(row) = rows.last_mut() {
            row.push(ch);
        }
        col += 1;
    }

    if cursor >= text.chars().count() {
        if col == width {
            rows.push(String::new());
            col = 0;
        }
        position = (col, rows.len() - 1);
    }
    (rows, position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_text("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn keeps_explicit_blank_lines() {
        assert_eq!(
            wrap_text("Sure!\n\n(demo)", 20),
            vec!["Sure!", "", "(demo)"]
        );
    }

    #[test]
    fn splits_overlong_words() {
        assert_eq!(wrap_text("abcdefgh ij", 3), vec!["abc", "def", "gh", "ij"]);
    }

    #[test]
    fn empty_text_is_one_empty_row() {
        assert_eq!(wrap_text("", 8), vec![String::new()]);
    }

    #[test]
    fn input_cursor_tracks_wraps_and_newlines() {
        let (rows, pos) = layout_input("abcdef", 6, 4);
        assert_eq!(rows, vec!["abcd", "ef"]);
        assert_eq!(pos, (2, 1));

        let (rows, pos) = layout_input("ab\ncd", 3, 10);
        assert_eq!(rows, vec!["ab", "cd"]);
        assert_eq!(pos, (0, 1));

        let (_, pos) = layout_input("abcde", 4, 4);
        assert_eq!(pos, (0, 1));

        let (rows, pos) = layout_input("abcd", 4, 4);
        assert_eq!(rows, vec!["abcd", ""]);
        assert_eq!(pos, (0, 1));
    }
}
