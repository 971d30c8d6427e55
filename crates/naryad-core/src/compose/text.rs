use crate::canvas::TextBlock;

/// Wrap text into lines of at most `budget` characters at word boundaries.
///
/// Words are never split, so a word longer than the budget gets a line of
/// its own. Explicit line breaks in the input start a new line; other
/// whitespace collapses to single spaces.
pub fn wrap_text(text: &str, budget: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_len = 0;

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if line_len == 0 {
                line.push_str(word);
                line_len = word_len;
            } else if line_len + 1 + word_len <= budget {
                line.push(' ');
                line.push_str(word);
                line_len += 1 + word_len;
            } else {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
                line_len = word_len;
            }
        }

        if line_len > 0 {
            lines.push(line);
        }
    }

    lines
}

/// First `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Where and how a wrapped text block is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Multiline {
    /// Position of the first line.
    pub first: (f32, f32),
    /// Position of the second line; later lines follow at `line_spacing`.
    pub next: (f32, f32),
    /// Characters per line.
    pub budget: usize,
    pub font_size: f32,
    pub line_spacing: f32,
}

impl Multiline {
    /// Positions of each wrapped line, paired with its text.
    pub fn layout(&self, text: &str) -> Vec<(f32, f32, String)> {
        wrap_text(text, self.budget)
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                if i == 0 {
                    (self.first.0, self.first.1, line)
                } else {
                    let y = self.next.1 + (i - 1) as f32 * self.line_spacing;
                    (self.next.0, y, line)
                }
            })
            .collect()
    }
}

/// Draw `text` wrapped according to `spec`.
pub fn write_multiline<B: TextBlock + ?Sized>(block: &mut B, spec: &Multiline, text: &str) {
    for (x, y, line) in spec.layout(text) {
        block.place_text(x, y, &line, spec.font_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wrap_at_word_boundary() {
        let lines = wrap_text("один два три четыре", 9);
        assert_eq!(lines, vec!["один два", "три", "четыре"]);
    }

    #[test]
    fn test_budget_counts_characters_not_bytes() {
        // 8 Cyrillic chars = 16 bytes
        let lines = wrap_text("абвг деёж", 9);
        assert_eq!(lines, vec!["абвг деёж"]);
    }

    #[test]
    fn test_long_word_kept_whole() {
        let lines = wrap_text("a verylongword b", 4);
        assert_eq!(lines, vec!["a", "verylongword", "b"]);
    }

    #[test]
    fn test_explicit_breaks_kept() {
        let lines = wrap_text("first line\nsecond  line\n\n", 300);
        assert_eq!(lines, vec!["first line", "second line"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(wrap_text("   ", 10).is_empty());
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("Иванов Иван", 6), "Иванов");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_multiline_anchors() {
        let spec = Multiline {
            first: (278.0, 212.0),
            next: (60.0, 225.0),
            budget: 5,
            font_size: 12.0,
            line_spacing: 14.0,
        };
        let placed = spec.layout("aaa bbb ccc");
        assert_eq!(placed[0], (278.0, 212.0, "aaa".to_string()));
        assert_eq!(placed[1], (60.0, 225.0, "bbb".to_string()));
        assert_eq!(placed[2], (60.0, 239.0, "ccc".to_string()));
    }

    proptest! {
        #[test]
        fn wrap_reflows_to_normalized_text(
            text in "[a-zа-я ]{0,20}( [a-zа-я\n ]{0,30}){0,4}",
            budget in 1usize..40,
        ) {
            let lines = wrap_text(&text, budget);
            let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
            prop_assert_eq!(lines.join(" "), normalized);
        }

        #[test]
        fn wrapped_lines_fit_budget_unless_single_word(
            text in "[a-z]{1,12}( [a-z]{1,12}){0,20}",
            budget in 1usize..40,
        ) {
            for line in wrap_text(&text, budget) {
                let fits = line.chars().count() <= budget;
                prop_assert!(fits || !line.contains(' '), "line {:?} over budget {}", line, budget);
            }
        }
    }
}
