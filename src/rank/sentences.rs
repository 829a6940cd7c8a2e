//! Approximate sentence splitting.
//!
//! A sentence ends at whitespace that follows `.` or `?`, unless the word
//! before that whitespace is an abbreviation:
//!
//! - a single capital initial (`J.`)
//! - a two-letter title-case abbreviation (`Mr.`, `Dr.`, `St.`)
//! - a dotted abbreviation (`e.g.`, `i.e.`, `U.S.`)

/// Scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    /// Inside a word
    Word,
    /// Right after a `.` or `?` ending a word
    Terminal,
    /// Inside whitespace
    Space,
}

/// Split `text` into trimmed, non-empty sentences in order.
///
/// Joining the result with single spaces gives back `text` up to whitespace
/// normalization.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut word_start = 0;
    let mut state = Scan::Space;

    for (i, c) in text.char_indices() {
        state = match (state, c) {
            (_, c) if c.is_whitespace() => {
                if state == Scan::Terminal && !is_abbreviation(&text[word_start..i]) {
                    push_trimmed(&mut sentences, &text[start..i]);
                    start = i;
                }
                Scan::Space
            }
            (Scan::Space, _) => {
                word_start = i;
                terminal_or_word(c)
            }
            (_, c) => terminal_or_word(c),
        };
    }
    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

fn terminal_or_word(c: char) -> Scan {
    if c == '.' || c == '?' {
        Scan::Terminal
    } else {
        Scan::Word
    }
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, piece: &'a str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece);
    }
}

/// Whether `word`, which ends in `.` or `?`, is an abbreviation.
fn is_abbreviation(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    if n < 2 || chars[n - 1] != '.' {
        return false;
    }

    let initial = n == 2 && chars[0].is_uppercase();
    let title_case = n == 3 && chars[0].is_uppercase() && chars[1].is_lowercase();
    let dotted = n >= 4
        && chars[n - 3] == '.'
        && chars[n - 4].is_alphanumeric()
        && chars[n - 2].is_alphanumeric();
    initial || title_case || dotted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_split() {
        assert_eq!(
            split_sentences("The city is old. Is it safe? Yes it is"),
            vec!["The city is old.", "Is it safe?", "Yes it is"]
        );
    }

    #[test]
    fn test_abbreviations_do_not_split() {
        let text = "Dr. Smith met J. Doe in the U.S. last year. Bring snacks, e.g. fruit. Done.";
        assert_eq!(
            split_sentences(text),
            vec![
                "Dr. Smith met J. Doe in the U.S. last year.",
                "Bring snacks, e.g. fruit.",
                "Done."
            ]
        );
    }

    #[test]
    fn test_no_break_without_whitespace() {
        assert_eq!(split_sentences("Version 2.5.1 shipped."), vec!["Version 2.5.1 shipped."]);
        assert_eq!(split_sentences("Ends with period."), vec!["Ends with period."]);
    }

    #[test]
    fn test_whitespace_runs_and_empty() {
        assert_eq!(split_sentences("One.   Two.\nThree."), vec!["One.", "Two.", "Three."]);
        assert!(split_sentences("   ").is_empty());
        assert!(split_sentences("").is_empty());
    }

    #[test]
    fn test_join_reconstructs_content() {
        let content =
            "Nice is on the coast. Visit the old town, e.g. the market. What else? Beaches.";
        let rejoined = split_sentences(content).join(" ");
        assert_eq!(rejoined, content);
    }
}
