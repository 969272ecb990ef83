/// Source text tokenizer.
///
/// Periods are stripped, the text is lowercased, then split on maximal runs
/// of characters outside `[A-Za-z0-9_']`. Separators at either end produce
/// an empty token at that end, and empty input produces a single empty
/// token.

use nom::{
    bytes::complete::{take_while, take_while1},
    multi::separated_list0,
    IResult,
};

use crate::placement;

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '\''
}

fn word(input: &str) -> IResult<&str, &str> {
    take_while(is_word_char)(input)
}

fn separator(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !is_word_char(c))(input)
}

fn split_words(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list0(separator, word)(input)
}

/// Normalize and split source text into lowercase tokens
pub fn tokenize(source: &str) -> Vec<String> {
    let normalized = source.replace('.', "").to_lowercase();
    match split_words(&normalized) {
        Ok((_, words)) => words.into_iter().map(str::to_owned).collect(),
        // `word` accepts empty input, so the list parser cannot fail
        Err(_) => vec![normalized],
    }
}

/// A tokenized source text, computed once per analysis run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenizedText {
    tokens: Vec<String>,
}

impl TokenizedText {
    pub fn new(source: &str) -> Self {
        Self {
            tokens: tokenize(source),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token indices equal to `term`
    pub fn occurrences(&self, term: &str) -> Vec<usize> {
        placement::locate(&self.tokens, term)
    }

    /// Height of the token at `index` within this text
    pub fn height_at(&self, index: usize) -> f32 {
        placement::height_for_index(index, self.tokens.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_periods_and_lowercases() {
        assert_eq!(tokenize("Cat. dog CAT"), vec!["cat", "dog", "cat"]);
    }

    #[test]
    fn empty_input_yields_one_empty_token() {
        assert_eq!(tokenize(""), vec![""]);
    }

    #[test]
    fn keeps_apostrophes_and_underscores() {
        assert_eq!(
            tokenize("Don't stop_here, Arthur's"),
            vec!["don't", "stop_here", "arthur's"]
        );
    }

    #[test]
    fn edge_separators_leave_empty_tokens() {
        assert_eq!(tokenize("\"Hello, world!\""), vec!["", "hello", "world", ""]);
        // A trailing period is removed before splitting
        assert_eq!(tokenize("the end."), vec!["the", "end"]);
    }

    #[test]
    fn non_ascii_letters_separate_words() {
        assert_eq!(tokenize("café au lait"), vec!["caf", "au", "lait"]);
    }

    #[test]
    fn periods_join_neighbours() {
        // "e.g." loses its periods and becomes one token
        assert_eq!(tokenize("e.g. this"), vec!["eg", "this"]);
    }

    #[test]
    fn tokenized_text_locates_terms() {
        let text = TokenizedText::new("A cat. A dog. A cat.");
        assert_eq!(text.len(), 6);
        assert_eq!(text.occurrences("cat"), vec![1, 5]);
        assert!(text.occurrences("bird").is_empty());
        assert!((text.height_at(3) - (100.0 / 6.0) * 3.0 * 0.2).abs() < 1e-5);
    }
}
