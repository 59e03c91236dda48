//! Text normalization for lexical matching

/// Normalized token stream of a text.
///
/// Tokens are lowercase, typographic apostrophes are folded to `'`, and anything that is
/// neither alphanumeric nor an apostrophe separates tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    tokens: Vec<String>,
    /// Tokens joined by single spaces, with a leading and trailing space
    padded: String,
}

impl NormalizedText {
    pub fn new(text: &str) -> Self {
        let folded: String = text
            .chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' | '\u{02BC}' | '`' => '\'',
                other => other,
            })
            .flat_map(char::to_lowercase)
            .collect();

        let tokens: Vec<String> = folded
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .map(|t| t.trim_matches('\''))
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        let mut padded = String::with_capacity(folded.len() + 2);
        padded.push(' ');
        for token in &tokens {
            padded.push_str(token);
            padded.push(' ');
        }

        Self { tokens, padded }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whole-word match of a normalized term or multi-word phrase
    pub fn contains(&self, entry: &str) -> bool {
        if entry.is_empty() {
            return false;
        }
        let needle = format!(" {} ", entry);
        self.padded.contains(&needle)
    }
}
