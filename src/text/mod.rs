//! Canonical reading texts.
//!
//! Each exam form has one reference passage. The fluency score counts its
//! tokens, so tokenization must stay stable: punctuation is kept attached to
//! words and only whitespace separates tokens.

pub mod registry;
pub mod source;

pub use registry::CanonicalTextRegistry;
pub use source::{DirTextSource, MemoryTextSource, TextSource};

use crate::error::LectometroError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exam form. The two forms are parallel variants with distinct passages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Form {
    #[serde(rename = "2A")]
    Form2A,
    #[serde(rename = "2B")]
    Form2B,
}

impl Form {
    pub const ALL: [Form; 2] = [Form::Form2A, Form::Form2B];

    pub fn as_str(self) -> &'static str {
        match self {
            Form::Form2A => "2A",
            Form::Form2B => "2B",
        }
    }

    /// File name of the passage backing this form.
    pub fn resource_name(self) -> String {
        format!("fluidez_{}.txt", self.as_str())
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Form::Form2A => 0,
            Form::Form2B => 1,
        }
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Form {
    type Err = LectometroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2A" => Ok(Form::Form2A),
            "2B" => Ok(Form::Form2B),
            other => Err(LectometroError::InvalidForm {
                value: other.to_string(),
            }),
        }
    }
}

/// A tokenized reference passage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalText {
    form: Form,
    tokens: Vec<String>,
}

impl CanonicalText {
    pub fn new(form: Form, raw: &str) -> Self {
        Self {
            form,
            tokens: tokenize(raw),
        }
    }

    pub fn form(&self) -> Form {
        self.form
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn word_count(&self) -> usize {
        self.tokens.len()
    }
}

/// Split a passage into word tokens.
///
/// Line breaks count as spaces, runs of whitespace never yield empty tokens,
/// and punctuation is left in place ("perro," stays one token).
pub fn tokenize(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn parses_known_forms() {
        assert_eq!("2A".parse::<Form>().unwrap(), Form::Form2A);
        assert_eq!("2B".parse::<Form>().unwrap(), Form::Form2B);
    }

    #[test]
    fn unknown_form_is_invalid_form() {
        for value in ["3C", "2a", "", " 2A", "2C"] {
            match value.parse::<Form>() {
                Err(LectometroError::InvalidForm { value: v }) => assert_eq!(v, value),
                other => panic!("expected InvalidForm for {:?}, got {:?}", value, other),
            }
        }
    }

    #[test]
    fn invalid_form_surfaces_as_invalid_input() {
        let err = "3C".parse::<Form>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn resource_names_follow_form() {
        assert_eq!(Form::Form2A.resource_name(), "fluidez_2A.txt");
        assert_eq!(Form::Form2B.resource_name(), "fluidez_2B.txt");
    }

    #[test]
    fn form_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Form::Form2B).unwrap(), "\"2B\"");
        assert_eq!(Form::Form2A.to_string(), "2A");
    }

    #[test]
    fn tokenize_keeps_punctuation() {
        let tokens = tokenize("Había una vez, un perro. ¡Corría!");
        assert_eq!(
            tokens,
            vec!["Había", "una", "vez,", "un", "perro.", "¡Corría!"]
        );
    }

    #[test]
    fn tokenize_treats_newlines_as_spaces() {
        let tokens = tokenize("el sol\nsalió\r\ntemprano\n\n  hoy ");
        assert_eq!(tokens, vec!["el", "sol", "salió", "temprano", "hoy"]);
    }

    #[test]
    fn tokenize_keeps_hyphenated_words_whole() {
        assert_eq!(tokenize("franco-chileno - bien").len(), 3);
    }

    #[test]
    fn tokenize_empty_text_has_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \n\t ").is_empty());
    }

    #[test]
    fn canonical_text_counts_tokens() {
        let text = CanonicalText::new(Form::Form2A, "uno dos\ntres");
        assert_eq!(text.word_count(), 3);
        assert_eq!(text.form(), Form::Form2A);
        assert_eq!(text.tokens()[2], "tres");
    }
}
