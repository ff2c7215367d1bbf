//! Line tokenizer for the command protocol.
//!
//! Whitespace-separated tokens, with double quotes grouping a run of
//! characters (spaces included) into a single token. Quotes are all or
//! nothing: a quote may only open a token at a word boundary and the
//! closing quote must be followed by whitespace or end of line.

use std::fmt;

/// Why a line could not be tokenized. The line is dropped whole; no
/// prefix of a malformed line is ever acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizeError {
    /// A quote appeared inside a bare token.
    MisplacedQuote,
    /// A closing quote was followed by a non-whitespace character.
    QuoteNotFollowedByWhitespace,
    /// The line ended inside a quoted token.
    UnterminatedQuote,
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizeError::MisplacedQuote => {
                write!(f, "quote in the middle of a token")
            }
            TokenizeError::QuoteNotFollowedByWhitespace => {
                write!(f, "closing quote not followed by whitespace")
            }
            TokenizeError::UnterminatedQuote => write!(f, "unterminated quote"),
        }
    }
}

impl std::error::Error for TokenizeError {}

enum State {
    /// Between tokens.
    Start,
    /// Inside a bare token starting at the byte offset.
    Bare(usize),
    /// Inside a quoted token; the offset is the first content byte.
    Quoted(usize),
    /// Just past a closing quote; only whitespace may follow.
    AfterQuote,
}

/// Split `line` into tokens, borrowing from it.
///
/// Quoted tokens are returned without their quotes; an empty quoted token
/// (`""`) is a valid, empty token.
pub fn tokenize(line: &str) -> Result<Vec<&str>, TokenizeError> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut state = State::Start;

    for (i, &b) in bytes.iter().enumerate() {
        state = match state {
            State::Start => match b {
                b'"' => State::Quoted(i + 1),
                b if b.is_ascii_whitespace() => State::Start,
                _ => State::Bare(i),
            },
            State::Bare(start) => match b {
                b'"' => return Err(TokenizeError::MisplacedQuote),
                b if b.is_ascii_whitespace() => {
                    tokens.push(&line[start..i]);
                    State::Start
                }
                _ => State::Bare(start),
            },
            State::Quoted(start) => match b {
                b'"' => {
                    tokens.push(&line[start..i]);
                    State::AfterQuote
                }
                _ => State::Quoted(start),
            },
            State::AfterQuote => {
                if b.is_ascii_whitespace() {
                    State::Start
                } else {
                    return Err(TokenizeError::QuoteNotFollowedByWhitespace);
                }
            }
        };
    }

    match state {
        State::Start | State::AfterQuote => {}
        State::Bare(start) => tokens.push(&line[start..]),
        State::Quoted(_) => return Err(TokenizeError::UnterminatedQuote),
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_splits_on_whitespace() {
        assert_eq!(tokenize("go depth 5").unwrap(), vec!["go", "depth", "5"]);
        assert_eq!(tokenize("  a \t b  ").unwrap(), vec!["a", "b"]);
        assert_eq!(tokenize("").unwrap(), Vec::<&str>::new());
        assert_eq!(tokenize("   ").unwrap(), Vec::<&str>::new());
    }

    #[test]
    fn test_quotes_group_spaces_into_one_token() {
        assert_eq!(
            tokenize("setoption name \"soft time pct\" value 60").unwrap(),
            vec!["setoption", "name", "soft time pct", "value", "60"]
        );
    }

    #[test]
    fn test_quoted_token_at_end_of_line() {
        assert_eq!(tokenize("a \"b c\"").unwrap(), vec!["a", "b c"]);
    }

    #[test]
    fn test_empty_quoted_token_is_valid() {
        assert_eq!(tokenize("a \"\" b").unwrap(), vec!["a", "", "b"]);
    }

    #[test]
    fn test_quote_inside_bare_token_is_rejected() {
        assert_eq!(tokenize("a\"bc\""), Err(TokenizeError::MisplacedQuote));
        assert_eq!(tokenize("ab\"").unwrap_err(), TokenizeError::MisplacedQuote);
    }

    #[test]
    fn test_closing_quote_must_end_the_token() {
        assert_eq!(
            tokenize("\"ab\"c"),
            Err(TokenizeError::QuoteNotFollowedByWhitespace)
        );
    }

    #[test]
    fn test_unterminated_quote_is_rejected() {
        assert_eq!(tokenize("a \"bc"), Err(TokenizeError::UnterminatedQuote));
        assert_eq!(tokenize("\""), Err(TokenizeError::UnterminatedQuote));
    }

    proptest! {
        // Any word list survives a quote-or-not round trip.
        #[test]
        fn test_round_trips_arbitrary_words(
            words in proptest::collection::vec(
                ("[a-zA-Z0-9_.-]{1,12}", any::<bool>()),
                0..8,
            )
        ) {
            let line = words
                .iter()
                .map(|(w, quoted)| {
                    if *quoted {
                        format!("\"{w}\"")
                    } else {
                        w.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");

            let tokens = tokenize(&line).unwrap();
            let expected: Vec<&str> = words.iter().map(|(w, _)| w.as_str()).collect();
            prop_assert_eq!(tokens, expected);
        }
    }
}
