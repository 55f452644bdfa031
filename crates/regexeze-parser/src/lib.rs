//! Regexeze translator.
//!
//! Turns the keyword-oriented Regexeze surface language into standard
//! regular-expression syntax (`(?P<name>...)` named groups, `(?P=name)`
//! back-references, `(?iLmsu)` flag groups, bracket classes, brace
//! quantifiers). The translation is driven token by token through a
//! deterministic state machine; the grammar lives in the machine module.
//!
//! ```
//! let regex = regexeze_parser::translate("expr: any_char for zero_or_more;").unwrap();
//! assert_eq!(regex, "(.)*");
//! ```

mod errors;
mod grammar;
mod machine;

use thiserror::Error;

pub use errors::SyntaxError;
pub use regexeze_lexer::{LexError, Token};

use machine::Machine;

/// Any failure while translating: the source either did not tokenize or
/// did not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Incremental translation driver.
///
/// Feed the source in chunks (for file and stdin sources, one line at a
/// time); token boundaries never cross a feed, but parser state does, so a
/// statement may span as many chunks as it likes. [`Translator::finish`]
/// issues the end-of-input sentinel and yields the translated pattern.
#[derive(Debug, Default)]
pub struct Translator {
    machine: Machine,
    input: String,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The source consumed so far.
    pub fn source(&self) -> &str {
        &self.input
    }

    /// Tokenize one chunk of source and drive it through the machine.
    pub fn feed(&mut self, chunk: &str) -> Result<(), TranslateError> {
        let base = self.input.len();
        self.input.push_str(chunk);
        let tokens = regexeze_lexer::tokenize(chunk).map_err(|err| match err {
            LexError::UnterminatedQuote(offset) => LexError::UnterminatedQuote(base + offset),
        })?;
        for token in tokens {
            let span = base + token.span.start..base + token.span.end;
            self.machine
                .process(&token.text, span)
                .map_err(|err| err.with_input(&self.input))?;
        }
        Ok(())
    }

    /// End the input and return the translated pattern.
    pub fn finish(mut self) -> Result<String, TranslateError> {
        self.machine
            .finish()
            .map_err(|err| err.with_input(&self.input))
            .map_err(TranslateError::from)
    }
}

/// Translate a complete Regexeze source string. Empty input translates to
/// the empty pattern.
pub fn translate(source: &str) -> Result<String, TranslateError> {
    let mut translator = Translator::new();
    translator.feed(source)?;
    translator.finish()
}
