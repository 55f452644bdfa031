//! Regexeze public interface.
//!
//! The counterpart of a standard regex module, speaking Regexeze on the
//! way in: [`translate`] turns Regexeze source into regular-expression
//! syntax, [`compile`] wraps it in a [`Pattern`], and
//! [`Pattern::search`] / [`Pattern::match_start`] delegate the actual
//! matching to the host engine ([`fancy_regex`], which accepts the emitted
//! `(?P<name>...)` / `(?P=name)` dialect).
//!
//! Patterns come from three mutually exclusive sources: an in-memory
//! string, a file (`*_file`), or any buffered reader such as stdin
//! (`*_reader`). File and reader sources are consumed line by line and
//! streamed into the translator, so parser state crosses line boundaries
//! but tokens do not.
//!
//! ```
//! let pattern = regexeze::compile("expr: 'ab' for one_or_more;").unwrap();
//! assert_eq!(pattern.as_str(), "(ab)+");
//! assert!(pattern.match_start("ababab").unwrap().is_some());
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

use thiserror::Error;

pub use fancy_regex::{Captures, Match};
pub use regexeze_lexer::LexError;
pub use regexeze_parser::{SyntaxError, TranslateError, Translator};

/// Anything that can go wrong between Regexeze source and a match result.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(LexError),
    #[error(transparent)]
    Syntax(SyntaxError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Regex(#[from] fancy_regex::Error),
}

impl From<TranslateError> for Error {
    fn from(err: TranslateError) -> Self {
        match err {
            TranslateError::Lex(err) => Error::Lex(err),
            TranslateError::Syntax(err) => Error::Syntax(err),
        }
    }
}

/// A compiled Regexeze pattern: the translated regex, plus the host-engine
/// compilation of it, built on first use and cached.
///
/// Translation never touches the host engine, so a `Pattern` always carries
/// a translated regex even when the host cannot execute it (for example the
/// `locale` flag); in that case the host error surfaces from the first
/// match operation.
#[derive(Debug)]
pub struct Pattern {
    translated: String,
    host: OnceLock<fancy_regex::Regex>,
}

impl Pattern {
    fn new(translated: String) -> Self {
        Pattern {
            translated,
            host: OnceLock::new(),
        }
    }

    /// The translated regular expression.
    pub fn as_str(&self) -> &str {
        &self.translated
    }

    fn host(&self) -> Result<&fancy_regex::Regex, Error> {
        if let Some(regex) = self.host.get() {
            return Ok(regex);
        }
        let regex = fancy_regex::Regex::new(&self.translated)?;
        Ok(self.host.get_or_init(|| regex))
    }

    /// First match of the pattern anywhere in `text`, with capture groups.
    pub fn search<'t>(&self, text: &'t str) -> Result<Option<Captures<'t>>, Error> {
        Ok(self.host()?.captures(text)?)
    }

    /// Match anchored at the start of `text` (the classic `match`
    /// operation; `match` itself is spoken for in Rust).
    pub fn match_start<'t>(&self, text: &'t str) -> Result<Option<Captures<'t>>, Error> {
        let captures = self.host()?.captures(text)?;
        Ok(captures.filter(|caps| caps.get(0).is_some_and(|m| m.start() == 0)))
    }

    /// Whether the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> Result<bool, Error> {
        Ok(self.host()?.is_match(text)?)
    }

    /// Capture group names in group order; `None` for unnamed groups
    /// (group 0 included).
    pub fn capture_names(&self) -> Result<Vec<Option<String>>, Error> {
        Ok(self
            .host()?
            .capture_names()
            .map(|name| name.map(str::to_string))
            .collect())
    }
}

/// Translate a Regexeze pattern string. Empty input yields an empty regex.
pub fn translate(pattern: &str) -> Result<String, Error> {
    Ok(regexeze_parser::translate(pattern)?)
}

/// Translate Regexeze source read from a file.
pub fn translate_file(path: impl AsRef<Path>) -> Result<String, Error> {
    translate_reader(BufReader::new(File::open(path)?))
}

/// Translate Regexeze source streamed from a buffered reader (stdin, a
/// socket, a decompressor, ...).
pub fn translate_reader(mut reader: impl BufRead) -> Result<String, Error> {
    let mut translator = Translator::new();
    let mut line = String::new();
    while reader.read_line(&mut line)? > 0 {
        translator.feed(&line)?;
        line.clear();
    }
    Ok(translator.finish()?)
}

/// Compile a Regexeze pattern string into a [`Pattern`].
pub fn compile(pattern: &str) -> Result<Pattern, Error> {
    Ok(Pattern::new(translate(pattern)?))
}

/// Compile Regexeze source read from a file.
pub fn compile_file(path: impl AsRef<Path>) -> Result<Pattern, Error> {
    Ok(Pattern::new(translate_file(path)?))
}

/// Compile Regexeze source streamed from a buffered reader.
pub fn compile_reader(reader: impl BufRead) -> Result<Pattern, Error> {
    Ok(Pattern::new(translate_reader(reader)?))
}

/// Compile `pattern` and search `text` for its first occurrence.
pub fn search<'t>(pattern: &str, text: &'t str) -> Result<Option<Captures<'t>>, Error> {
    compile(pattern)?.search(text)
}

/// Compile `pattern` and match it against the start of `text`.
pub fn match_start<'t>(pattern: &str, text: &'t str) -> Result<Option<Captures<'t>>, Error> {
    compile(pattern)?.match_start(text)
}
