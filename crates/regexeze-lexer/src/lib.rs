//! Regexeze tokenizer.
//!
//! Shell-style lexing: unquoted runs are split on whitespace and on the
//! punctuation characters `;`, `:`, `,`, `[`, `]`; quoted spans become a
//! single token with the quotes stripped and backslash escapes applied.
//! The grammar keys its transitions on token *text*, so the typed raw
//! tokens produced by logos decay into plain [`Token`] values before they
//! reach the parser.

use logos::Logos;

/// Raw token classes recognized by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    // === Punctuation (terminates the preceding run) ===
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // === Quoted literals ===
    // The span keeps the quotes; the payload drops them and cooks escapes.
    #[regex(r"'(?:[^'\\]|\\(?s:.))*'", |lex| unescape(inner(lex.slice())))]
    SingleQuoted(String),
    #[regex(r#""(?:[^"\\]|\\(?s:.))*""#, |lex| unescape(inner(lex.slice())))]
    DoubleQuoted(String),

    // === Bare words ===
    #[regex(r#"[^ \t\r\n;:,\[\]'"]+"#, |lex| lex.slice().to_string())]
    Word(String),
}

/// A single token: its literal text and the byte span it came from.
///
/// For quoted literals the text is the cooked content (quotes stripped,
/// escapes applied) while the span still covers the quotes, so diagnostics
/// point at what the user actually typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub span: std::ops::Range<usize>,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Lexer error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("Unclosed quote at position {0}")]
    UnterminatedQuote(usize),
}

/// Split a source chunk into tokens.
///
/// Never emits an end-of-input sentinel; the state machine driver supplies
/// that itself. An empty quoted literal (`""` or `''`) produces an
/// empty-string token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let text = match result {
            Ok(RawToken::Semi) => ";".to_string(),
            Ok(RawToken::Colon) => ":".to_string(),
            Ok(RawToken::Comma) => ",".to_string(),
            Ok(RawToken::LBracket) => "[".to_string(),
            Ok(RawToken::RBracket) => "]".to_string(),
            Ok(RawToken::SingleQuoted(s))
            | Ok(RawToken::DoubleQuoted(s))
            | Ok(RawToken::Word(s)) => s,
            // The only way to fail is a quote that never closes: every
            // other byte is covered by the word class.
            Err(()) => return Err(LexError::UnterminatedQuote(lexer.span().start)),
        };
        tokens.push(Token {
            text,
            span: lexer.span(),
        });
    }

    Ok(tokens)
}

fn inner(slice: &str) -> &str {
    &slice[1..slice.len() - 1]
}

/// Cook backslash escapes inside a quoted literal. Unknown escapes stand
/// for the escaped character itself; the regex-level escaping of the result
/// happens later, at emission.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('v') => out.push('\u{000B}'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            // Unreachable given the quote patterns pair every backslash,
            // but a lone trailing backslash should survive round-tripping.
            None => out.push('\\'),
        }
    }
    out
}
