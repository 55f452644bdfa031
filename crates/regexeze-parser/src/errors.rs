//! Syntax error objects.
//!
//! One variant per error cause. Every variant owns a snapshot of the input
//! and the byte offset of the offending token (`None` when the input ended
//! early), from which `Display` renders a caret diagnostic pointing at the
//! token in the original source.

use std::ops::Range;

use thiserror::Error;

/// Error raised when the state machine enters a terminal error state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("Each expression must start with expr\n{}", caret(.input, .offset))]
    NewExpression { input: String, offset: Option<usize> },

    #[error(
        "Each nested expression must start with expr\nIf you were trying to use an open square bracket ([) as an expression, remember to use a valid modifier and end with a semicolon.\n{}",
        caret(.input, .offset)
    )]
    NewNestedExpression { input: String, offset: Option<usize> },

    #[error(
        "Each nested expression must end with a closed square bracket\nIf you were trying to use an open square bracket ([) as an expression, remember to use a valid modifier and end with a semicolon.\n{}",
        caret(.input, .offset)
    )]
    UnclosedBracket { input: String, offset: Option<usize> },

    #[error(
        "Each expression must end in a semi-colon.\nFor empty input, remember to use quotes.\n{}",
        caret(.input, .offset)
    )]
    IncompleteExpression { input: String, offset: Option<usize> },

    #[error(
        "Keywords \"of\" and \"except\" must be followed by the set of characters to be included in the class.\nEmpty string can not be put into character class.\n{}",
        caret(.input, .offset)
    )]
    IncompleteClass { input: String, offset: Option<usize> },

    #[error(
        "When specifying a range of characters in a character class, you must have both a \"from\" value and a \"to\" value.\nFor example: expr: any_char from \"a\" to \"z\";\n{}",
        caret(.input, .offset)
    )]
    IncompleteClassRange { input: String, offset: Option<usize> },

    #[error(
        "Class range must be between single characters, and they must be in order.\n{}",
        caret(.input, .offset)
    )]
    InvalidClassRange { input: String, offset: Option<usize> },

    #[error(
        "Invalid syntax after or.\nTo make an empty or alternative, remember to put the empty string in quotes and still end with a semicolon.\n{}",
        caret(.input, .offset)
    )]
    IncompleteOr { input: String, offset: Option<usize> },

    #[error(
        "Expressions involving the keyword or cannot follow or be followed by other expressions.\nTo include or statements in larger expressions, nest them.\nFor example: expr: [ expr: \"a\" or \"b\"; ]; expr: \"c\";\n{}",
        caret(.input, .offset)
    )]
    MultipleOr { input: String, offset: Option<usize> },

    #[error(
        "The keywords expr and name must be followed by a colon\n{}",
        caret(.input, .offset)
    )]
    Colon { input: String, offset: Option<usize> },

    #[error(
        "The keyword set_flags must be followed by a colon\n{}",
        caret(.input, .offset)
    )]
    FlagsColon { input: String, offset: Option<usize> },

    #[error(
        "Invalid modifier for an expression.\nPossible Causes:\n- A missing semi-colon at the end of an expression\n- A misplaced \"expr:\" after the keyword \"or\"\n- An empty expression or expression with a special character that is not put in quotes.\n- Incorrect usage of or_of, or_from, and or_except: or_of and or_from are valid after both \"of\" and \"from...to\" expressions, but or_except can only follow \"except\" expressions\n- Modifying an unmodifiable expression, such as start_of_string or end_of_string\n{}",
        caret(.input, .offset)
    )]
    InvalidModifier { input: String, offset: Option<usize> },

    #[error(
        "Invalid number of repetitions specified after key word \"for\"\nValid repetitions include integers or keywords such as zero_or_more or one_or_more\n{}",
        caret(.input, .offset)
    )]
    InvalidRepetitions { input: String, offset: Option<usize> },

    #[error(
        "Invalid number of repetitions specified after key word \"up_to\"\nMust be followed by an integer greater than or equal to the first number, or else the infinity keyword.\n{}",
        caret(.input, .offset)
    )]
    InvalidRepetitionRange { input: String, offset: Option<usize> },

    #[error(
        "Invalid flag\nValid flags are ignore_case, locale, multiline, any_char_all, and unicode, separated by commas.\n{}",
        caret(.input, .offset)
    )]
    InvalidFlag { input: String, offset: Option<usize> },

    #[error(
        "Invalid group name\nGroup names must be identifiers that do not collide with keywords or previously defined names.\n{}",
        caret(.input, .offset)
    )]
    InvalidGroupName { input: String, offset: Option<usize> },
}

impl SyntaxError {
    /// Byte offset of the offending token, when one was located.
    pub fn offset(&self) -> Option<usize> {
        match self {
            SyntaxError::NewExpression { offset, .. }
            | SyntaxError::NewNestedExpression { offset, .. }
            | SyntaxError::UnclosedBracket { offset, .. }
            | SyntaxError::IncompleteExpression { offset, .. }
            | SyntaxError::IncompleteClass { offset, .. }
            | SyntaxError::IncompleteClassRange { offset, .. }
            | SyntaxError::InvalidClassRange { offset, .. }
            | SyntaxError::IncompleteOr { offset, .. }
            | SyntaxError::MultipleOr { offset, .. }
            | SyntaxError::Colon { offset, .. }
            | SyntaxError::FlagsColon { offset, .. }
            | SyntaxError::InvalidModifier { offset, .. }
            | SyntaxError::InvalidRepetitions { offset, .. }
            | SyntaxError::InvalidRepetitionRange { offset, .. }
            | SyntaxError::InvalidFlag { offset, .. }
            | SyntaxError::InvalidGroupName { offset, .. } => *offset,
        }
    }
}

/// The cause tag carried by a terminal error state. Converted into a full
/// [`SyntaxError`] at the boundary that owns the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorKind {
    NewExpression,
    NewNestedExpression,
    UnclosedBracket,
    IncompleteExpression,
    IncompleteClass,
    IncompleteClassRange,
    InvalidClassRange,
    IncompleteOr,
    MultipleOr,
    Colon,
    FlagsColon,
    InvalidModifier,
    InvalidRepetitions,
    InvalidRepetitionRange,
    InvalidFlag,
    InvalidGroupName,
}

/// An error on its way up through nested machines: kind plus the absolute
/// span of the offending token. The input snapshot is attached once, at the
/// top-level translator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawSyntaxError {
    pub kind: ErrorKind,
    pub span: Option<Range<usize>>,
}

impl RawSyntaxError {
    pub fn with_input(self, input: &str) -> SyntaxError {
        let input = input.to_string();
        let offset = self.span.map(|s| s.start);
        match self.kind {
            ErrorKind::NewExpression => SyntaxError::NewExpression { input, offset },
            ErrorKind::NewNestedExpression => SyntaxError::NewNestedExpression { input, offset },
            ErrorKind::UnclosedBracket => SyntaxError::UnclosedBracket { input, offset },
            ErrorKind::IncompleteExpression => SyntaxError::IncompleteExpression { input, offset },
            ErrorKind::IncompleteClass => SyntaxError::IncompleteClass { input, offset },
            ErrorKind::IncompleteClassRange => SyntaxError::IncompleteClassRange { input, offset },
            ErrorKind::InvalidClassRange => SyntaxError::InvalidClassRange { input, offset },
            ErrorKind::IncompleteOr => SyntaxError::IncompleteOr { input, offset },
            ErrorKind::MultipleOr => SyntaxError::MultipleOr { input, offset },
            ErrorKind::Colon => SyntaxError::Colon { input, offset },
            ErrorKind::FlagsColon => SyntaxError::FlagsColon { input, offset },
            ErrorKind::InvalidModifier => SyntaxError::InvalidModifier { input, offset },
            ErrorKind::InvalidRepetitions => SyntaxError::InvalidRepetitions { input, offset },
            ErrorKind::InvalidRepetitionRange => {
                SyntaxError::InvalidRepetitionRange { input, offset }
            }
            ErrorKind::InvalidFlag => SyntaxError::InvalidFlag { input, offset },
            ErrorKind::InvalidGroupName => SyntaxError::InvalidGroupName { input, offset },
        }
    }
}

/// Render the source line containing `offset` with a `^` under the
/// offending column. With no offset (input ended early) the caret lands
/// just past the end of the input.
fn caret(input: &str, offset: &Option<usize>) -> String {
    let at = offset.unwrap_or(input.len()).min(input.len());
    let line_start = input[..at].rfind('\n').map_or(0, |i| i + 1);
    let line_end = input[at..]
        .find('\n')
        .map_or(input.len(), |i| at + i);
    let line = &input[line_start..line_end];
    let column = input[line_start..at].chars().count();
    format!("{}\n{}^", line, " ".repeat(column))
}
