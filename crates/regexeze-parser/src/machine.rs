//! The translation state machine.
//!
//! One machine per nesting level: the grammar is a deterministic
//! token-driven automaton whose transitions are a pure match over
//! `(state, token)` and whose entry actions mutate the machine context
//! (fragment, modifier, output, namespace). Bracketed sub-expressions
//! recurse through an owned child machine that receives every forwarded
//! token; its namespace seeds from the parent at creation and merges back
//! upward when the bracket closes.

use std::collections::HashSet;
use std::ops::Range;

use tracing::trace;

use crate::errors::{ErrorKind, RawSyntaxError};
use crate::grammar::{
    anchor_symbol, escape_literal, flag_symbol, is_reserved_word, is_valid_group_name, kw,
    only_char, parse_count, special_symbol,
};

const OPEN_GROUP: &str = "(";

/// State tags. Nested depth and error cause ride along as payloads; every
/// other piece of mutable parse state lives on the [`Machine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Start of input or just after a `;`.
    NewExpression,
    /// Terminal success.
    EndOfExpressions,
    /// After `expr`, expecting `:`.
    CheckColon,
    /// After `set_flags`, expecting `:`.
    CheckFlagsColon,
    /// Expecting a flag keyword.
    SetFlags,
    /// A flag keyword was consumed.
    Flag,
    /// After `expr:`, dispatching on the expression value.
    StartExpression,
    /// After `or`, behaves like `StartExpression` for the next alternative.
    Or,
    PlainText,
    AnyChar,
    SpecialChar,
    /// `start_of_string` / `end_of_string`; accepts no modifier.
    Anchor,
    /// Back-reference to a bound group name.
    GroupRef,
    /// After `[`, which may open a nested program or stand for itself.
    NewNestedExpression,
    /// After `name`, expecting `:`.
    CheckGroupName,
    /// After `name:`, expecting the identifier.
    GroupName,
    /// Identifier consumed and bound, expecting `;`.
    GroupNameEnd,
    /// After `name: ident;`, expecting the nested body.
    NamedNestedExpression,
    /// Forwarding tokens to the child machine; payload is bracket depth.
    Nested(u32),
    /// Matching `]` consumed; child output inlined into the fragment.
    EndNestedExpression,
    /// After `for`, expecting a repetition count or keyword.
    CheckNumberOfTimes,
    ZeroOrMore,
    OneOrMore,
    ZeroOrOne,
    MRepetitions,
    /// After `up_to`, expecting the upper bound.
    UpTo,
    MUpToN,
    MUpToInfinity,
    SetNotGreedy,
    KeepGreedy,
    /// After `of`, expecting class members.
    OpenClass,
    /// Class members consumed; the staged `]` closes the fragment.
    InClass,
    OrOf,
    /// After `from`, expecting the range start.
    FromRange,
    /// After `to`, expecting the range end.
    ToRange,
    OpenClassRange,
    OrFrom,
    /// After `except`, expecting complement class members.
    ExceptClass,
    InComplementClass,
    OrExcept,
    /// Terminal error state; entering it raises the carried cause.
    Fail(ErrorKind),
}

/// The mutable assembly workspace for one nesting level.
#[derive(Debug)]
pub(crate) struct Machine {
    state: State,
    /// Text of the token being consumed (empty for the sentinel).
    token: String,
    /// Absolute span of the token being consumed.
    span: Option<Range<usize>>,
    /// Partial regex for the expression under construction. Always starts
    /// with the open marker; its closing parenthesis is emitted on flush.
    fragment: String,
    /// Quantifier suffix being built.
    modifier: String,
    /// Intermediate `m[,n]` text for brace quantifiers.
    modifier_fragment: String,
    /// Completed expressions, in source order.
    output: String,
    /// `(` or, once a name is bound for the current expression, `(?P<name>`.
    open_group: String,
    child: Option<Box<Machine>>,
    after_or: bool,
    /// Completed expressions at this level; flag blocks subtract themselves.
    n_expressions: i32,
    /// Lower endpoint of a pending `from ... to` class range.
    start_range: Option<char>,
    /// Lower bound of a pending `for m up_to n` quantifier.
    lower_bound: u64,
    /// Group names bound so far, seeded from the parent machine.
    namespace: HashSet<String>,
}

impl Default for Machine {
    fn default() -> Self {
        Self::with_namespace(HashSet::new())
    }
}

impl Machine {
    fn with_namespace(namespace: HashSet<String>) -> Self {
        Machine {
            state: State::NewExpression,
            token: String::new(),
            span: None,
            fragment: String::new(),
            modifier: String::new(),
            modifier_fragment: String::new(),
            output: String::new(),
            open_group: OPEN_GROUP.to_string(),
            child: None,
            after_or: false,
            n_expressions: 0,
            start_range: None,
            lower_bound: 0,
            namespace,
        }
    }

    /// Consume one token. `span` is absolute within the original source.
    pub fn process(&mut self, text: &str, span: Range<usize>) -> Result<(), RawSyntaxError> {
        self.step(Some(text), Some(span))
    }

    /// Issue the end-of-input sentinel and take the translated pattern.
    pub fn finish(&mut self) -> Result<String, RawSyntaxError> {
        self.step(None, None)?;
        Ok(std::mem::take(&mut self.output))
    }

    fn step(&mut self, text: Option<&str>, span: Option<Range<usize>>) -> Result<(), RawSyntaxError> {
        let next = self.transition(text);
        trace!(token = ?text, state = ?self.state, next = ?next);
        self.token = text.unwrap_or_default().to_string();
        self.span = span;
        self.state = next;
        self.enter()
    }

    /// The transition table: `(state, token) -> state`. `None` is the
    /// end-of-input sentinel.
    fn transition(&self, token: Option<&str>) -> State {
        use ErrorKind as E;
        use State::*;

        match (self.state, token) {
            // Top level: a statement starts with expr or set_flags.
            (NewExpression, None) => EndOfExpressions,
            (NewExpression, Some(kw::SET_FLAGS)) => CheckFlagsColon,
            (NewExpression, Some(kw::EXPR)) if self.after_or => Fail(E::MultipleOr),
            (NewExpression, Some(kw::EXPR)) => CheckColon,
            (NewExpression, Some(_)) => Fail(E::NewExpression),

            (EndOfExpressions, _) => EndOfExpressions,

            (CheckColon, Some(":")) => StartExpression,
            (CheckColon, _) => Fail(E::Colon),

            // Flag blocks.
            (CheckFlagsColon, Some(":")) => SetFlags,
            (CheckFlagsColon, _) => Fail(E::FlagsColon),
            (SetFlags, Some(t)) if flag_symbol(t).is_some() => Flag,
            (SetFlags, _) => Fail(E::InvalidFlag),
            (Flag, Some(",")) => SetFlags,
            (Flag, Some(";")) => NewExpression,
            (Flag, None) => Fail(E::IncompleteExpression),
            (Flag, Some(_)) => Fail(E::InvalidFlag),

            // Expression value dispatch.
            (StartExpression, None) => Fail(E::IncompleteExpression),
            (Or, None) => Fail(E::IncompleteOr),
            (StartExpression | Or, Some(t)) => match t {
                kw::ANY_CHAR => AnyChar,
                "[" => NewNestedExpression,
                _ if self.namespace.contains(t) => GroupRef,
                _ if anchor_symbol(t).is_some() => Anchor,
                _ if special_symbol(t).is_some() => SpecialChar,
                _ => PlainText,
            },

            // Potentially-final values.
            (AnyChar, Some(kw::OF)) => OpenClass,
            (AnyChar, Some(kw::FROM)) => FromRange,
            (AnyChar, Some(kw::EXCEPT)) => ExceptClass,
            (AnyChar, t) => self.modifiable_final(t),
            (PlainText | SpecialChar | GroupRef | EndNestedExpression, t) => {
                self.modifiable_final(t)
            }
            (Anchor, t) => self.potentially_final(t),

            // `[` either opens a nested program, stands for itself, or
            // introduces a group name.
            (NewNestedExpression, Some(kw::EXPR)) => Nested(0),
            (NewNestedExpression, Some("]")) => EndNestedExpression,
            (NewNestedExpression, Some(kw::NAME)) => CheckGroupName,
            (NewNestedExpression, Some(";")) => NewExpression,
            (NewNestedExpression, Some(kw::FOR)) => CheckNumberOfTimes,
            (NewNestedExpression, None) => Fail(E::UnclosedBracket),
            (NewNestedExpression, Some(_)) => Fail(E::NewNestedExpression),

            // Group naming: `name: ident;` binds the enclosing group.
            (CheckGroupName, Some(":")) => GroupName,
            (CheckGroupName, _) => Fail(E::Colon),
            (GroupName, None) => Fail(E::IncompleteExpression),
            (GroupName, Some(t))
                if self.namespace.contains(t) || is_reserved_word(t) || !is_valid_group_name(t) =>
            {
                Fail(E::InvalidGroupName)
            }
            (GroupName, Some(_)) => GroupNameEnd,
            (GroupNameEnd, Some(";")) => NamedNestedExpression,
            (GroupNameEnd, _) => Fail(E::IncompleteExpression),
            (NamedNestedExpression, Some(kw::EXPR)) => Nested(0),
            (NamedNestedExpression, Some("]")) => EndNestedExpression,
            (NamedNestedExpression, None) => Fail(E::UnclosedBracket),
            (NamedNestedExpression, Some(_)) => Fail(E::NewNestedExpression),

            // Forwarding into the nested program, tracking bracket depth.
            (Nested(_), None) => Fail(E::UnclosedBracket),
            (Nested(0), Some("]")) => EndNestedExpression,
            (Nested(d), Some("]")) => Nested(d - 1),
            (Nested(d), Some("[")) => Nested(d + 1),
            (Nested(d), Some(_)) => Nested(d),

            // Quantifiers.
            (CheckNumberOfTimes, Some(kw::ZERO_OR_MORE)) => ZeroOrMore,
            (CheckNumberOfTimes, Some(kw::ONE_OR_MORE)) => OneOrMore,
            (CheckNumberOfTimes, Some(kw::ZERO_OR_ONE)) => ZeroOrOne,
            (CheckNumberOfTimes, Some(t)) if parse_count(t).is_some() => MRepetitions,
            (CheckNumberOfTimes, _) => Fail(E::InvalidRepetitions),
            (MRepetitions, Some(kw::UP_TO)) => UpTo,
            (
                ZeroOrMore | OneOrMore | ZeroOrOne | MRepetitions | MUpToN | MUpToInfinity,
                Some(kw::NOT_GREEDY),
            ) => SetNotGreedy,
            (
                ZeroOrMore | OneOrMore | ZeroOrOne | MRepetitions | MUpToN | MUpToInfinity,
                Some(kw::GREEDY),
            ) => KeepGreedy,
            (
                ZeroOrMore | OneOrMore | ZeroOrOne | MRepetitions | MUpToN | MUpToInfinity
                | SetNotGreedy | KeepGreedy,
                t,
            ) => self.potentially_final(t),
            (UpTo, Some(kw::INFINITY)) => MUpToInfinity,
            (UpTo, Some(t)) if parse_count(t).is_some_and(|n| n >= self.lower_bound) => MUpToN,
            (UpTo, _) => Fail(E::InvalidRepetitionRange),

            // Character classes. An empty token cannot become a member.
            (OpenClass | OrOf, None) => Fail(E::IncompleteClass),
            (OpenClass | OrOf, Some("")) => Fail(E::IncompleteClass),
            (OpenClass | OrOf, Some(_)) => InClass,
            (ExceptClass | OrExcept, None) => Fail(E::IncompleteClass),
            (ExceptClass | OrExcept, Some("")) => Fail(E::IncompleteClass),
            (ExceptClass | OrExcept, Some(_)) => InComplementClass,
            (InClass, Some(kw::OR_OF)) => OrOf,
            (InClass, Some(kw::OR_FROM)) => OrFrom,
            (InClass, t) => self.modifiable_final(t),
            (InComplementClass, Some(kw::OR_EXCEPT)) => OrExcept,
            (InComplementClass, t) => self.modifiable_final(t),

            // Class ranges.
            (FromRange, None) => Fail(E::IncompleteClassRange),
            (FromRange, Some(t)) if only_char(t).is_some() => OpenClassRange,
            (FromRange, Some(_)) => Fail(E::InvalidClassRange),
            (OrFrom, None) => Fail(E::IncompleteClass),
            (OrFrom, Some(t)) if only_char(t).is_some() => OpenClassRange,
            (OrFrom, Some(_)) => Fail(E::InvalidClassRange),
            // Anything but `to` after a range start means the counterpart
            // is missing, not that an endpoint is malformed.
            (OpenClassRange, Some(kw::TO)) => ToRange,
            (OpenClassRange, _) => Fail(E::IncompleteClassRange),
            (ToRange, None) => Fail(E::IncompleteClassRange),
            (ToRange, Some(t))
                if only_char(t).is_some_and(|c| Some(c) >= self.start_range) =>
            {
                InClass
            }
            (ToRange, Some(_)) => Fail(E::InvalidClassRange),

            // Terminal; never stepped from.
            (Fail(kind), _) => Fail(kind),
        }
    }

    /// Transitions shared by every state that may end an expression:
    /// `;` flushes, end of input is premature, `or` opens an alternative
    /// unless this level already completed an expression.
    fn potentially_final(&self, token: Option<&str>) -> State {
        use State::*;
        match token {
            None => Fail(ErrorKind::IncompleteExpression),
            Some(";") => NewExpression,
            Some(kw::OR) if self.n_expressions > 0 => Fail(ErrorKind::MultipleOr),
            Some(kw::OR) => Or,
            Some(_) => Fail(ErrorKind::InvalidModifier),
        }
    }

    /// [`Self::potentially_final`] plus the `for` quantifier introducer.
    fn modifiable_final(&self, token: Option<&str>) -> State {
        match token {
            Some(kw::FOR) => State::CheckNumberOfTimes,
            other => self.potentially_final(other),
        }
    }

    /// Run the entry action of the state just assigned.
    fn enter(&mut self) -> Result<(), RawSyntaxError> {
        use State::*;
        match self.state {
            NewExpression => {
                self.n_expressions += 1;
                self.flush_expression();
            }
            Or => {
                self.flush_expression();
                self.output.push('|');
                self.after_or = true;
            }
            CheckFlagsColon => {
                // Flag blocks do not count against the alternation rules;
                // the closing `;` re-increments.
                self.n_expressions -= 1;
                self.fragment.push_str(OPEN_GROUP);
                self.fragment.push('?');
            }
            Flag => {
                if let Some(code) = flag_symbol(&self.token) {
                    self.fragment.push(code);
                }
            }
            PlainText => {
                self.fragment = format!("{}{}", self.open_group, escape_literal(&self.token));
            }
            AnyChar => {
                self.fragment = format!("{}.", self.open_group);
            }
            SpecialChar => {
                if let Some(symbol) = special_symbol(&self.token) {
                    self.fragment = format!("{}{}", self.open_group, symbol);
                }
            }
            Anchor => {
                if let Some(symbol) = anchor_symbol(&self.token) {
                    self.fragment = format!("{}{}", self.open_group, symbol);
                }
            }
            GroupRef => {
                // Back-references carry their own parentheses; the flush
                // supplies only the closing one.
                self.fragment = format!("(?P={}", self.token);
            }
            NewNestedExpression => {
                // Until an `expr` or `name` follows, the bracket is an
                // ordinary literal.
                self.fragment = format!("{}{}", self.open_group, escape_literal("["));
            }
            GroupNameEnd => {
                self.open_group = format!("(?P<{}>", self.token);
                self.namespace.insert(self.token.clone());
            }
            Nested(_) => {
                let token = std::mem::take(&mut self.token);
                let span = self.span.clone();
                let child = self.child.get_or_insert_with(|| {
                    Box::new(Machine::with_namespace(self.namespace.clone()))
                });
                child.step(Some(&token), span)?;
                self.token = token;
            }
            EndNestedExpression => match self.child.take() {
                Some(mut child) => {
                    child.step(None, None)?;
                    self.fragment = format!("{}{}", self.open_group, child.output);
                    self.namespace.extend(std::mem::take(&mut child.namespace));
                }
                None => {
                    // Empty brackets parse as an empty nested program.
                    self.fragment = self.open_group.clone();
                }
            },
            ZeroOrMore => self.modifier = "*".to_string(),
            OneOrMore => self.modifier = "+".to_string(),
            ZeroOrOne => self.modifier = "?".to_string(),
            MRepetitions => {
                self.modifier_fragment = self.token.clone();
                self.modifier = format!("{{{}}}", self.modifier_fragment);
                self.lower_bound = parse_count(&self.token).unwrap_or(0);
            }
            MUpToN => {
                self.modifier_fragment = format!("{},{}", self.modifier_fragment, self.token);
                self.modifier = format!("{{{}}}", self.modifier_fragment);
            }
            MUpToInfinity => {
                self.modifier_fragment.push(',');
                self.modifier = format!("{{{}}}", self.modifier_fragment);
            }
            SetNotGreedy => self.modifier.push('?'),
            OpenClass | FromRange => {
                self.fragment = format!("{}[", self.open_group);
            }
            ExceptClass => {
                self.fragment = format!("{}[^", self.open_group);
            }
            InClass | InComplementClass => {
                match special_symbol(&self.token) {
                    Some(symbol) => self.fragment.push_str(symbol),
                    None => self.fragment.push_str(&escape_literal(&self.token)),
                }
                self.fragment.push(']');
            }
            OrOf | OrFrom | OrExcept => {
                // Reopen the staged class: strip the trailing `]`.
                self.fragment.pop();
            }
            OpenClassRange => {
                self.start_range = only_char(&self.token);
                self.fragment.push_str(&escape_literal(&self.token));
                self.fragment.push('-');
            }
            Fail(kind) => {
                return Err(RawSyntaxError {
                    kind,
                    span: self.span.clone(),
                });
            }
            EndOfExpressions | CheckColon | SetFlags | StartExpression | CheckGroupName
            | GroupName | NamedNestedExpression | CheckNumberOfTimes | UpTo | ToRange
            | KeepGreedy => {}
        }
        Ok(())
    }

    /// Move the completed expression into the output: fragment, closing
    /// parenthesis, quantifier suffix. Resets the open marker for the next
    /// expression.
    fn flush_expression(&mut self) {
        self.output.push_str(&self.fragment);
        self.output.push(')');
        self.output.push_str(&self.modifier);
        self.fragment.clear();
        self.modifier.clear();
        self.open_group = OPEN_GROUP.to_string();
    }
}
