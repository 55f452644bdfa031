//! Grammar vocabulary: keywords, symbol tables, and emission escaping.

/// Grammar keywords. Transitions key on token text, so these are plain
/// string constants rather than a typed token enum.
pub mod kw {
    pub const EXPR: &str = "expr";
    pub const NAME: &str = "name";
    pub const SET_FLAGS: &str = "set_flags";
    pub const ANY_CHAR: &str = "any_char";
    pub const FOR: &str = "for";
    pub const OR: &str = "or";
    pub const OF: &str = "of";
    pub const OR_OF: &str = "or_of";
    pub const FROM: &str = "from";
    pub const TO: &str = "to";
    pub const OR_FROM: &str = "or_from";
    pub const EXCEPT: &str = "except";
    pub const OR_EXCEPT: &str = "or_except";
    pub const UP_TO: &str = "up_to";
    pub const INFINITY: &str = "infinity";
    pub const ZERO_OR_MORE: &str = "zero_or_more";
    pub const ZERO_OR_ONE: &str = "zero_or_one";
    pub const ONE_OR_MORE: &str = "one_or_more";
    pub const GREEDY: &str = "greedy";
    pub const NOT_GREEDY: &str = "not_greedy";
    pub const START_OF_STRING: &str = "start_of_string";
    pub const END_OF_STRING: &str = "end_of_string";
}

/// Escape keywords usable both as standalone expression values and inside
/// character classes. The whitespace family emits the raw control
/// character, the class shorthands emit their backslash form; both are what
/// the target dialect expects verbatim, so neither goes through
/// [`escape_literal`].
pub fn special_symbol(token: &str) -> Option<&'static str> {
    Some(match token {
        "new_line" => "\n",
        "tab" => "\t",
        "carriage_return" => "\r",
        "page_break" => "\u{000C}",
        "vertical_space" => "\u{000B}",
        "digit" => r"\d",
        "non_digit" => r"\D",
        "whitespace" => r"\s",
        "non_whitespace" => r"\S",
        "alphanumeric" => r"\w",
        "non_alphanumeric" => r"\W",
        _ => return None,
    })
}

/// Anchors; unmodifiable expression values.
pub fn anchor_symbol(token: &str) -> Option<&'static str> {
    match token {
        kw::START_OF_STRING => Some("^"),
        kw::END_OF_STRING => Some("$"),
        _ => None,
    }
}

/// One-letter inline flag codes for the `set_flags` block.
pub fn flag_symbol(token: &str) -> Option<char> {
    match token {
        "ignore_case" => Some('i'),
        "locale" => Some('L'),
        "multiline" => Some('m'),
        "any_char_all" => Some('s'),
        "unicode" => Some('u'),
        _ => None,
    }
}

/// Whether a token is part of the grammar vocabulary and therefore
/// unavailable as a group name.
pub fn is_reserved_word(token: &str) -> bool {
    matches!(
        token,
        kw::EXPR
            | kw::NAME
            | kw::SET_FLAGS
            | kw::ANY_CHAR
            | kw::FOR
            | kw::OR
            | kw::OF
            | kw::OR_OF
            | kw::FROM
            | kw::TO
            | kw::OR_FROM
            | kw::EXCEPT
            | kw::OR_EXCEPT
            | kw::UP_TO
            | kw::INFINITY
            | kw::ZERO_OR_MORE
            | kw::ZERO_OR_ONE
            | kw::ONE_OR_MORE
            | kw::GREEDY
            | kw::NOT_GREEDY
            | kw::START_OF_STRING
            | kw::END_OF_STRING
            | "ignore_case"
            | "locale"
            | "multiline"
            | "any_char_all"
            | "unicode"
    ) || special_symbol(token).is_some()
}

/// Group names become `(?P<name>` in the output, so they must be
/// identifiers for the emitted pattern to stay well-formed.
pub fn is_valid_group_name(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Escape a literal for emission: every character outside `[0-9A-Za-z]`
/// gets a backslash (NUL becomes `\000`, which cannot take a plain
/// backslash prefix).
pub fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if c == '\0' {
            out.push_str("\\000");
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

/// The token as a single character, if that is all it is.
pub fn only_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Parse a repetition count: ASCII digits only, no sign.
pub fn parse_count(token: &str) -> Option<u64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}
