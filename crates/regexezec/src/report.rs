//! Match report formatting for the `match` subcommand.
//!
//! The report lists the full match, every numbered group, then every named
//! group, one per line.

use colored::Colorize;
use regexeze::{Captures, Error, Pattern};

/// Render the report for a successful match.
pub fn match_report(pattern: &Pattern, caps: &Captures<'_>) -> Result<String, Error> {
    let mut out = String::new();

    out.push_str(&format!("{}\n", "Match successful".green().bold()));
    out.push('\n');
    out.push_str(&format!("{}\n", "All groups:".bold()));
    out.push_str(&format!("\tFull match: {}\n", group_text(caps, 0)));
    for index in 1..caps.len() {
        out.push_str(&format!("\tGroup {}: {}\n", index, group_text(caps, index)));
    }

    out.push('\n');
    out.push_str(&format!("{}\n", "Named groups:".bold()));
    for name in pattern.capture_names()?.iter().flatten() {
        let text = caps.name(name).map_or("", |m| m.as_str());
        out.push_str(&format!("\t{}: {}\n", name, text));
    }

    Ok(out)
}

fn group_text<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_for(source: &str, target: &str) -> String {
        colored::control::set_override(false);
        let pattern = regexeze::compile(source).unwrap();
        let caps = pattern
            .match_start(target)
            .unwrap()
            .expect("target should match");
        match_report(&pattern, &caps).unwrap()
    }

    #[test]
    fn test_report_lists_numbered_and_named_groups() {
        let report = report_for(
            "expr: [ name: word; expr: alphanumeric for one_or_more; ];",
            "hello",
        );
        assert_eq!(
            report,
            "Match successful\n\nAll groups:\n\tFull match: hello\n\tGroup 1: hello\n\tGroup 2: o\n\nNamed groups:\n\tword: hello\n"
        );
    }

    #[test]
    fn test_report_without_named_groups() {
        let report = report_for("expr: 'a';", "a");
        assert_eq!(
            report,
            "Match successful\n\nAll groups:\n\tFull match: a\n\tGroup 1: a\n\nNamed groups:\n"
        );
    }

    #[test]
    fn test_report_with_unmatched_optional_group() {
        let report = report_for("expr: 'a'; expr: [expr: 'b';] for zero_or_one;", "a");
        assert_eq!(
            report,
            "Match successful\n\nAll groups:\n\tFull match: a\n\tGroup 1: a\n\tGroup 2: \n\tGroup 3: \n\nNamed groups:\n"
        );
    }
}
