//! Logic-less poster templates.
//!
//! Templates are SVG documents with Mustache-style tags. Data comes from any
//! serializable value, in practice a [`MeetupInstance`](crate::config::MeetupInstance):
//!
//! | Tag | Renders |
//! |---|---|
//! | `{{year}}` | value of `year`, XML-escaped |
//! | `{{{year}}}`, `{{& year}}` | value of `year`, raw |
//! | `{{a.b}}` | nested lookup |
//! | `{{! note}}` | nothing |
//! | `{{#talks}}…{{/talks}}` | the block once per item of a list, or once if truthy |
//! | `{{^time}}…{{/time}}` | the block if `time` is falsy or missing |
//!
//! Inside a section the value becomes the innermost context: `{{.}}` is the
//! value itself, and names not found in it are looked up in the enclosing
//! contexts. Unknown names render as the empty string. Substituted values are
//! never re-scanned for tags.
//!
//! A comment or section tag alone on its line (only whitespace around it) is
//! removed together with that line, so annotations don't leave blank lines in
//! the SVG.

use regex::{Captures, Regex};
use serde::Serialize;
use serde_json::Value;
use std::ops::Range;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template data could not be serialized: {0}")]
    Data(#[from] serde_json::Error),
    #[error("section '{0}' is never closed")]
    UnclosedSection(String),
    #[error("closing tag '{found}' does not match open section '{expected}'")]
    MismatchedSection { expected: String, found: String },
    #[error("closing tag '{0}' has no open section")]
    UnopenedSection(String),
}

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Text(&'a str),
    Var { name: &'a str, escape: bool },
    Section {
        name: &'a str,
        inverted: bool,
        body: Vec<Token<'a>>,
    },
}

/// Group 1: name inside a triple-mustache. Group 2: sigil. Group 3: name.
fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(r"\{\{\{\s*([^}]*?)\s*\}\}\}|\{\{\s*([!&#^/]?)\s*([^}]*?)\s*\}\}")
            .expect("tag pattern is valid")
    })
}

/// Render `template` against `data`.
///
/// Pure: the same inputs always produce the same output.
pub fn render<T: Serialize + ?Sized>(template: &str, data: &T) -> Result<String, TemplateError> {
    let context = serde_json::to_value(data)?;
    let tokens = parse(template)?;
    let mut out = String::with_capacity(template.len());
    render_tokens(&tokens, &mut vec![&context], &mut out);
    Ok(out)
}

struct Frame<'a> {
    name: &'a str,
    inverted: bool,
    body: Vec<Token<'a>>,
}

fn parse(template: &str) -> Result<Vec<Token<'_>>, TemplateError> {
    let mut root: Vec<Token<'_>> = Vec::new();
    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut last = 0;

    for caps in tag_regex().captures_iter(template) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let sigil = if caps.get(1).is_some() { "" } else { group(&caps, 2) };
        let (text_end, next) = match sigil {
            "!" | "#" | "^" | "/" => standalone_line(template, last, &whole),
            _ => None,
        }
        .unwrap_or((whole.start, whole.end));

        let current = match stack.last_mut() {
            Some(frame) => &mut frame.body,
            None => &mut root,
        };
        if text_end > last {
            current.push(Token::Text(&template[last..text_end]));
        }
        last = next;

        if let Some(name) = caps.get(1) {
            current.push(Token::Var {
                name: name.as_str(),
                escape: false,
            });
            continue;
        }

        let name = group(&caps, 3);
        match sigil {
            "!" => {}
            "&" => current.push(Token::Var {
                name,
                escape: false,
            }),
            "#" | "^" => stack.push(Frame {
                name,
                inverted: sigil == "^",
                body: Vec::new(),
            }),
            "/" => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| TemplateError::UnopenedSection(name.to_string()))?;
                if frame.name != name {
                    return Err(TemplateError::MismatchedSection {
                        expected: frame.name.to_string(),
                        found: name.to_string(),
                    });
                }
                let section = Token::Section {
                    name: frame.name,
                    inverted: frame.inverted,
                    body: frame.body,
                };
                match stack.last_mut() {
                    Some(parent) => parent.body.push(section),
                    None => root.push(section),
                }
            }
            _ => current.push(Token::Var { name, escape: true }),
        }
    }

    if let Some(open) = stack.pop() {
        return Err(TemplateError::UnclosedSection(open.name.to_string()));
    }
    if last < template.len() {
        root.push(Token::Text(&template[last..]));
    }
    Ok(root)
}

/// If the tag at `tag` is the only non-whitespace on its line, the span of
/// that whole line (newline included) as `(line_start, line_end)`.
fn standalone_line(template: &str, last: usize, tag: &Range<usize>) -> Option<(usize, usize)> {
    let line_start = template[..tag.start].rfind('\n').map_or(0, |i| i + 1);
    // Another tag already ended on this line.
    if line_start < last {
        return None;
    }
    let line_end = template[tag.end..]
        .find('\n')
        .map_or(template.len(), |i| tag.end + i + 1);
    let blank = |s: &str| s.chars().all(char::is_whitespace);
    (blank(&template[line_start..tag.start]) && blank(&template[tag.end..line_end]))
        .then_some((line_start, line_end))
}

fn group<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str())
}

/// `stack` holds the section contexts, innermost last. It is never empty.
fn render_tokens<'v>(tokens: &[Token<'_>], stack: &mut Vec<&'v Value>, out: &mut String) {
    for token in tokens {
        match token {
            Token::Text(text) => out.push_str(text),
            Token::Var { name, escape } => {
                let value = display_value(lookup(stack, name));
                if *escape {
                    out.push_str(&escape_markup(&value));
                } else {
                    out.push_str(&value);
                }
            }
            Token::Section {
                name,
                inverted,
                body,
            } => {
                let value = lookup(stack, name);
                if *inverted {
                    if !is_truthy(value) {
                        render_tokens(body, stack, out);
                    }
                    continue;
                }
                match value {
                    Some(Value::Array(items)) => {
                        for item in items {
                            stack.push(item);
                            render_tokens(body, stack, out);
                            stack.pop();
                        }
                    }
                    Some(value) if is_truthy(Some(value)) => {
                        stack.push(value);
                        render_tokens(body, stack, out);
                        stack.pop();
                    }
                    _ => {}
                }
            }
        }
    }
}

/// Resolve `name` against the context stack. `.` is the innermost context.
/// The first segment of a dotted name is searched from the innermost context
/// outwards; the remaining segments walk nested objects from there.
fn lookup<'v>(stack: &[&'v Value], name: &str) -> Option<&'v Value> {
    if name == "." {
        return stack.last().copied();
    }
    let mut keys = name.split('.');
    let first = keys.next()?;
    let base = stack
        .iter()
        .rev()
        .find_map(|context| context.as_object()?.get(first))?;
    keys.try_fold(base, |value, key| value.as_object()?.get(key))
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

fn escape_markup(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MeetupInstance;
    use serde_json::json;

    fn instance() -> MeetupInstance {
        MeetupInstance {
            year: "2024".into(),
            date: "05-01".into(),
            time: "18:00".into(),
        }
    }

    #[test]
    fn substitutes_instance_fields() {
        let out = render("{{year}} {{date}} @ {{time}}", &instance()).unwrap();
        assert_eq!(out, "2024 05-01 @ 18:00");
    }

    #[test]
    fn year_only() {
        assert_eq!(render("Year: {{year}}", &instance()).unwrap(), "Year: 2024");
    }

    #[test]
    fn whitespace_inside_tags() {
        assert_eq!(render("{{ year }}|{{  time}}", &instance()).unwrap(), "2024|18:00");
    }

    #[test]
    fn unknown_placeholder_is_empty() {
        assert_eq!(render("[{{venue}}]", &instance()).unwrap(), "[]");
    }

    #[test]
    fn text_without_tags_is_unchanged() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><text>hi</text></svg>"#;
        assert_eq!(render(svg, &instance()).unwrap(), svg);
    }

    #[test]
    fn values_are_escaped() {
        let data = json!({ "title": "Rust & <Friends>" });
        assert_eq!(
            render("{{title}}", &data).unwrap(),
            "Rust &amp; &lt;Friends&gt;"
        );
    }

    #[test]
    fn triple_mustache_and_ampersand_are_raw() {
        let data = json!({ "title": "a & b" });
        assert_eq!(render("{{{title}}}|{{& title}}", &data).unwrap(), "a & b|a & b");
    }

    #[test]
    fn substitution_is_not_recursive() {
        let data = json!({ "a": "{{b}}", "b": "nope" });
        assert_eq!(render("{{{a}}}", &data).unwrap(), "{{b}}");
    }

    #[test]
    fn comments_render_nothing() {
        assert_eq!(render("a{{! drop me }}b", &instance()).unwrap(), "ab");
    }

    #[test]
    fn dotted_names_walk_objects() {
        let data = json!({ "venue": { "name": "Hall" } });
        assert_eq!(render("{{venue.name}}", &data).unwrap(), "Hall");
        assert_eq!(render("{{venue.city}}", &data).unwrap(), "");
    }

    #[test]
    fn numbers_and_bools_render() {
        let data = json!({ "n": 3, "b": true, "z": null });
        assert_eq!(render("{{n}}/{{b}}/{{z}}", &data).unwrap(), "3/true/");
    }

    #[test]
    fn sections_are_conditionals() {
        let tpl = "{{#time}}at {{time}}{{/time}}{{^venue}} (online){{/venue}}";
        assert_eq!(render(tpl, &instance()).unwrap(), "at 18:00 (online)");
    }

    #[test]
    fn empty_string_is_falsy() {
        let data = json!({ "time": "" });
        assert_eq!(render("{{#time}}x{{/time}}{{^time}}y{{/time}}", &data).unwrap(), "y");
    }

    #[test]
    fn nested_sections() {
        let tpl = "{{#year}}[{{#date}}{{date}}{{/date}}]{{/year}}";
        assert_eq!(render(tpl, &instance()).unwrap(), "[05-01]");
    }

    #[test]
    fn list_sections_repeat_per_item() {
        let data = json!({
            "year": "2024",
            "talks": [{ "title": "Ownership" }, { "title": "Async" }],
        });
        let tpl = "{{#talks}}{{title}} ({{year}});{{/talks}}";
        assert_eq!(render(tpl, &data).unwrap(), "Ownership (2024);Async (2024);");
    }

    #[test]
    fn empty_list_renders_inverted_block() {
        let data = json!({ "talks": [] });
        let tpl = "{{#talks}}x{{/talks}}{{^talks}}TBA{{/talks}}";
        assert_eq!(render(tpl, &data).unwrap(), "TBA");
    }

    #[test]
    fn object_section_becomes_context() {
        let data = json!({ "venue": { "name": "Hall" }, "name": "outer" });
        assert_eq!(
            render("{{#venue}}{{name}}{{/venue}}|{{name}}", &data).unwrap(),
            "Hall|outer"
        );
    }

    #[test]
    fn dot_inside_section_is_the_value() {
        let data = json!({ "tags": ["rust", "wasm"] });
        assert_eq!(render("{{#tags}}<{{.}}>{{/tags}}", &data).unwrap(), "<rust><wasm>");
        assert_eq!(render("{{#time}}[{{.}}]{{/time}}", &instance()).unwrap(), "[18:00]");
    }

    #[test]
    fn standalone_comment_line_is_removed() {
        assert_eq!(render("a\n  {{! note }}\nb", &instance()).unwrap(), "a\nb");
        assert_eq!(render("a\n{{! last }}", &instance()).unwrap(), "a\n");
    }

    #[test]
    fn standalone_section_lines_are_removed() {
        let tpl = "<g>\n  {{#time}}\n  <text>{{time}}</text>\n  {{/time}}\n</g>";
        assert_eq!(
            render(tpl, &instance()).unwrap(),
            "<g>\n  <text>18:00</text>\n</g>"
        );
    }

    #[test]
    fn inline_tags_keep_surrounding_whitespace() {
        assert_eq!(render("a {{! x }} b", &instance()).unwrap(), "a  b");
        assert_eq!(render("  {{year}}\n", &instance()).unwrap(), "  2024\n");
        assert_eq!(
            render("{{#time}}x{{/time}} {{! y }}\nz", &instance()).unwrap(),
            "x \nz"
        );
    }

    #[test]
    fn fixture_comment_leaves_no_blank_line() {
        let svg = include_str!("../fixtures/project/templates/digital-meetup.svg");
        let out = render(svg, &instance()).unwrap();
        assert!(!out.contains("{{"));
        assert!(!out.contains("\n  \n"));
        assert_eq!(out.lines().count(), svg.lines().count() - 1);
    }

    #[test]
    fn unclosed_section_is_error() {
        let err = render("{{#year}}open", &instance()).unwrap_err();
        assert!(matches!(err, TemplateError::UnclosedSection(n) if n == "year"));
    }

    #[test]
    fn mismatched_section_is_error() {
        let err = render("{{#year}}x{{/date}}", &instance()).unwrap_err();
        assert!(matches!(err, TemplateError::MismatchedSection { .. }));
    }

    #[test]
    fn stray_closing_tag_is_error() {
        let err = render("x{{/year}}", &instance()).unwrap_err();
        assert!(matches!(err, TemplateError::UnopenedSection(n) if n == "year"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let tpl = "<text>{{year}} {{date}} {{time}}</text>";
        let first = render(tpl, &instance()).unwrap();
        let second = render(tpl, &instance()).unwrap();
        assert_eq!(first, second);
    }
}
