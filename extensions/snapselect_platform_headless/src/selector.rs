//! Simple selector matching
//!
//! Supports comma-separated lists of compound selectors built from a tag name,
//! `#id`, `.class`, `[attr]` and `[attr=value]` parts. Combinators are not
//! supported.

use smallvec::SmallVec;
use snapselect_platform::{PlatformError, Result};

/// One part of a compound selector
#[derive(Clone, Debug, PartialEq, Eq)]
enum Part {
    Tag(String),
    Id(String),
    Class(String),
    Attribute { name: String, value: Option<String> },
}

/// A compound selector: every part must match
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Compound {
    parts: SmallVec<[Part; 4]>,
}

/// What a selector needs to know about a node
pub(crate) trait Matchable {
    fn tag(&self) -> &str;
    fn attr(&self, name: &str) -> Option<String>;
    fn has_class(&self, class: &str) -> bool;
}

impl Compound {
    pub(crate) fn matches(&self, node: &impl Matchable) -> bool {
        self.parts.iter().all(|part| match part {
            Part::Tag(tag) => node.tag() == tag.as_str(),
            Part::Id(id) => node.attr("id").as_deref() == Some(id.as_str()),
            Part::Class(class) => node.has_class(class),
            Part::Attribute { name, value } => match (node.attr(name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => &actual == expected,
                (None, _) => false,
            },
        })
    }
}

/// Parse a selector list
pub(crate) fn parse(selector: &str) -> Result<Vec<Compound>> {
    let invalid = || PlatformError::InvalidSelector(selector.to_string());

    selector
        .split(',')
        .map(|compound| {
            let compound = compound.trim();
            if compound.is_empty() || compound.contains(char::is_whitespace) {
                return Err(invalid());
            }
            parse_compound(compound).ok_or_else(invalid)
        })
        .collect()
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(input: &str) -> (&str, &str) {
    let end = input.find(|c: char| !is_ident_char(c)).unwrap_or(input.len());
    input.split_at(end)
}

fn parse_compound(mut input: &str) -> Option<Compound> {
    let mut parts = SmallVec::new();

    let (tag, rest) = take_ident(input);
    if !tag.is_empty() {
        parts.push(Part::Tag(tag.to_ascii_lowercase()));
    }
    input = rest;

    while let Some(first) = input.chars().next() {
        match first {
            '#' | '.' => {
                let (ident, rest) = take_ident(&input[1..]);
                if ident.is_empty() {
                    return None;
                }
                parts.push(if first == '#' {
                    Part::Id(ident.to_string())
                } else {
                    Part::Class(ident.to_string())
                });
                input = rest;
            }
            '[' => {
                let close = input.find(']')?;
                let body = &input[1..close];
                let part = match body.split_once('=') {
                    Some((name, value)) => Part::Attribute {
                        name: name.trim().to_string(),
                        value: Some(value.trim().trim_matches(|c: char| c == '"' || c == '\'').to_string()),
                    },
                    None => Part::Attribute {
                        name: body.trim().to_string(),
                        value: None,
                    },
                };
                parts.push(part);
                input = &input[close + 1..];
            }
            _ => return None,
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(Compound { parts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fake {
        tag: &'static str,
        id: Option<&'static str>,
        classes: &'static [&'static str],
    }

    impl Matchable for Fake {
        fn tag(&self) -> &str {
            self.tag
        }

        fn attr(&self, name: &str) -> Option<String> {
            (name == "id").then(|| self.id.map(str::to_string)).flatten()
        }

        fn has_class(&self, class: &str) -> bool {
            self.classes.contains(&class)
        }
    }

    #[test]
    fn test_parse_compound() {
        let list = parse("select.fancy#pick").unwrap();
        let node = Fake {
            tag: "select",
            id: Some("pick"),
            classes: &["fancy"],
        };
        assert!(list[0].matches(&node));

        let other = Fake {
            tag: "select",
            id: None,
            classes: &["fancy"],
        };
        assert!(!list[0].matches(&other));
    }

    #[test]
    fn test_parse_list_and_attributes() {
        let list = parse("div, [id=pick]").unwrap();
        assert_eq!(list.len(), 2);
        let node = Fake {
            tag: "select",
            id: Some("pick"),
            classes: &[],
        };
        assert!(!list[0].matches(&node));
        assert!(list[1].matches(&node));
    }

    #[test]
    fn test_invalid_selectors() {
        assert!(parse("").is_err());
        assert!(parse("div span").is_err());
        assert!(parse(".").is_err());
        assert!(parse("div > span").is_err());
    }
}
