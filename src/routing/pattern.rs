//! URI template compilation.
//!
//! # Responsibilities
//! - Parse URI templates (`/users/{id}`, `/files/{path+}`, `/{n<[0-9]+>}`, `/assets/*`)
//! - Compile each template once into a single anchored regex
//! - Match paths and extract parameters by name
//! - Rebuild a concrete URI from parameter values (reverse routing)
//!
//! # Template Grammar
//! ```text
//! literal         matched verbatim
//! {name}          one non-empty segment, no '/'
//! {name+}         the rest of the path, '/' allowed; last element only
//! {name<regex>}   one segment, accepted only if `regex` matches all of it
//! trailing /*     prefix + '/' + at least one more character
//! ```
//!
//! # Design Decisions
//! - One named capture group per parameter; lookups never re-parse the template
//! - Constraints are compiled separately and checked against the captured
//!   segment, so a constraint never decides where a segment ends
//! - Parameter values are returned verbatim (no percent-decoding)
//! - Template length and compiled regex size are bounded

use std::collections::HashMap;
use std::fmt;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Maximum template length in bytes.
pub const MAX_TEMPLATE_LENGTH: usize = 1024;

/// Size limit handed to the regex compiler.
const MAX_REGEX_SIZE: usize = 1 << 20;

/// Malformed URI template.
#[derive(Debug, Clone, Error)]
pub enum TemplateError {
    #[error("template `{template}` is {len} bytes, exceeding the maximum of {max}")]
    TooLong {
        template: String,
        len: usize,
        max: usize,
    },

    #[error("template `{template}` has an unterminated parameter starting at byte {position}")]
    Unterminated { template: String, position: usize },

    #[error("template `{template}` is malformed at byte {position}")]
    Malformed { template: String, position: usize },

    #[error("template `{template}` declares an invalid parameter name `{name}`")]
    InvalidName { template: String, name: String },

    #[error("template `{template}` declares parameter `{name}` more than once")]
    DuplicateParameter { template: String, name: String },

    #[error("multi-segment parameter `{name}` must end template `{template}`")]
    MultiSegmentNotLast { template: String, name: String },

    #[error("parameter `{name}` of template `{template}` has an invalid constraint: {source}")]
    InvalidRegex {
        template: String,
        name: String,
        source: regex::Error,
    },

    #[error("template `{template}` could not be compiled: {source}")]
    Compile {
        template: String,
        source: regex::Error,
    },
}

/// How a parameter consumes the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterKind {
    /// `{name}`
    Single,
    /// `{name+}`
    MultiSegment,
    /// `{name<regex>}`, holding the regex source.
    Constrained(String),
}

/// A parameter declared by a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
}

#[derive(Debug, Clone)]
enum Piece {
    Literal(String),
    Parameter(usize),
}

/// A compiled URI template.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    template: String,
    regex: Regex,
    pieces: Vec<Piece>,
    parameters: Vec<Parameter>,
    /// Anchored constraint per parameter, by declaration index.
    constraints: Vec<Option<Regex>>,
    wildcard: bool,
}

impl RoutePattern {
    /// Compile a URI template.
    pub fn compile(template: &str) -> Result<Self, TemplateError> {
        if template.len() > MAX_TEMPLATE_LENGTH {
            return Err(TemplateError::TooLong {
                template: template.to_string(),
                len: template.len(),
                max: MAX_TEMPLATE_LENGTH,
            });
        }

        let (body, wildcard) = match template.strip_suffix("/*") {
            Some(prefix) => (prefix, true),
            None => (template, false),
        };

        let (pieces, parameters, constraints) = parse(template, body)?;
        let source = regex_source(&pieces, &parameters, wildcard);

        let regex = RegexBuilder::new(&source)
            .size_limit(MAX_REGEX_SIZE)
            .build()
            .map_err(|source| TemplateError::Compile {
                template: template.to_string(),
                source,
            })?;

        Ok(Self {
            template: template.to_string(),
            regex,
            pieces,
            parameters,
            constraints,
            wildcard,
        })
    }

    /// The raw template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Parameter names in declaration order.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    /// True when the template ends with `/*`.
    pub fn has_wildcard(&self) -> bool {
        self.wildcard
    }

    /// True when the template has neither parameters nor a wildcard.
    pub fn is_static(&self) -> bool {
        self.parameters.is_empty() && !self.wildcard
    }

    /// Returns true if `path` matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.captures(path).is_some()
    }

    /// Extract parameter values from `path`, verbatim.
    ///
    /// Returns an empty map when the path does not match.
    pub fn extract_parameters(&self, path: &str) -> HashMap<String, String> {
        let Some(caps) = self.captures(path) else {
            return HashMap::new();
        };

        self.parameters
            .iter()
            .filter_map(|p| {
                caps.name(&p.name)
                    .map(|m| (p.name.clone(), m.as_str().to_string()))
            })
            .collect()
    }

    /// Substitute parameter values back into the template.
    ///
    /// Returns `None` for wildcard templates, when a parameter is missing, or
    /// when the resulting URI would not match this pattern.
    pub fn reverse(&self, values: &HashMap<String, String>) -> Option<String> {
        if self.wildcard {
            return None;
        }

        let mut uri = String::with_capacity(self.template.len());
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => uri.push_str(text),
                Piece::Parameter(index) => uri.push_str(values.get(&self.parameters[*index].name)?),
            }
        }

        self.matches(&uri).then_some(uri)
    }

    fn captures<'p>(&self, path: &'p str) -> Option<regex::Captures<'p>> {
        let caps = self.regex.captures(path)?;

        let accepted = self
            .parameters
            .iter()
            .zip(&self.constraints)
            .all(|(p, constraint)| match (constraint, caps.name(&p.name)) {
                (Some(constraint), Some(m)) => constraint.is_match(m.as_str()),
                _ => true,
            });

        accepted.then_some(caps)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

/// Split `body` (the template minus any trailing `/*`) into literal and parameter pieces.
fn parse(template: &str, body: &str) -> Result<(Vec<Piece>, Vec<Parameter>, Vec<Option<Regex>>), TemplateError> {
    let mut pieces = Vec::new();
    let mut parameters: Vec<Parameter> = Vec::new();
    let mut constraints = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while let Some(c) = body[i..].chars().next() {
        match c {
            '{' => {
                if !literal.is_empty() {
                    pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                }

                let (parameter, constraint, end) = parse_parameter(template, body, i)?;

                if parameter.kind == ParameterKind::MultiSegment && end != template.len() {
                    return Err(TemplateError::MultiSegmentNotLast {
                        template: template.to_string(),
                        name: parameter.name,
                    });
                }
                if parameters.iter().any(|p| p.name == parameter.name) {
                    return Err(TemplateError::DuplicateParameter {
                        template: template.to_string(),
                        name: parameter.name,
                    });
                }

                pieces.push(Piece::Parameter(parameters.len()));
                parameters.push(parameter);
                constraints.push(constraint);
                i = end;
            }
            '}' => {
                return Err(TemplateError::Malformed {
                    template: template.to_string(),
                    position: i,
                });
            }
            _ => {
                literal.push(c);
                i += c.len_utf8();
            }
        }
    }

    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }

    Ok((pieces, parameters, constraints))
}

/// Parse the parameter opening at `start` (a `{`).
///
/// Returns it with its compiled constraint, if any, and the index past its `}`.
fn parse_parameter(
    template: &str,
    body: &str,
    start: usize,
) -> Result<(Parameter, Option<Regex>, usize), TemplateError> {
    let unterminated = || TemplateError::Unterminated {
        template: template.to_string(),
        position: start,
    };
    let malformed = |position: usize| TemplateError::Malformed {
        template: template.to_string(),
        position,
    };

    let name_start = start + 1;
    let stop = body[name_start..]
        .find(['}', '+', '<', '{'])
        .map(|offset| name_start + offset)
        .ok_or_else(unterminated)?;

    let name = &body[name_start..stop];
    if !is_valid_name(name) {
        return Err(TemplateError::InvalidName {
            template: template.to_string(),
            name: name.to_string(),
        });
    }

    let (kind, constraint, end) = match body.as_bytes()[stop] {
        b'}' => (ParameterKind::Single, None, stop + 1),
        b'+' => {
            if !body[stop + 1..].starts_with('}') {
                return Err(malformed(stop));
            }
            (ParameterKind::MultiSegment, None, stop + 2)
        }
        b'<' => {
            let constraint_start = stop + 1;
            let constraint_end = find_constraint_end(body, constraint_start)
                .ok_or_else(unterminated)?;
            let constraint = &body[constraint_start..constraint_end];
            if constraint.is_empty() {
                return Err(malformed(constraint_start));
            }

            let compiled = RegexBuilder::new(&format!("^(?:{constraint})$"))
                .size_limit(MAX_REGEX_SIZE)
                .build()
                .map_err(|source| TemplateError::InvalidRegex {
                    template: template.to_string(),
                    name: name.to_string(),
                    source,
                })?;

            (
                ParameterKind::Constrained(constraint.to_string()),
                Some(compiled),
                constraint_end + 2,
            )
        }
        _ => return Err(malformed(stop)),
    };

    Ok((
        Parameter {
            name: name.to_string(),
            kind,
        },
        constraint,
        end,
    ))
}

/// Find the `>` closing a constraint, i.e. the first `>}` outside of any `{...}` quantifier.
fn find_constraint_end(body: &str, from: usize) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut depth = 0usize;
    let mut i = from;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'{' => depth += 1,
            b'}' if depth > 0 => depth -= 1,
            b'}' => return None,
            b'>' if depth == 0 && bytes.get(i + 1) == Some(&b'}') => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn regex_source(pieces: &[Piece], parameters: &[Parameter], wildcard: bool) -> String {
    let mut source = String::from("^");

    for piece in pieces {
        match piece {
            Piece::Literal(text) => source.push_str(&regex::escape(text)),
            Piece::Parameter(index) => {
                let parameter = &parameters[*index];
                let group = match parameter.kind {
                    ParameterKind::Single | ParameterKind::Constrained(_) => "[^/]+",
                    ParameterKind::MultiSegment => "[^/].*",
                };
                source.push_str(&format!("(?P<{}>{})", parameter.name, group));
            }
        }
    }

    if wildcard {
        source.push_str("/.+");
    }
    source.push('$');
    source
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_static_template_matches_exactly() {
        let pattern = RoutePattern::compile("/foo.json").unwrap();
        assert!(pattern.is_static());
        assert!(pattern.matches("/foo.json"));
        assert!(!pattern.matches("/fooXjson"));
        assert!(!pattern.matches("/foo.json/"));
        assert!(!pattern.matches("/Foo.json"));
    }

    #[test]
    fn test_single_segment_parameter() {
        let pattern = RoutePattern::compile("/foo/{id}").unwrap();
        assert!(!pattern.matches("/foo"));
        assert!(!pattern.matches("/foo/"));
        assert!(!pattern.matches("/foo/a/b"));
        assert_eq!(pattern.extract_parameters("/foo/TeSt"), params(&[("id", "TeSt")]));
    }

    #[test]
    fn test_two_parameters() {
        let pattern = RoutePattern::compile("/foo/{id}/{email}").unwrap();
        let extracted = pattern.extract_parameters("/foo/1234/foo@aol.com");
        assert_eq!(extracted, params(&[("id", "1234"), ("email", "foo@aol.com")]));
        assert_eq!(pattern.parameter_names().collect::<Vec<_>>(), vec!["id", "email"]);
    }

    #[test]
    fn test_values_are_not_decoded() {
        let pattern = RoutePattern::compile("/files/{name}").unwrap();
        assert_eq!(pattern.extract_parameters("/files/a%20b"), params(&[("name", "a%20b")]));
    }

    #[test]
    fn test_constrained_parameter() {
        let pattern = RoutePattern::compile("/{type<[0-9]+>}").unwrap();
        assert_eq!(pattern.extract_parameters("/99"), params(&[("type", "99")]));
        assert!(!pattern.matches("/xx"));
        assert!(!pattern.matches("/"));
    }

    #[test]
    fn test_constraint_with_quantifier_braces() {
        let pattern = RoutePattern::compile("/year/{y<[0-9]{4}>}").unwrap();
        assert!(pattern.matches("/year/2014"));
        assert!(!pattern.matches("/year/201"));
        assert_eq!(
            pattern.parameters()[0].kind,
            ParameterKind::Constrained("[0-9]{4}".into())
        );
    }

    #[test]
    fn test_constraint_cannot_span_segments() {
        let pattern = RoutePattern::compile("/x/{rest<.+>}").unwrap();
        assert!(pattern.matches("/x/abc"));
        assert!(!pattern.matches("/x/a/b"));
    }

    #[test]
    fn test_constraint_does_not_steal_following_segments() {
        let wildcard = RoutePattern::compile("/{a<.+>}/*").unwrap();
        assert!(wildcard.matches("/x/y/z"));
        assert_eq!(wildcard.extract_parameters("/x/y/z"), params(&[("a", "x")]));

        let multi = RoutePattern::compile("/{a<.+>}/{rest+}").unwrap();
        assert_eq!(
            multi.extract_parameters("/x/y/z"),
            params(&[("a", "x"), ("rest", "y/z")])
        );
    }

    #[test]
    fn test_anchored_constraint_in_later_segment() {
        let pattern = RoutePattern::compile("/items/{n<^[0-9]+$>}").unwrap();
        assert_eq!(pattern.extract_parameters("/items/12"), params(&[("n", "12")]));
        assert!(!pattern.matches("/items/1a"));
    }

    #[test]
    fn test_trailing_wildcard() {
        let pattern = RoutePattern::compile("/foo/*").unwrap();
        assert!(pattern.has_wildcard());
        assert!(!pattern.matches("/foo"));
        assert!(!pattern.matches("/foo/"));
        assert!(!pattern.matches("/foobar"));
        assert!(pattern.matches("/foo/bar"));
        assert!(pattern.matches("/foo/bar/baz"));
    }

    #[test]
    fn test_multi_segment_parameter() {
        let pattern = RoutePattern::compile("/foo/{path+}").unwrap();
        assert!(!pattern.matches("/foo"));
        assert!(!pattern.matches("/foo/"));
        assert_eq!(pattern.extract_parameters("/foo/bar"), params(&[("path", "bar")]));
        assert_eq!(pattern.extract_parameters("/foo/bar/baz"), params(&[("path", "bar/baz")]));
    }

    #[test]
    fn test_regex_metacharacters_in_literals() {
        let pattern = RoutePattern::compile("/a+b/(c)/{id}").unwrap();
        assert!(pattern.matches("/a+b/(c)/1"));
        assert!(!pattern.matches("/aab/(c)/1"));
    }

    #[test]
    fn test_mismatch_yields_empty_parameters() {
        let pattern = RoutePattern::compile("/foo/{id}").unwrap();
        assert!(pattern.extract_parameters("/bar/1").is_empty());
    }

    #[test]
    fn test_malformed_templates() {
        assert!(matches!(
            RoutePattern::compile("/foo/{id"),
            Err(TemplateError::Unterminated { position: 5, .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/foo/id}"),
            Err(TemplateError::Malformed { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/foo/{}"),
            Err(TemplateError::InvalidName { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/foo/{1d}"),
            Err(TemplateError::InvalidName { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/foo/{a{b}}"),
            Err(TemplateError::Malformed { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/{id}/{id}"),
            Err(TemplateError::DuplicateParameter { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/{rest+}/tail"),
            Err(TemplateError::MultiSegmentNotLast { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/{rest+}/*"),
            Err(TemplateError::MultiSegmentNotLast { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/{n<[0-9>}"),
            Err(TemplateError::InvalidRegex { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/{n<>}"),
            Err(TemplateError::Malformed { .. })
        ));
    }

    #[test]
    fn test_template_length_is_bounded() {
        let template = format!("/{}", "a".repeat(MAX_TEMPLATE_LENGTH));
        assert!(matches!(
            RoutePattern::compile(&template),
            Err(TemplateError::TooLong { .. })
        ));
    }

    #[test]
    fn test_reverse() {
        let pattern = RoutePattern::compile("/foo/{id}/{email}").unwrap();
        let uri = pattern.reverse(&params(&[("id", "42"), ("email", "a@b.c")]));
        assert_eq!(uri.as_deref(), Some("/foo/42/a@b.c"));

        assert!(pattern.reverse(&params(&[("id", "42")])).is_none());
        assert!(pattern.reverse(&params(&[("id", "4/2"), ("email", "x")])).is_none());
    }

    #[test]
    fn test_reverse_checks_constraints_and_wildcards() {
        let pattern = RoutePattern::compile("/{type<[0-9]+>}").unwrap();
        assert_eq!(pattern.reverse(&params(&[("type", "7")])).as_deref(), Some("/7"));
        assert!(pattern.reverse(&params(&[("type", "x")])).is_none());

        let wildcard = RoutePattern::compile("/assets/*").unwrap();
        assert!(wildcard.reverse(&HashMap::new()).is_none());
    }

    #[test]
    fn test_error_display() {
        let err = RoutePattern::compile("/{id}/{id}").unwrap_err();
        assert_eq!(
            err.to_string(),
            "template `/{id}/{id}` declares parameter `id` more than once"
        );
    }
}
