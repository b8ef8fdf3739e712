/*
 * Licensed to the Apache Software Foundation (ASF) under one
 * or more contributor license agreements.  See the NOTICE file
 * distributed with this work for additional information
 * regarding copyright ownership.  The ASF licenses this file
 * to you under the Apache License, Version 2.0 (the
 * "License"); you may not use this file except in compliance
 * with the License.  You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing,
 * software distributed under the License is distributed on an
 * "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
 * KIND, either express or implied.  See the License for the
 * specific language governing permissions and limitations
 * under the License.
 */

//! `${...}` placeholder resolution inside string property values.
//!
//! Supports `${other.prop}` and `${other.prop:default}` forms, nested
//! placeholders in both the name and the default, and `\${` escaping for a
//! literal `${`. Referenced properties are looked up across all sources in
//! priority order and their replacement text is resolved recursively.

use std::sync::Arc;

use tracing::trace;

use crate::error::BindError;
use crate::name::PropertyName;
use crate::property::PropertyValue;
use crate::source::PropertySource;

/// Maximum placeholder resolution depth before the chain is treated as
/// circular.
pub const MAX_PLACEHOLDER_DEPTH: usize = 10;

/// How unresolvable placeholders are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderMode {
    /// A placeholder with no matching property and no default fails the bind.
    #[default]
    Strict,
    /// Unresolvable placeholders are left as literal `${...}` text.
    Lenient,
}

pub(crate) struct PlaceholderResolver<'a> {
    sources: &'a [Arc<dyn PropertySource>],
    mode: PlaceholderMode,
}

impl<'a> PlaceholderResolver<'a> {
    pub(crate) fn new(sources: &'a [Arc<dyn PropertySource>], mode: PlaceholderMode) -> Self {
        Self { sources, mode }
    }

    /// Resolve every placeholder in `raw`. `at` is the property being bound,
    /// used in error reporting and cycle bookkeeping.
    pub(crate) fn resolve(&self, at: &PropertyName, raw: &str) -> Result<String, BindError> {
        if !raw.contains("${") {
            return Ok(raw.to_string());
        }
        let mut in_flight = Vec::new();
        self.resolve_text(at, raw, &mut in_flight, 0)
    }

    fn resolve_text(
        &self,
        at: &PropertyName,
        text: &str,
        in_flight: &mut Vec<PropertyName>,
        depth: usize,
    ) -> Result<String, BindError> {
        let mut out = String::with_capacity(text.len());
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'\\' && text[i..].starts_with("\\${") {
                out.push_str("${");
                i += 3;
            } else if text[i..].starts_with("${") {
                let body_start = i + 2;
                let body_end = find_closing_brace(text, body_start).ok_or_else(|| {
                    BindError::InvalidName {
                        name: at.to_string(),
                        reason: "unterminated '${' placeholder".to_string(),
                    }
                })?;
                let body = &text[body_start..body_end];
                let replacement = self.resolve_placeholder(at, body, in_flight, depth)?;
                out.push_str(&replacement);
                i = body_end + 1;
            } else {
                match text[i..].chars().next() {
                    Some(c) => {
                        out.push(c);
                        i += c.len_utf8();
                    }
                    None => break,
                }
            }
        }
        Ok(out)
    }

    fn resolve_placeholder(
        &self,
        at: &PropertyName,
        body: &str,
        in_flight: &mut Vec<PropertyName>,
        depth: usize,
    ) -> Result<String, BindError> {
        if depth >= MAX_PLACEHOLDER_DEPTH {
            return Err(BindError::CircularPlaceholder {
                name: at.to_string(),
                placeholder: body.to_string(),
            });
        }
        let (name_part, default_part) = split_body(body);
        // The name itself may contain nested placeholders.
        let name_text = self.resolve_text(at, name_part, in_flight, depth + 1)?;

        if let Some(referenced) = PropertyName::parse_lenient(&name_text) {
            if in_flight.contains(&referenced) {
                return Err(BindError::CircularPlaceholder {
                    name: at.to_string(),
                    placeholder: name_text,
                });
            }
            if let Some(value) = self.lookup(&referenced) {
                trace!("resolved placeholder '${{{name_text}}}' for '{at}'");
                in_flight.push(referenced);
                let resolved = self.resolve_text(at, &value, in_flight, depth + 1);
                in_flight.pop();
                return resolved;
            }
        }

        match default_part {
            Some(default) => self.resolve_text(at, default, in_flight, depth + 1),
            None => match self.mode {
                PlaceholderMode::Strict => Err(BindError::PlaceholderNotFound {
                    name: at.to_string(),
                    placeholder: name_text,
                }),
                PlaceholderMode::Lenient => Ok(format!("${{{body}}}")),
            },
        }
    }

    fn lookup(&self, name: &PropertyName) -> Option<String> {
        for source in self.sources {
            if let Some(property) = source.get(name) {
                return Some(match property.value {
                    PropertyValue::Str(s) => s,
                    other => other.to_string(),
                });
            }
        }
        None
    }
}

/// Find the index of the `}` closing the placeholder whose body starts at
/// `from`, accounting for nested `${`.
fn find_closing_brace(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut open = 1;
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'$' && i + 1 < bytes.len() && bytes[i + 1] == b'{' {
            open += 1;
            i += 2;
        } else if bytes[i] == b'}' {
            open -= 1;
            if open == 0 {
                return Some(i);
            }
            i += 1;
        } else {
            i += 1;
        }
    }
    None
}

/// Split a placeholder body into name and optional default at the first `:`
/// outside any nested placeholder.
fn split_body(body: &str) -> (&str, Option<&str>) {
    let bytes = body.as_bytes();
    let mut open = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' && i + 1 < bytes.len() && bytes[i + 1] == b'{' {
            open += 1;
            i += 2;
        } else if bytes[i] == b'}' && open > 0 {
            open -= 1;
            i += 1;
        } else if bytes[i] == b':' && open == 0 {
            return (&body[..i], Some(&body[i + 1..]));
        } else {
            i += 1;
        }
    }
    (body, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MapPropertySource;

    fn resolver_over(
        pairs: &[(&str, &str)],
        mode: PlaceholderMode,
    ) -> (Vec<Arc<dyn PropertySource>>, PlaceholderMode) {
        let source: Arc<dyn PropertySource> =
            Arc::new(MapPropertySource::new("test", pairs.iter().copied()));
        (vec![source], mode)
    }

    fn resolve(pairs: &[(&str, &str)], mode: PlaceholderMode, raw: &str) -> Result<String, BindError> {
        let (sources, mode) = resolver_over(pairs, mode);
        let resolver = PlaceholderResolver::new(&sources, mode);
        let at = PropertyName::parse("subject").unwrap();
        resolver.resolve(&at, raw)
    }

    #[test]
    fn plain_text_passes_through() {
        let out = resolve(&[], PlaceholderMode::Strict, "hello world").unwrap();
        assert_eq!(out, "hello world");
    }

    #[test]
    fn substitutes_referenced_property() {
        let out = resolve(
            &[("greeting", "hello")],
            PlaceholderMode::Strict,
            "${greeting} world",
        )
        .unwrap();
        assert_eq!(out, "hello world");
    }

    #[test]
    fn resolves_transitively() {
        let out = resolve(
            &[("a", "${b}!"), ("b", "deep")],
            PlaceholderMode::Strict,
            "${a}",
        )
        .unwrap();
        assert_eq!(out, "deep!");
    }

    #[test]
    fn applies_default_when_missing() {
        let out = resolve(&[], PlaceholderMode::Strict, "${missing:fallback}").unwrap();
        assert_eq!(out, "fallback");
    }

    #[test]
    fn default_may_contain_placeholders() {
        let out = resolve(
            &[("inner", "x")],
            PlaceholderMode::Strict,
            "${missing:${inner}}",
        )
        .unwrap();
        assert_eq!(out, "x");
    }

    #[test]
    fn nested_placeholder_in_name() {
        let out = resolve(
            &[("which", "target"), ("target", "hit")],
            PlaceholderMode::Strict,
            "${${which}}",
        )
        .unwrap();
        assert_eq!(out, "hit");
    }

    #[test]
    fn self_reference_is_circular() {
        let error = resolve(&[("x", "${x}")], PlaceholderMode::Strict, "${x}").unwrap_err();
        assert!(matches!(error, BindError::CircularPlaceholder { .. }));
    }

    #[test]
    fn transitive_cycle_is_circular() {
        let error = resolve(
            &[("a", "${b}"), ("b", "${a}")],
            PlaceholderMode::Strict,
            "${a}",
        )
        .unwrap_err();
        assert!(matches!(error, BindError::CircularPlaceholder { .. }));
    }

    #[test]
    fn missing_without_default_fails_in_strict_mode() {
        let error = resolve(&[], PlaceholderMode::Strict, "${missing}").unwrap_err();
        match error {
            BindError::PlaceholderNotFound { placeholder, .. } => {
                assert_eq!(placeholder, "missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_is_literal_in_lenient_mode() {
        let out = resolve(&[], PlaceholderMode::Lenient, "${missing} there").unwrap();
        assert_eq!(out, "${missing} there");
    }

    #[test]
    fn escaped_placeholder_is_literal() {
        let out = resolve(&[("x", "1")], PlaceholderMode::Strict, "\\${x}").unwrap();
        assert_eq!(out, "${x}");
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        let error = resolve(&[], PlaceholderMode::Strict, "${oops").unwrap_err();
        assert!(matches!(error, BindError::InvalidName { .. }));
    }
}
