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

//! Parsed property names in dot/bracket form (`server.hosts[0]`, `map[my.key]`).
//!
//! Identifier elements compare with relaxed semantics: `foo-bar`, `foo_bar`,
//! `fooBar` and `FOO_BAR` are all the same element. Equality and hashing go
//! through a *uniform* form (lowercase, alphanumeric only), so names coming
//! from environment variables, files and in-memory maps all meet in the
//! middle without any per-source canonicalization.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::BindError;

/// A single element of a [`PropertyName`].
#[derive(Debug, Clone)]
pub enum Element {
    /// An identifier segment (`server`, `max-size`). Stored as written in the
    /// originating source; compared via its uniform form.
    Ident(String),
    /// A numeric bracket index (`hosts[0]`).
    Index(usize),
    /// A bracket-quoted map key (`map[my.key]`). Compared verbatim, dots and
    /// case preserved.
    Key(String),
}

impl Element {
    /// The form used for equality and hashing. Identifiers fold case and drop
    /// `-`/`_`; indices render as digits; quoted keys stay verbatim.
    pub(crate) fn uniform(&self) -> String {
        match self {
            Element::Ident(s) => uniform_ident(s),
            Element::Index(i) => i.to_string(),
            Element::Key(k) => k.clone(),
        }
    }

    /// Numeric value of this element, treating all-digit identifiers as
    /// indices so that `list.0.name` and `list[0].name` address the same slot.
    pub(crate) fn as_index(&self) -> Option<usize> {
        match self {
            Element::Index(i) => Some(*i),
            Element::Ident(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                s.parse().ok()
            }
            _ => None,
        }
    }

    /// The element text a map binder should use as the key.
    pub(crate) fn key_text(&self) -> String {
        match self {
            Element::Ident(s) => s.clone(),
            Element::Index(i) => i.to_string(),
            Element::Key(k) => k.clone(),
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.uniform() == other.uniform()
    }
}

impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uniform().hash(state);
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Ident(s) => f.write_str(&canonical_ident(s)),
            Element::Index(i) => write!(f, "[{i}]"),
            Element::Key(k) => write!(f, "[{k}]"),
        }
    }
}

/// Fold an identifier to its uniform comparison form: lowercase, `-` and `_`
/// removed. CamelCase humps fold flat as a side effect of lowercasing, which
/// is exactly the relaxed contract (`maxSize` == `max-size` == `MAX_SIZE`).
pub(crate) fn uniform_ident(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Canonical display form of an identifier: lowercase with dashes, camelCase
/// boundaries turned into dashes (`maxSize` -> `max-size`).
pub(crate) fn canonical_ident(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_lower = false;
    for c in raw.chars() {
        if c == '_' {
            out.push('-');
            prev_lower = false;
        } else if c.is_ascii_uppercase() {
            if prev_lower {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

/// An immutable, structured configuration property name.
///
/// Parsed from the canonical dotted form with optional bracket indices and
/// bracket-quoted keys: `server.hosts[0].name`, `labels[my.dotted.key]`.
/// The empty name addresses the root of the property space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PropertyName {
    elements: Vec<Element>,
}

impl PropertyName {
    /// The root (empty) name.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse the canonical dotted/bracketed form, failing on malformed input
    /// (empty segments, unbalanced or empty brackets, stray characters).
    pub fn parse(raw: &str) -> Result<Self, BindError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::root());
        }
        let mut elements = Vec::new();
        let mut chars = raw.char_indices().peekable();
        let mut pending = String::new();
        let mut element_open = false;

        let invalid = |reason: &str| BindError::InvalidName {
            name: raw.to_string(),
            reason: reason.to_string(),
        };

        while let Some((_, c)) = chars.next() {
            match c {
                '.' => {
                    if pending.is_empty() && !element_open {
                        return Err(invalid("empty element"));
                    }
                    if !pending.is_empty() {
                        elements.push(Element::Ident(std::mem::take(&mut pending)));
                    }
                    element_open = false;
                    if chars.peek().is_none() {
                        return Err(invalid("trailing '.'"));
                    }
                }
                '[' => {
                    if !pending.is_empty() {
                        elements.push(Element::Ident(std::mem::take(&mut pending)));
                    } else if !element_open {
                        return Err(invalid("index without a preceding element"));
                    }
                    let mut inner = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == ']' {
                            closed = true;
                            break;
                        }
                        inner.push(c);
                    }
                    if !closed {
                        return Err(invalid("unbalanced '['"));
                    }
                    if inner.is_empty() {
                        return Err(invalid("empty '[]' index"));
                    }
                    if inner.bytes().all(|b| b.is_ascii_digit()) {
                        let index = inner
                            .parse()
                            .map_err(|_| invalid("numeric index out of range"))?;
                        elements.push(Element::Index(index));
                    } else {
                        elements.push(Element::Key(inner));
                    }
                    element_open = true;
                }
                ']' => return Err(invalid("unbalanced ']'")),
                c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => {
                    if element_open {
                        return Err(invalid("characters after ']'"));
                    }
                    pending.push(c);
                }
                c => {
                    return Err(invalid(&format!("invalid character '{c}'")));
                }
            }
        }
        if !pending.is_empty() {
            elements.push(Element::Ident(pending));
        }
        Ok(Self { elements })
    }

    /// Permissive variant of [`parse`](Self::parse) used for source-supplied
    /// keys: malformed names yield `None` instead of an error, so one bad key
    /// cannot poison an otherwise valid source.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        Self::parse(raw).ok()
    }

    pub fn from_elements(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn last(&self) -> Option<&Element> {
        self.elements.last()
    }

    /// Numeric index at the given position, accepting both `[n]` and a bare
    /// all-digit segment.
    pub fn index_at(&self, position: usize) -> Option<usize> {
        self.elements.get(position).and_then(Element::as_index)
    }

    /// True when every element of `self` prefixes `other` and `other` is
    /// strictly longer.
    pub fn is_ancestor_of(&self, other: &PropertyName) -> bool {
        other.elements.len() > self.elements.len()
            && self
                .elements
                .iter()
                .zip(other.elements.iter())
                .all(|(a, b)| a == b)
    }

    pub fn append(&self, element: Element) -> PropertyName {
        let mut elements = self.elements.clone();
        elements.push(element);
        PropertyName { elements }
    }

    pub fn append_ident(&self, ident: &str) -> PropertyName {
        self.append(Element::Ident(ident.to_string()))
    }

    pub fn append_index(&self, index: usize) -> PropertyName {
        self.append(Element::Index(index))
    }

    pub fn append_key(&self, key: &str) -> PropertyName {
        self.append(Element::Key(key.to_string()))
    }

    /// The first `size` elements as a new name.
    pub fn chop(&self, size: usize) -> PropertyName {
        PropertyName {
            elements: self.elements[..size.min(self.elements.len())].to_vec(),
        }
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for element in &self.elements {
            match element {
                Element::Ident(_) => {
                    if !first {
                        f.write_str(".")?;
                    }
                    write!(f, "{element}")?;
                }
                _ => write!(f, "{element}")?,
            }
            first = false;
        }
        Ok(())
    }
}

impl FromStr for PropertyName {
    type Err = BindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
