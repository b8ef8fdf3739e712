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

//! Translation between OS-style environment keys and structured names.
//!
//! The translation runs in both directions: enumerating a source turns
//! `APP_SERVER_HOSTS_0_NAME` into `server.hosts[0].name`, while a lookup for
//! the canonical `server.read-timeout` builds the candidate key
//! `SERVER_READ_TIMEOUT`. The lookup direction is what lets a dashed element
//! match an underscore-separated variable even though the underscore splits
//! it into two segments.

use super::property_name::canonical_ident;
use super::{Element, PropertyName};

/// Translate an environment-style key into a structured name.
///
/// The `prefix` (e.g. `APP_`) is stripped, the remainder is split on `_`,
/// all-digit segments become numeric indices and everything else becomes a
/// lowercase identifier: `APP_SERVER_HOSTS_0_NAME` -> `server.hosts[0].name`.
///
/// Returns `None` when the key does not carry the prefix or has empty
/// segments (`APP__X`); callers are expected to skip such keys.
pub fn name_from_env_key(prefix: &str, key: &str) -> Option<PropertyName> {
    let rest = key.strip_prefix(prefix)?;
    parse_env_segments(rest).map(PropertyName::from_elements)
}

/// Parse an underscore-separated key remainder into name elements.
pub(crate) fn parse_env_segments(raw: &str) -> Option<Vec<Element>> {
    if raw.is_empty() {
        return None;
    }
    let mut elements = Vec::new();
    for segment in raw.split('_') {
        if segment.is_empty() {
            return None;
        }
        if segment.bytes().all(|b| b.is_ascii_digit()) {
            elements.push(Element::Index(segment.parse().ok()?));
        } else {
            elements.push(Element::Ident(segment.to_ascii_lowercase()));
        }
    }
    Some(elements)
}

/// Render a structured name as an environment key suffix (no source prefix):
/// `server.read-timeout` -> `SERVER_READ_TIMEOUT`, `hosts[0].name` ->
/// `HOSTS_0_NAME`.
///
/// Returns `None` for names an environment variable cannot express
/// (bracket-quoted keys with arbitrary characters).
pub(crate) fn env_suffix_of(name: &PropertyName) -> Option<String> {
    let mut parts = Vec::with_capacity(name.len());
    for element in name.elements() {
        match element {
            Element::Ident(s) => {
                parts.push(canonical_ident(s).replace('-', "_").to_ascii_uppercase());
            }
            Element::Index(i) => parts.push(i.to_string()),
            Element::Key(_) => return None,
        }
    }
    Some(parts.join("_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_plain_keys() {
        let name = name_from_env_key("APP_", "APP_SERVER_PORT").unwrap();
        assert_eq!(name, PropertyName::parse("server.port").unwrap());
    }

    #[test]
    fn digit_segments_become_indices() {
        let name = name_from_env_key("APP_", "APP_HOSTS_1_NAME").unwrap();
        assert_eq!(name, PropertyName::parse("hosts[1].name").unwrap());
        assert_eq!(name.index_at(1), Some(1));
    }

    #[test]
    fn rejects_foreign_and_malformed_keys() {
        assert!(name_from_env_key("APP_", "OTHER_SERVER_PORT").is_none());
        assert!(name_from_env_key("APP_", "APP_").is_none());
        assert!(name_from_env_key("APP_", "APP__PORT").is_none());
    }

    #[test]
    fn renders_canonical_names_as_env_suffixes() {
        let name = PropertyName::parse("server.read-timeout").unwrap();
        assert_eq!(env_suffix_of(&name).unwrap(), "SERVER_READ_TIMEOUT");

        let name = PropertyName::parse("hosts[0].name").unwrap();
        assert_eq!(env_suffix_of(&name).unwrap(), "HOSTS_0_NAME");

        let name = PropertyName::parse("serverPort").unwrap();
        assert_eq!(env_suffix_of(&name).unwrap(), "SERVER_PORT");
    }

    #[test]
    fn quoted_keys_have_no_env_form() {
        let name = PropertyName::parse("labels[my.key]").unwrap();
        assert!(env_suffix_of(&name).is_none());
    }
}
