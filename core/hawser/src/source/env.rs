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

//! Environment-variable-style property source.

use std::collections::HashMap;
use std::env;

use tracing::warn;

use super::PropertySource;
use crate::name::env_adapter::{env_suffix_of, parse_env_segments};
use crate::name::PropertyName;
use crate::origin::Origin;
use crate::property::{Property, PropertyValue};

/// Property source over prefix-scoped, underscore-separated keys.
///
/// Lookup runs in the key direction: the requested name is rendered as an
/// environment key (`server.read-timeout` -> `SERVER_READ_TIMEOUT`) and
/// matched against the stored keys. This is what lets a single dashed element
/// match the underscore form even though splitting the key could never
/// reconstruct the dash.
///
/// Variables with empty values are treated as unset, matching the usual shell
/// convention of `VAR= cmd` meaning "cleared".
#[derive(Debug, Default)]
pub struct EnvPropertySource {
    name: String,
    prefix: String,
    /// Uppercased key suffix (after the prefix) -> (original key, value).
    entries: HashMap<String, (String, String)>,
}

impl EnvPropertySource {
    /// Build a source from explicit `(key, value)` pairs, keeping only keys
    /// that carry `prefix`. Keys with empty segments are skipped with a
    /// warning.
    pub fn new<I, K, V>(name: impl Into<String>, prefix: impl Into<String>, vars: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let name = name.into();
        let prefix = prefix.into();
        let mut entries = HashMap::new();
        for (key, value) in vars {
            let key = key.as_ref();
            let Some(suffix) = key.strip_prefix(prefix.as_str()) else {
                continue;
            };
            let value: String = value.into();
            if value.is_empty() {
                continue;
            }
            if parse_env_segments(suffix).is_none() {
                warn!("skipping malformed environment key '{key}' in source '{name}'");
                continue;
            }
            entries
                .entry(suffix.to_ascii_uppercase())
                .or_insert_with(|| (key.to_string(), value));
        }
        Self {
            name,
            prefix,
            entries,
        }
    }

    /// Convenience constructor over the process environment.
    pub fn from_os_env(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self::new("environment", prefix, env::vars())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn property_for(&self, name: &PropertyName, key: &str, value: &str) -> Property {
        let origin =
            Origin::new(self.name.clone()).with_description(format!("variable '{key}'"));
        Property::new(name.clone(), PropertyValue::Str(value.to_string()), origin)
    }
}

impl PropertySource for EnvPropertySource {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn get(&self, name: &PropertyName) -> Option<Property> {
        let suffix = env_suffix_of(name)?;
        self.entries
            .get(&suffix)
            .map(|(key, value)| self.property_for(name, key, value))
    }

    fn descendants(&self, prefix: &PropertyName) -> Vec<PropertyName> {
        let needle = if prefix.is_empty() {
            String::new()
        } else {
            match env_suffix_of(prefix) {
                Some(suffix) => format!("{suffix}_"),
                None => return Vec::new(),
            }
        };
        let mut names = Vec::new();
        for suffix in self.entries.keys() {
            let Some(rest) = suffix.strip_prefix(needle.as_str()) else {
                continue;
            };
            let Some(elements) = parse_env_segments(rest) else {
                continue;
            };
            let mut name = prefix.clone();
            for element in elements {
                name = name.append(element);
            }
            names.push(name);
        }
        names
    }

    fn included_in_unbound_report(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> PropertyName {
        PropertyName::parse(raw).unwrap()
    }

    fn source(vars: &[(&str, &str)]) -> EnvPropertySource {
        EnvPropertySource::new("env", "APP_", vars.iter().copied())
    }

    #[test]
    fn resolves_canonical_names_against_env_keys() {
        let source = source(&[("APP_SERVER_PORT", "8080")]);
        let found = source.get(&name("server.port")).unwrap();
        assert_eq!(found.value, PropertyValue::from("8080"));
        assert!(found.origin.to_string().contains("APP_SERVER_PORT"));
    }

    #[test]
    fn dashed_elements_match_underscore_keys() {
        let source = source(&[("APP_SERVER_READ_TIMEOUT", "10s")]);
        assert!(source.get(&name("server.read-timeout")).is_some());
        assert!(source.get(&name("server.readTimeout")).is_some());
        assert!(source.get(&name("server.read.timeout")).is_some());
    }

    #[test]
    fn ignores_foreign_empty_and_malformed_keys() {
        let source = source(&[
            ("PATH", "/usr/bin"),
            ("APP_EMPTY", ""),
            ("APP__BAD", "x"),
            ("APP_OK", "1"),
        ]);
        assert_eq!(source.len(), 1);
        assert!(source.get(&name("ok")).is_some());
        assert!(source.get(&name("empty")).is_none());
    }

    #[test]
    fn enumerates_indexed_descendants() {
        let source = source(&[
            ("APP_HOSTS_0_NAME", "a"),
            ("APP_HOSTS_1_NAME", "b"),
            ("APP_OTHER", "x"),
        ]);
        let below = source.descendants(&name("hosts"));
        assert_eq!(below.len(), 2);
        assert!(below.contains(&name("hosts[0].name")));
        assert!(below.contains(&name("hosts[1].name")));
    }

    #[test]
    fn descendants_of_root_cover_everything() {
        let source = source(&[("APP_A", "1"), ("APP_B_C", "2")]);
        let all = source.descendants(&PropertyName::root());
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn quoted_keys_are_not_resolvable() {
        let source = source(&[("APP_LABELS_X", "1")]);
        assert!(source.get(&name("labels[a.b]")).is_none());
    }
}
