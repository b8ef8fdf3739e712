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

//! In-memory map-backed property source.

use std::collections::HashMap;

use serde_json::Value as JsonValue;
use tracing::warn;

use super::PropertySource;
use crate::name::PropertyName;
use crate::origin::Origin;
use crate::property::{Property, PropertyValue};

/// Property source backed by an in-memory map of parsed names.
///
/// Names hash through their uniform form, so a lookup for `server.port`
/// finds an entry stored as `server.PORT` or `serverPort` in O(1).
#[derive(Debug, Default)]
pub struct MapPropertySource {
    name: String,
    entries: HashMap<PropertyName, Property>,
}

impl MapPropertySource {
    /// Build a source from flat `(key, value)` pairs, parsing each key as a
    /// dotted/bracketed name. Malformed keys are skipped with a warning;
    /// when two keys collapse to the same relaxed name the first one wins.
    pub fn new<K, V, I>(name: impl Into<String>, pairs: I) -> Self
    where
        K: AsRef<str>,
        V: Into<PropertyValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let name = name.into();
        let mut source = Self {
            name: name.clone(),
            entries: HashMap::new(),
        };
        for (key, value) in pairs {
            let key = key.as_ref();
            let Some(parsed) = PropertyName::parse_lenient(key) else {
                warn!("skipping malformed property key '{key}' in source '{name}'");
                continue;
            };
            let origin = Origin::new(name.clone()).with_description(format!("key '{key}'"));
            source.insert(parsed, value.into(), origin);
        }
        source
    }

    /// Build a source from a nested JSON tree. Objects become dotted
    /// segments, arrays become numeric indices and leaves keep their type.
    /// Object keys containing `.` or `[` are treated as bracket-quoted map
    /// keys. Empty arrays and objects are recorded as an empty-string leaf so
    /// an explicitly empty collection stays distinguishable from an absent
    /// one.
    pub fn from_json(name: impl Into<String>, tree: &JsonValue) -> Self {
        let name = name.into();
        let mut source = Self {
            name,
            entries: HashMap::new(),
        };
        source.flatten(&PropertyName::root(), tree);
        source
    }

    fn flatten(&mut self, at: &PropertyName, value: &JsonValue) {
        match value {
            JsonValue::Null => {}
            JsonValue::Object(fields) if fields.is_empty() => self.insert_leaf(at, "".into()),
            JsonValue::Array(items) if items.is_empty() => self.insert_leaf(at, "".into()),
            JsonValue::Object(fields) => {
                for (key, child) in fields {
                    let child_name = if key.contains('.') || key.contains('[') {
                        at.append_key(key)
                    } else {
                        at.append_ident(key)
                    };
                    self.flatten(&child_name, child);
                }
            }
            JsonValue::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    self.flatten(&at.append_index(index), child);
                }
            }
            JsonValue::Bool(b) => self.insert_leaf(at, (*b).into()),
            JsonValue::Number(n) => {
                let value = if let Some(i) = n.as_i64() {
                    PropertyValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    PropertyValue::Uint(u)
                } else {
                    PropertyValue::Float(n.as_f64().unwrap_or(f64::NAN))
                };
                self.insert_leaf(at, value);
            }
            JsonValue::String(s) => self.insert_leaf(at, s.as_str().into()),
        }
    }

    fn insert_leaf(&mut self, at: &PropertyName, value: PropertyValue) {
        let origin = Origin::new(self.name.clone()).with_description(format!("path '{at}'"));
        self.insert(at.clone(), value, origin);
    }

    fn insert(&mut self, name: PropertyName, value: PropertyValue, origin: Origin) {
        if self.entries.contains_key(&name) {
            warn!(
                "duplicate relaxed property name '{name}' in source '{}', keeping the first value",
                self.name
            );
            return;
        }
        self.entries
            .insert(name.clone(), Property::new(name, value, origin));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PropertySource for MapPropertySource {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn get(&self, name: &PropertyName) -> Option<Property> {
        self.entries.get(name).cloned()
    }

    fn descendants(&self, prefix: &PropertyName) -> Vec<PropertyName> {
        self.entries
            .keys()
            .filter(|candidate| prefix.is_ancestor_of(candidate))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn name(raw: &str) -> PropertyName {
        PropertyName::parse(raw).unwrap()
    }

    #[test]
    fn resolves_relaxed_spellings() {
        let source = MapPropertySource::new("test", [("server.readTimeout", "10s")]);
        let found = source.get(&name("server.read-timeout")).unwrap();
        assert_eq!(found.value, PropertyValue::from("10s"));
        assert_eq!(found.origin.source(), "test");
    }

    #[test]
    fn skips_malformed_keys() {
        let source = MapPropertySource::new("test", [("a..b", "x"), ("ok", "y")]);
        assert_eq!(source.len(), 1);
        assert!(source.get(&name("ok")).is_some());
    }

    #[test]
    fn first_wins_on_duplicate_relaxed_names() {
        let source = MapPropertySource::new("test", [("max-size", "1"), ("maxSize", "2")]);
        assert_eq!(
            source.get(&name("max-size")).unwrap().value,
            PropertyValue::from("1")
        );
    }

    #[test]
    fn flattens_json_trees() {
        let source = MapPropertySource::from_json(
            "json",
            &json!({
                "server": {"port": 8080, "hosts": ["a", "b"]},
                "labels": {"my.key": true}
            }),
        );
        assert_eq!(
            source.get(&name("server.port")).unwrap().value,
            PropertyValue::Int(8080)
        );
        assert_eq!(
            source.get(&name("server.hosts[1]")).unwrap().value,
            PropertyValue::from("b")
        );
        assert_eq!(
            source.get(&name("labels[my.key]")).unwrap().value,
            PropertyValue::Bool(true)
        );
    }

    #[test]
    fn empty_json_collections_become_empty_leaves() {
        let source = MapPropertySource::from_json("json", &json!({"list": [], "map": {}}));
        assert_eq!(
            source.get(&name("list")).unwrap().value,
            PropertyValue::from("")
        );
        assert_eq!(
            source.get(&name("map")).unwrap().value,
            PropertyValue::from("")
        );
    }

    #[test]
    fn null_leaves_are_absent() {
        let source = MapPropertySource::from_json("json", &json!({"gone": null}));
        assert!(source.get(&name("gone")).is_none());
        assert!(source.is_empty());
    }

    #[test]
    fn descendants_are_strict() {
        let source = MapPropertySource::new(
            "test",
            [("list[0]", "a"), ("list[1]", "b"), ("other", "c")],
        );
        let below = source.descendants(&name("list"));
        assert_eq!(below.len(), 2);
        assert!(below.contains(&name("list[0]")));
        assert!(!below.contains(&name("list")));
    }
}
