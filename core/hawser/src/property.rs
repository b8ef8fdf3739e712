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

//! Resolved property values and the (name, value, origin) triple.

use std::fmt;

use crate::name::PropertyName;
use crate::origin::Origin;

/// A raw value held by a property source before conversion.
///
/// String-backed sources (environment variables, flat key/value maps) always
/// produce [`Str`](PropertyValue::Str); tree-backed sources preserve the leaf
/// type of the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Str(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Label used in conversion failure messages.
    pub fn type_label(&self) -> &'static str {
        match self {
            PropertyValue::Str(_) => "string",
            PropertyValue::Bool(_) => "boolean",
            PropertyValue::Int(_) => "integer",
            PropertyValue::Uint(_) => "integer",
            PropertyValue::Float(_) => "float",
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Str(s) => f.write_str(s),
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Int(i) => write!(f, "{i}"),
            PropertyValue::Uint(u) => write!(f, "{u}"),
            PropertyValue::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Str(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<u64> for PropertyValue {
    fn from(value: u64) -> Self {
        PropertyValue::Uint(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

/// A property resolved from a source: name, raw value and provenance.
#[derive(Debug, Clone)]
pub struct Property {
    pub name: PropertyName,
    pub value: PropertyValue,
    pub origin: Origin,
}

impl Property {
    pub fn new(name: PropertyName, value: PropertyValue, origin: Origin) -> Self {
        Self {
            name,
            value,
            origin,
        }
    }
}

/// Origin is provenance, not identity: two properties are equal when their
/// name and value are, regardless of which source produced them.
impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_origin() {
        let name = PropertyName::parse("server.port").unwrap();
        let a = Property::new(name.clone(), PropertyValue::from(8080_u64), Origin::new("a"));
        let b = Property::new(name, PropertyValue::from(8080_u64), Origin::new("b"));
        assert_eq!(a, b);
    }

    #[test]
    fn equality_respects_value() {
        let name = PropertyName::parse("server.port").unwrap();
        let a = Property::new(name.clone(), PropertyValue::from(1_u64), Origin::new("a"));
        let b = Property::new(name, PropertyValue::from(2_u64), Origin::new("a"));
        assert_ne!(a, b);
    }
}
