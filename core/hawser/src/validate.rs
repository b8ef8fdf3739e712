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

//! Post-bind semantic validation.
//!
//! Validation runs only after a structurally successful bind, and every
//! validator reports into one shared collector so the caller sees the whole
//! picture at once instead of fixing violations one bind at a time.

use std::fmt;

use thiserror::Error;

/// One constraint violation: the offending property (or an empty name for
/// object-level violations) and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    name: String,
    message: String,
}

impl Violation {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.name, self.message)
        }
    }
}

/// Ordered collector of violations shared by every validator in a run.
#[derive(Debug, Clone, Default)]
pub struct Violations {
    items: Vec<Violation>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a field-level violation.
    pub fn add(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.items.push(Violation {
            name: name.into(),
            message: message.into(),
        });
    }

    /// Record an object-level violation not tied to a single property.
    pub fn add_object(&mut self, message: impl Into<String>) {
        self.add("", message);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.items
    }
}

/// Aggregated validation failure carrying every violation from every
/// validator that ran.
#[derive(Debug, Clone, Error)]
#[error("configuration validation failed: {}", format_violations(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(violations: Violations) -> Self {
        Self {
            violations: violations.into_vec(),
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A configuration type that can check its own semantic constraints after
/// binding.
pub trait Validatable {
    fn validate(&self, violations: &mut Violations);
}

/// An external check over a bound value. Closures of the right signature
/// work directly:
///
/// ```ignore
/// let port_is_open = |config: &ServerConfig, violations: &mut Violations| {
///     if config.port == 0 {
///         violations.add("server.port", "must not be zero");
///     }
/// };
/// binder.bind_validated_with::<ServerConfig>("server", &[&port_is_open])?;
/// ```
pub trait Validator<T> {
    fn validate(&self, target: &T, violations: &mut Violations);
}

impl<T, F> Validator<T> for F
where
    F: Fn(&T, &mut Violations),
{
    fn validate(&self, target: &T, violations: &mut Violations) {
        self(target, violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_violations_in_order() {
        let mut violations = Violations::new();
        violations.add("a.b", "too small");
        violations.add_object("inconsistent");
        assert_eq!(violations.len(), 2);
        let error = ValidationError::new(violations);
        let rendered = error.to_string();
        assert!(rendered.contains("a.b: too small"));
        assert!(rendered.contains("inconsistent"));
    }

    #[test]
    fn closures_are_validators() {
        let check = |value: &u32, violations: &mut Violations| {
            if *value > 10 {
                violations.add("value", "too large");
            }
        };
        let mut violations = Violations::new();
        Validator::validate(&check, &42, &mut violations);
        assert_eq!(violations.len(), 1);
    }
}
