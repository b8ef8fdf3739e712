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

//! Description of a bind target: optional existing instance, restrictions.

/// Per-call descriptor of what is being bound.
///
/// A fresh `Bindable::new()` asks the binder to construct a new value. An
/// existing instance supplied via [`of`](Bindable::of) is handed to
/// default-mode struct targets as the base to overwrite, so values survive a
/// re-bind of a narrower prefix.
#[derive(Debug)]
pub struct Bindable<T> {
    value: Option<T>,
    no_direct_property: bool,
}

impl<T> Bindable<T> {
    pub fn new() -> Self {
        Self {
            value: None,
            no_direct_property: false,
        }
    }

    /// Bind onto an existing instance.
    pub fn of(value: T) -> Self {
        Self {
            value: Some(value),
            no_direct_property: false,
        }
    }

    /// Forbid resolving this target from a single direct property. Used by
    /// custom `Bind` implementations for types that are both
    /// string-convertible and structured, where a direct value at the prefix
    /// would be ambiguous.
    pub fn without_direct_property(mut self) -> Self {
        self.no_direct_property = true;
        self
    }

    pub fn has_no_direct_property(&self) -> bool {
        self.no_direct_property
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }
}

impl<T> Default for Bindable<T> {
    fn default() -> Self {
        Self::new()
    }
}
