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

//! Per-invocation bind state threaded through the recursion.

use std::collections::HashSet;
use std::sync::Arc;

use super::handler::{BindHandler, FinishState, OnFailure};
use super::Shape;
use crate::bind::binder::MAX_BIND_DEPTH;
use crate::error::BindError;
use crate::name::PropertyName;
use crate::property::Property;
use crate::source::PropertySource;

/// State owned by a single top-level bind call: the recursion depth, the set
/// of property names consumed so far and the handler pipeline observing the
/// operation. Never shared between binds.
pub struct BindContext<'h> {
    handler: &'h mut dyn BindHandler,
    depth: usize,
    consumed: HashSet<PropertyName>,
}

impl<'h> BindContext<'h> {
    pub(crate) fn new(handler: &'h mut dyn BindHandler) -> Self {
        Self {
            handler,
            depth: 0,
            consumed: HashSet::new(),
        }
    }

    /// Current nesting depth; 1 while the top-level target itself binds.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Leaf names that have been resolved and bound so far.
    pub fn consumed(&self) -> &HashSet<PropertyName> {
        &self.consumed
    }

    /// Record a source name as consumed by the bind. Scalar binds do this
    /// automatically; custom `Bind` implementations that resolve properties
    /// by other means should record what they used so the strict leftover
    /// check stays accurate.
    pub fn record_consumed(&mut self, name: PropertyName) {
        self.consumed.insert(name);
    }

    pub(crate) fn enter(&mut self, name: &PropertyName, shape: Shape) -> Result<(), BindError> {
        self.depth += 1;
        if self.depth > MAX_BIND_DEPTH {
            self.depth -= 1;
            return Err(BindError::DepthExceeded {
                name: name.to_string(),
            });
        }
        if let Err(error) = self.handler.on_start(name, shape, self.depth) {
            self.depth -= 1;
            return Err(error);
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn success(&mut self, name: &PropertyName, shape: Shape, property: Option<&Property>) {
        self.handler.on_success(name, shape, property);
    }

    pub(crate) fn failure(
        &mut self,
        name: &PropertyName,
        shape: Shape,
        error: &BindError,
    ) -> OnFailure {
        self.handler.on_failure(name, shape, error)
    }

    pub(crate) fn finish(
        &mut self,
        root: &PropertyName,
        sources: &[Arc<dyn PropertySource>],
        bound: bool,
    ) -> Result<(), BindError> {
        let state = FinishState {
            bound,
            consumed: &self.consumed,
            sources,
        };
        self.handler.on_finish(root, &state)
    }
}
