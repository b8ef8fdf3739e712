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

//! Observers wrapped around a bind operation.
//!
//! Handlers form an explicit ordered pipeline rather than a decorator chain:
//! each gets the same pre/post hooks, failures may be downgraded to "skip
//! this path", and the final hook runs once when the top-level bind ends.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::Shape;
use crate::error::BindError;
use crate::name::PropertyName;
use crate::origin::Origin;
use crate::property::Property;
use crate::source::PropertySource;

/// A handler's verdict on a failed bind path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Let the error abort the bind.
    Propagate,
    /// Swallow the error; the path binds as `Unbound`.
    Ignore,
}

/// State handed to [`BindHandler::on_finish`] when the top-level bind
/// completes structurally.
pub struct FinishState<'a> {
    /// Whether the top-level target ended up bound.
    pub bound: bool,
    /// Every leaf name consumed by the bind.
    pub consumed: &'a HashSet<PropertyName>,
    /// The sources the bind ran against, in priority order.
    pub sources: &'a [Arc<dyn PropertySource>],
}

/// Hooks observing one bind operation.
///
/// `on_start`/`on_success`/`on_failure` fire per bound node (scalar leaves
/// include the resolved property); `on_finish` fires once for the top-level
/// name after the structural bind, and may veto the whole result.
pub trait BindHandler {
    fn on_start(
        &mut self,
        name: &PropertyName,
        shape: Shape,
        depth: usize,
    ) -> Result<(), BindError> {
        let _ = (name, shape, depth);
        Ok(())
    }

    fn on_success(&mut self, name: &PropertyName, shape: Shape, property: Option<&Property>) {
        let _ = (name, shape, property);
    }

    fn on_failure(&mut self, name: &PropertyName, shape: Shape, error: &BindError) -> OnFailure {
        let _ = (name, shape, error);
        OnFailure::Propagate
    }

    fn on_finish(&mut self, root: &PropertyName, state: &FinishState<'_>) -> Result<(), BindError> {
        let _ = (root, state);
        Ok(())
    }
}

/// The no-op handler used when the caller does not supply one.
#[derive(Debug, Default)]
pub struct DefaultHandler;

impl BindHandler for DefaultHandler {}

/// Ordered pipeline of borrowed handlers.
///
/// Handlers stay owned by the caller, so their state (tracked origins,
/// collected names) remains readable after the bind:
///
/// ```ignore
/// let mut tracker = BoundPropertiesHandler::new();
/// let mut pipeline = HandlerPipeline::new().with(&mut tracker);
/// binder.bind_with_handler::<ServerConfig>("server", Bindable::new(), &mut pipeline)?;
/// let origins = tracker.bound();
/// ```
#[derive(Default)]
pub struct HandlerPipeline<'a> {
    handlers: Vec<&'a mut dyn BindHandler>,
}

impl<'a> HandlerPipeline<'a> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn with(mut self, handler: &'a mut dyn BindHandler) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn push(&mut self, handler: &'a mut dyn BindHandler) {
        self.handlers.push(handler);
    }
}

impl BindHandler for HandlerPipeline<'_> {
    fn on_start(
        &mut self,
        name: &PropertyName,
        shape: Shape,
        depth: usize,
    ) -> Result<(), BindError> {
        for handler in &mut self.handlers {
            handler.on_start(name, shape, depth)?;
        }
        Ok(())
    }

    fn on_success(&mut self, name: &PropertyName, shape: Shape, property: Option<&Property>) {
        for handler in &mut self.handlers {
            handler.on_success(name, shape, property);
        }
    }

    fn on_failure(&mut self, name: &PropertyName, shape: Shape, error: &BindError) -> OnFailure {
        let mut verdict = OnFailure::Propagate;
        for handler in &mut self.handlers {
            if handler.on_failure(name, shape, error) == OnFailure::Ignore {
                verdict = OnFailure::Ignore;
            }
        }
        verdict
    }

    fn on_finish(&mut self, root: &PropertyName, state: &FinishState<'_>) -> Result<(), BindError> {
        let mut first_error = None;
        for handler in &mut self.handlers {
            if let Err(error) = handler.on_finish(root, state) {
                first_error.get_or_insert(error);
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Downgrades conversion and placeholder failures to "skip this path",
/// leaving the affected field unbound instead of aborting the bind.
#[derive(Debug, Default)]
pub struct IgnoreErrorsHandler;

impl BindHandler for IgnoreErrorsHandler {
    fn on_failure(&mut self, _name: &PropertyName, _shape: Shape, error: &BindError) -> OnFailure {
        match error {
            BindError::ConversionFailed { .. }
            | BindError::PlaceholderNotFound { .. }
            | BindError::CircularPlaceholder { .. } => OnFailure::Ignore,
            _ => OnFailure::Propagate,
        }
    }
}

/// Strict leftover check: after the bind, every source-provided name under
/// the bound prefix that no bind path consumed is reported in one aggregated
/// error. Never fails eagerly per name, so unused keys of unrelated prefixes
/// cannot break a narrower bind.
#[derive(Debug, Default)]
pub struct NoUnboundElementsHandler;

impl BindHandler for NoUnboundElementsHandler {
    fn on_finish(&mut self, root: &PropertyName, state: &FinishState<'_>) -> Result<(), BindError> {
        let mut seen = HashSet::new();
        let mut leftovers = Vec::new();
        for source in state.sources {
            if !source.included_in_unbound_report() {
                continue;
            }
            for name in source.descendants(root) {
                if state.consumed.contains(&name) {
                    continue;
                }
                if !seen.insert(name.clone()) {
                    continue;
                }
                leftovers.push(name.to_string());
            }
        }
        if leftovers.is_empty() {
            return Ok(());
        }
        leftovers.sort();
        Err(BindError::UnboundElements { names: leftovers })
    }
}

/// Records the origin of every successfully bound leaf as a side-channel
/// map, keeping provenance out of the bound values themselves.
#[derive(Debug, Default)]
pub struct BoundPropertiesHandler {
    bound: HashMap<PropertyName, Origin>,
}

impl BoundPropertiesHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound name -> origin of the winning source entry.
    pub fn bound(&self) -> &HashMap<PropertyName, Origin> {
        &self.bound
    }

    pub fn origin_of(&self, name: &PropertyName) -> Option<&Origin> {
        self.bound.get(name)
    }
}

impl BindHandler for BoundPropertiesHandler {
    fn on_success(&mut self, name: &PropertyName, _shape: Shape, property: Option<&Property>) {
        if let Some(property) = property {
            self.bound.insert(name.clone(), property.origin.clone());
        }
    }
}
