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

//! The binding engine: walks a target type's shape, resolves names across
//! the source stack, applies placeholder resolution and conversion, and
//! reports the outcome.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace};

use super::context::BindContext;
use super::handler::{BindHandler, DefaultHandler, OnFailure};
use super::{Bind, Bindable, BindResult, Shape};
use crate::convert::{type_label, FromProperty};
use crate::error::BindError;
use crate::name::{Element, PropertyName};
use crate::placeholder::{PlaceholderMode, PlaceholderResolver};
use crate::property::{Property, PropertyValue};
use crate::source::PropertySource;
use crate::validate::{Validatable, ValidationError, Validator, Violations};

/// Maximum nesting depth of a single bind operation.
pub const MAX_BIND_DEPTH: usize = 64;

/// Binds configuration prefixes onto typed values from an ordered stack of
/// property sources.
///
/// The binder is cheap to share: sources are reference-counted and read-only,
/// and each `bind` call owns its own context, so independent binds may run
/// concurrently. Nothing is cached between calls.
pub struct Binder {
    sources: Vec<Arc<dyn PropertySource>>,
    placeholder_mode: PlaceholderMode,
}

impl Binder {
    /// Binder over sources in priority order (first wins).
    pub fn new(sources: Vec<Arc<dyn PropertySource>>) -> Self {
        Self {
            sources,
            placeholder_mode: PlaceholderMode::default(),
        }
    }

    pub fn builder() -> BinderBuilder {
        BinderBuilder::new()
    }

    pub fn sources(&self) -> &[Arc<dyn PropertySource>] {
        &self.sources
    }

    /// Bind `prefix` to a new `T`.
    pub fn bind<T: Bind>(&self, prefix: &str) -> Result<BindResult<T>, BindError> {
        self.bind_bindable(prefix, Bindable::new())
    }

    /// Bind `prefix` against an explicit target descriptor.
    pub fn bind_bindable<T: Bind>(
        &self,
        prefix: &str,
        target: Bindable<T>,
    ) -> Result<BindResult<T>, BindError> {
        let mut handler = DefaultHandler;
        self.bind_with_handler(prefix, target, &mut handler)
    }

    /// Bind `prefix` with a caller-supplied handler (or pipeline of them)
    /// observing the operation.
    pub fn bind_with_handler<T: Bind>(
        &self,
        prefix: &str,
        target: Bindable<T>,
        handler: &mut dyn BindHandler,
    ) -> Result<BindResult<T>, BindError> {
        let name = PropertyName::parse(prefix)?;
        debug!("binding prefix '{name}' as {}", T::SHAPE);
        let mut ctx = BindContext::new(handler);
        let result = self.bind_value(&name, &mut ctx, target)?;
        ctx.finish(&name, &self.sources, result.is_bound())?;
        Ok(result)
    }

    /// Bind `prefix`, falling back to `T::default()` when nothing is bound.
    pub fn bind_or_default<T: Bind + Default>(&self, prefix: &str) -> Result<T, BindError> {
        Ok(self.bind::<T>(prefix)?.unwrap_or_default())
    }

    /// Bind `prefix` and run the target's own validation, aggregating every
    /// violation into one error.
    pub fn bind_validated<T: Bind + Validatable>(
        &self,
        prefix: &str,
    ) -> Result<BindResult<T>, BindError> {
        let result = self.bind::<T>(prefix)?;
        if let BindResult::Bound(value) = &result {
            let mut violations = Violations::new();
            value.validate(&mut violations);
            if !violations.is_empty() {
                return Err(ValidationError::new(violations).into());
            }
        }
        Ok(result)
    }

    /// Bind `prefix` and run external validators over the bound value. All
    /// validators run even after violations, so the report is complete.
    pub fn bind_validated_with<T: Bind>(
        &self,
        prefix: &str,
        validators: &[&dyn Validator<T>],
    ) -> Result<BindResult<T>, BindError> {
        let result = self.bind::<T>(prefix)?;
        if let BindResult::Bound(value) = &result {
            let mut violations = Violations::new();
            for validator in validators {
                validator.validate(value, &mut violations);
            }
            if !violations.is_empty() {
                return Err(ValidationError::new(violations).into());
            }
        }
        Ok(result)
    }

    /// Recursion entry used by `Bind` implementations to bind a nested name.
    /// Fires the handler hooks around the nested bind and applies their
    /// failure verdicts.
    pub fn bind_value<T: Bind>(
        &self,
        name: &PropertyName,
        ctx: &mut BindContext<'_>,
        target: Bindable<T>,
    ) -> Result<BindResult<T>, BindError> {
        if let Err(error) = ctx.enter(name, T::SHAPE) {
            return match ctx.failure(name, T::SHAPE, &error) {
                OnFailure::Ignore => Ok(BindResult::Unbound),
                OnFailure::Propagate => Err(error),
            };
        }
        let outcome = match T::bind(self, name, ctx, target) {
            Ok(result) => {
                if result.is_bound() && T::SHAPE != Shape::Scalar {
                    ctx.success(name, T::SHAPE, None);
                }
                Ok(result)
            }
            Err(error) => match ctx.failure(name, T::SHAPE, &error) {
                OnFailure::Ignore => {
                    debug!("ignoring bind failure at '{name}': {error}");
                    Ok(BindResult::Unbound)
                }
                OnFailure::Propagate => Err(error),
            },
        };
        ctx.leave();
        outcome
    }

    /// Resolve a single direct property and convert it. This is the leaf
    /// step every scalar `Bind` implementation delegates to.
    pub fn bind_leaf<T: FromProperty>(
        &self,
        name: &PropertyName,
        ctx: &mut BindContext<'_>,
    ) -> Result<BindResult<T>, BindError> {
        let Some(property) = self.find_property(name) else {
            return Ok(BindResult::Unbound);
        };
        let value = self.resolve_placeholders(name, &property.value)?;
        match T::from_property(&value) {
            Ok(converted) => {
                ctx.record_consumed(name.clone());
                ctx.success(name, Shape::Scalar, Some(&property));
                Ok(BindResult::Bound(converted))
            }
            Err(error) => Err(BindError::ConversionFailed {
                name: name.to_string(),
                value: value.to_string(),
                target: type_label::<T>(),
                reason: error.reason().to_string(),
                origin: Some(property.origin),
            }),
        }
    }

    /// First matching property across the stack, in priority order.
    pub fn find_property(&self, name: &PropertyName) -> Option<Property> {
        for source in &self.sources {
            if let Some(property) = source.get(name) {
                trace!("resolved '{name}' from {}", property.origin);
                return Some(property);
            }
        }
        None
    }

    /// Resolve placeholders inside string values; other values pass through.
    pub(crate) fn resolve_placeholders(
        &self,
        name: &PropertyName,
        value: &PropertyValue,
    ) -> Result<PropertyValue, BindError> {
        match value {
            PropertyValue::Str(raw) => {
                let resolver = PlaceholderResolver::new(&self.sources, self.placeholder_mode);
                Ok(PropertyValue::Str(resolver.resolve(name, raw)?))
            }
            other => Ok(other.clone()),
        }
    }

    /// Union of numeric indices present directly under `prefix` across all
    /// sources, ascending. Sparse sets are allowed; the sequence binder
    /// compacts them in index order.
    pub(crate) fn indexed_children(&self, prefix: &PropertyName) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .sources
            .iter()
            .flat_map(|source| source.descendants(prefix))
            .filter_map(|name| name.index_at(prefix.len()))
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Immediate child elements under `prefix` across all sources, deduped by
    /// relaxed identity with the earliest source's spelling winning.
    pub(crate) fn child_keys(&self, prefix: &PropertyName) -> Vec<Element> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut children = Vec::new();
        for source in &self.sources {
            let mut names = source.descendants(prefix);
            names.sort_by_key(|name| name.to_string());
            for name in names {
                let Some(element) = name.element(prefix.len()) else {
                    continue;
                };
                if seen.insert(element.uniform()) {
                    children.push(element.clone());
                }
            }
        }
        children
    }

}

/// Builder for a [`Binder`].
#[derive(Default)]
pub struct BinderBuilder {
    sources: Vec<Arc<dyn PropertySource>>,
    placeholder_mode: PlaceholderMode,
}

impl BinderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source; earlier sources take priority.
    pub fn source(mut self, source: impl PropertySource + 'static) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    /// Append an already shared source.
    pub fn shared_source(mut self, source: Arc<dyn PropertySource>) -> Self {
        self.sources.push(source);
        self
    }

    /// How unresolvable placeholders are treated; strict by default.
    pub fn placeholder_mode(mut self, mode: PlaceholderMode) -> Self {
        self.placeholder_mode = mode;
        self
    }

    pub fn build(self) -> Binder {
        Binder {
            sources: self.sources,
            placeholder_mode: self.placeholder_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MapPropertySource;

    fn name(raw: &str) -> PropertyName {
        PropertyName::parse(raw).unwrap()
    }

    fn two_source_binder(first: &[(&str, &str)], second: &[(&str, &str)]) -> Binder {
        Binder::builder()
            .source(MapPropertySource::new("first", first.iter().copied()))
            .source(MapPropertySource::new("second", second.iter().copied()))
            .build()
    }

    #[test]
    fn find_property_prefers_earlier_sources() {
        let binder = two_source_binder(&[("x", "1")], &[("x", "2")]);
        let property = binder.find_property(&name("x")).unwrap();
        assert_eq!(property.origin.source(), "first");
    }

    #[test]
    fn indexed_children_union_ascending() {
        let binder = two_source_binder(
            &[("list[2]", "c"), ("list[0]", "a")],
            &[("list[1]", "b"), ("list[2]", "other")],
        );
        assert_eq!(binder.indexed_children(&name("list")), vec![0, 1, 2]);
    }

    #[test]
    fn child_keys_dedup_by_relaxed_identity() {
        let binder = two_source_binder(
            &[("m.read-limit", "1")],
            &[("m.readLimit", "2"), ("m.other", "3")],
        );
        let keys = binder.child_keys(&name("m"));
        assert_eq!(keys.len(), 2);
        // The earlier source's spelling wins for the shared key.
        assert_eq!(keys[0].key_text(), "read-limit");
    }

    #[test]
    fn bind_or_default_falls_back_when_absent() {
        let binder = two_source_binder(&[], &[]);
        assert_eq!(binder.bind_or_default::<u32>("missing").unwrap(), 0);
    }
}
