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

//! Bind implementations for collections, maps and transparent containers.
//!
//! Sequences prefer indexed names (`prefix[0]`, `prefix[1]`, unioned across
//! all sources and bound in index order) and fall back to splitting a single
//! comma-separated value. Maps discover their immediate child keys across
//! sources with the earliest source winning per key.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;

use super::context::BindContext;
use super::{Bind, Bindable, BindResult, Binder, Shape};
use crate::convert::{type_label, FromProperty};
use crate::error::BindError;
use crate::name::PropertyName;
use crate::property::{Property, PropertyValue};

/// Bind the indexed elements under `name`, in ascending index order.
fn bind_indexed<T: Bind>(
    binder: &Binder,
    name: &PropertyName,
    ctx: &mut BindContext<'_>,
    indices: &[usize],
) -> Result<Vec<T>, BindError> {
    let mut items = Vec::with_capacity(indices.len());
    for index in indices {
        let child = name.append_index(*index);
        if let BindResult::Bound(item) = binder.bind_value::<T>(&child, ctx, Bindable::new())? {
            items.push(item);
        }
    }
    Ok(items)
}

/// Split a direct scalar value into sequence elements. An empty string is an
/// explicitly empty sequence; a non-string scalar is a single element.
fn bind_scalar_sequence<T: Bind>(
    binder: &Binder,
    name: &PropertyName,
    ctx: &mut BindContext<'_>,
    property: Property,
) -> Result<Vec<T>, BindError> {
    let value = binder.resolve_placeholders(name, &property.value)?;
    let conversion_failed = |raw: &PropertyValue, reason: String| BindError::ConversionFailed {
        name: name.to_string(),
        value: raw.to_string(),
        target: type_label::<Vec<T>>(),
        reason,
        origin: Some(property.origin.clone()),
    };

    let items = match &value {
        PropertyValue::Str(s) if s.trim().is_empty() => Vec::new(),
        PropertyValue::Str(s) => {
            let mut items = Vec::new();
            for part in s.split(',') {
                let element = PropertyValue::Str(part.trim().to_string());
                let converted = T::from_scalar(&element).ok_or_else(|| {
                    conversion_failed(
                        &value,
                        "comma-separated values cannot populate nested elements".to_string(),
                    )
                })?;
                items.push(
                    converted.map_err(|e| conversion_failed(&element, e.reason().to_string()))?,
                );
            }
            items
        }
        scalar => {
            let converted = T::from_scalar(scalar).ok_or_else(|| {
                conversion_failed(
                    scalar,
                    "a single scalar cannot populate nested elements".to_string(),
                )
            })?;
            vec![converted.map_err(|e| conversion_failed(scalar, e.reason().to_string()))?]
        }
    };
    ctx.record_consumed(name.clone());
    ctx.success(name, Shape::Sequence, Some(&property));
    Ok(items)
}

fn bind_sequence<T: Bind>(
    binder: &Binder,
    name: &PropertyName,
    ctx: &mut BindContext<'_>,
) -> Result<BindResult<Vec<T>>, BindError> {
    let indices = binder.indexed_children(name);
    if !indices.is_empty() {
        return Ok(BindResult::Bound(bind_indexed(binder, name, ctx, &indices)?));
    }
    match binder.find_property(name) {
        Some(property) => Ok(BindResult::Bound(bind_scalar_sequence(
            binder, name, ctx, property,
        )?)),
        None => Ok(BindResult::Unbound),
    }
}

impl<T: Bind> Bind for Vec<T> {
    const SHAPE: Shape = Shape::Sequence;

    fn bind(
        binder: &Binder,
        name: &PropertyName,
        ctx: &mut BindContext<'_>,
        _target: Bindable<Self>,
    ) -> Result<BindResult<Self>, BindError> {
        bind_sequence(binder, name, ctx)
    }
}

impl<T: Bind + Eq + Hash> Bind for HashSet<T> {
    const SHAPE: Shape = Shape::Sequence;

    fn bind(
        binder: &Binder,
        name: &PropertyName,
        ctx: &mut BindContext<'_>,
        _target: Bindable<Self>,
    ) -> Result<BindResult<Self>, BindError> {
        Ok(bind_sequence::<T>(binder, name, ctx)?.map(|items| items.into_iter().collect()))
    }
}

impl<T: Bind + Ord> Bind for BTreeSet<T> {
    const SHAPE: Shape = Shape::Sequence;

    fn bind(
        binder: &Binder,
        name: &PropertyName,
        ctx: &mut BindContext<'_>,
        _target: Bindable<Self>,
    ) -> Result<BindResult<Self>, BindError> {
        Ok(bind_sequence::<T>(binder, name, ctx)?.map(|items| items.into_iter().collect()))
    }
}

impl<T: Bind, const N: usize> Bind for [T; N] {
    const SHAPE: Shape = Shape::Sequence;

    fn bind(
        binder: &Binder,
        name: &PropertyName,
        ctx: &mut BindContext<'_>,
        _target: Bindable<Self>,
    ) -> Result<BindResult<Self>, BindError> {
        match bind_sequence::<T>(binder, name, ctx)? {
            BindResult::Bound(items) => {
                let found = items.len();
                let array: [T; N] = items.try_into().map_err(|_| BindError::ConversionFailed {
                    name: name.to_string(),
                    value: format!("{found} elements"),
                    target: type_label::<[T; N]>(),
                    reason: format!("expected exactly {N} elements, got {found}"),
                    origin: None,
                })?;
                Ok(BindResult::Bound(array))
            }
            BindResult::Unbound => Ok(BindResult::Unbound),
        }
    }
}

fn bind_map<K, V, M>(
    binder: &Binder,
    name: &PropertyName,
    ctx: &mut BindContext<'_>,
    mut insert: impl FnMut(&mut M, K, V),
    empty: impl FnOnce() -> M,
) -> Result<BindResult<M>, BindError>
where
    K: FromProperty,
    V: Bind,
{
    let children = binder.child_keys(name);
    if children.is_empty() {
        // A direct empty value is an explicitly empty map; any other direct
        // value at a map name is a type error.
        return match binder.find_property(name) {
            Some(property) => {
                let value = binder.resolve_placeholders(name, &property.value)?;
                match value.as_str() {
                    Some(s) if s.trim().is_empty() => {
                        ctx.record_consumed(name.clone());
                        ctx.success(name, Shape::Map, Some(&property));
                        Ok(BindResult::Bound(empty()))
                    }
                    _ => Err(BindError::ConversionFailed {
                        name: name.to_string(),
                        value: value.to_string(),
                        target: type_label::<M>(),
                        reason: "a scalar value cannot populate a map".to_string(),
                        origin: Some(property.origin),
                    }),
                }
            }
            None => Ok(BindResult::Unbound),
        };
    }

    let mut map = empty();
    for element in children {
        let key_text = element.key_text();
        let child = name.append(element);
        if let BindResult::Bound(value) = binder.bind_value::<V>(&child, ctx, Bindable::new())? {
            let key = K::from_property(&PropertyValue::Str(key_text.clone())).map_err(|e| {
                BindError::ConversionFailed {
                    name: child.to_string(),
                    value: key_text,
                    target: type_label::<K>(),
                    reason: e.reason().to_string(),
                    origin: None,
                }
            })?;
            insert(&mut map, key, value);
        }
    }
    Ok(BindResult::Bound(map))
}

impl<K, V> Bind for HashMap<K, V>
where
    K: FromProperty + Eq + Hash,
    V: Bind,
{
    const SHAPE: Shape = Shape::Map;

    fn bind(
        binder: &Binder,
        name: &PropertyName,
        ctx: &mut BindContext<'_>,
        _target: Bindable<Self>,
    ) -> Result<BindResult<Self>, BindError> {
        bind_map(
            binder,
            name,
            ctx,
            |map, k, v| {
                map.insert(k, v);
            },
            HashMap::new,
        )
    }
}

impl<K, V> Bind for BTreeMap<K, V>
where
    K: FromProperty + Ord,
    V: Bind,
{
    const SHAPE: Shape = Shape::Map;

    fn bind(
        binder: &Binder,
        name: &PropertyName,
        ctx: &mut BindContext<'_>,
        _target: Bindable<Self>,
    ) -> Result<BindResult<Self>, BindError> {
        bind_map(
            binder,
            name,
            ctx,
            |map, k, v| {
                map.insert(k, v);
            },
            BTreeMap::new,
        )
    }
}

/// `Option` is transparent: a bound inner value becomes `Some`, absence stays
/// `Unbound` so enclosing structs can fall back to `None` without treating
/// the field as present.
impl<T: Bind> Bind for Option<T> {
    const SHAPE: Shape = T::SHAPE;

    fn bind(
        binder: &Binder,
        name: &PropertyName,
        ctx: &mut BindContext<'_>,
        target: Bindable<Self>,
    ) -> Result<BindResult<Self>, BindError> {
        let inner_target = match target.into_value() {
            Some(Some(value)) => Bindable::of(value),
            _ => Bindable::new(),
        };
        Ok(T::bind(binder, name, ctx, inner_target)?.map(Some))
    }

    fn from_scalar(
        value: &PropertyValue,
    ) -> Option<Result<Self, crate::convert::ConvertError>> {
        T::from_scalar(value).map(|result| result.map(Some))
    }
}

impl<T: Bind> Bind for Box<T> {
    const SHAPE: Shape = T::SHAPE;

    fn bind(
        binder: &Binder,
        name: &PropertyName,
        ctx: &mut BindContext<'_>,
        target: Bindable<Self>,
    ) -> Result<BindResult<Self>, BindError> {
        let inner_target = match target.into_value() {
            Some(boxed) => Bindable::of(*boxed),
            None => Bindable::new(),
        };
        Ok(T::bind(binder, name, ctx, inner_target)?.map(Box::new))
    }

    fn from_scalar(
        value: &PropertyValue,
    ) -> Option<Result<Self, crate::convert::ConvertError>> {
        T::from_scalar(value).map(|result| result.map(Box::new))
    }
}

impl<T: Bind> Bind for Arc<T> {
    const SHAPE: Shape = T::SHAPE;

    fn bind(
        binder: &Binder,
        name: &PropertyName,
        ctx: &mut BindContext<'_>,
        _target: Bindable<Self>,
    ) -> Result<BindResult<Self>, BindError> {
        Ok(T::bind(binder, name, ctx, Bindable::new())?.map(Arc::new))
    }

    fn from_scalar(
        value: &PropertyValue,
    ) -> Option<Result<Self, crate::convert::ConvertError>> {
        T::from_scalar(value).map(|result| result.map(Arc::new))
    }
}
