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

//! The binding engine and the trait types implement to take part in it.

mod aggregate;
mod bindable;
mod binder;
mod context;
mod handler;
mod result;

pub use bindable::Bindable;
pub use binder::{Binder, BinderBuilder, MAX_BIND_DEPTH};
pub use context::BindContext;
pub use handler::{
    BindHandler, BoundPropertiesHandler, DefaultHandler, FinishState, HandlerPipeline,
    IgnoreErrorsHandler, NoUnboundElementsHandler, OnFailure,
};
pub use result::BindResult;

use derive_more::Display;

use crate::convert::ConvertError;
use crate::error::BindError;
use crate::name::PropertyName;
use crate::property::PropertyValue;

/// The shape of a bind target, classified once per type. The binder switches
/// on this instead of probing the target structurally at every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Shape {
    /// A leaf convertible from one property value.
    #[display("scalar")]
    Scalar,
    /// An ordered collection bound from indexed names or a comma list.
    #[display("sequence")]
    Sequence,
    /// A keyed collection bound from discovered child names.
    #[display("map")]
    Map,
    /// A named-field composite bound field by field.
    #[display("struct")]
    Struct,
}

/// A type that can be bound from property sources.
///
/// Scalar implementations come from [`impl_scalar_bind!`]; collections, maps,
/// `Option`, `Box` and `Arc` are provided here; structs use
/// `#[derive(Bind)]`. Manual implementations are the escape hatch for types
/// with custom resolution logic; they should route nested names through
/// [`Binder::bind_value`] so handler hooks and bookkeeping stay accurate.
pub trait Bind: Sized {
    /// The shape the binder dispatches on for this type.
    const SHAPE: Shape;

    /// Bind `name` against the sources reachable through `binder`.
    fn bind(
        binder: &Binder,
        name: &PropertyName,
        ctx: &mut BindContext<'_>,
        target: Bindable<Self>,
    ) -> Result<BindResult<Self>, BindError>;

    /// Convert a single raw value into `Self`, when this type is a leaf.
    /// Sequence binding uses this for comma-separated direct values.
    fn from_scalar(value: &PropertyValue) -> Option<Result<Self, ConvertError>> {
        let _ = value;
        None
    }
}

/// Implement [`Bind`] for leaf types that already implement
/// [`FromProperty`](crate::FromProperty).
#[macro_export]
macro_rules! impl_scalar_bind {
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::Bind for $ty {
            const SHAPE: $crate::Shape = $crate::Shape::Scalar;

            fn bind(
                binder: &$crate::Binder,
                name: &$crate::PropertyName,
                ctx: &mut $crate::BindContext<'_>,
                target: $crate::Bindable<Self>,
            ) -> ::core::result::Result<$crate::BindResult<Self>, $crate::BindError> {
                if target.has_no_direct_property() {
                    return ::core::result::Result::Ok($crate::BindResult::Unbound);
                }
                binder.bind_leaf::<Self>(name, ctx)
            }

            fn from_scalar(
                value: &$crate::PropertyValue,
            ) -> ::core::option::Option<
                ::core::result::Result<Self, $crate::ConvertError>,
            > {
                ::core::option::Option::Some(
                    <Self as $crate::FromProperty>::from_property(value),
                )
            }
        }
    )*};
}
