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

//! Relaxed conversion into enums that enumerate their variants via strum.

use std::str::FromStr;

use strum::VariantNames;

use super::ConvertError;
use crate::name::uniform_ident;
use crate::property::PropertyValue;

/// Convert a raw value into an enum by relaxed variant-name match:
/// `round-robin`, `ROUND_ROBIN` and `roundRobin` all select `RoundRobin`.
///
/// Usually reached through [`bind_enum!`](crate::bind_enum), which wires an
/// enum into the binder with one line.
pub fn enum_from_property<T>(value: &PropertyValue) -> Result<T, ConvertError>
where
    T: VariantNames + FromStr,
{
    let raw = match value {
        PropertyValue::Str(s) => s.trim(),
        other => return Err(ConvertError::wrong_type(other, "enum constant")),
    };
    let wanted = uniform_ident(raw);
    for variant in T::VARIANTS {
        if uniform_ident(variant) == wanted {
            return T::from_str(variant).map_err(|_| {
                ConvertError::new(format!("variant '{variant}' failed to parse"))
            });
        }
    }
    Err(ConvertError::new(format!(
        "unknown constant '{raw}', expected one of: {}",
        T::VARIANTS.join(", ")
    )))
}

/// Implement property binding for an enum that derives
/// `strum::{EnumString, VariantNames}`.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, strum::EnumString, strum::VariantNames)]
/// #[strum(serialize_all = "kebab-case")]
/// enum Transport {
///     Tcp,
///     Quic,
/// }
///
/// hawser::bind_enum!(Transport);
/// ```
#[macro_export]
macro_rules! bind_enum {
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::FromProperty for $ty {
            fn from_property(
                value: &$crate::PropertyValue,
            ) -> ::core::result::Result<Self, $crate::ConvertError> {
                $crate::convert::enum_from_property(value)
            }
        }

        $crate::impl_scalar_bind!($ty);
    )*};
}
