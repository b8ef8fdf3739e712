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

//! Conversion of raw property values into target scalar types.
//!
//! Overflow, fractional-to-integer and malformed-unit conversions are hard
//! failures, never silent truncation.

mod byte_size;
mod duration;
mod enums;

pub use enums::enum_from_property;

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::property::PropertyValue;

/// Failure to convert a raw value into a target type. Carries only the
/// reason; the binder wraps it with the property name, raw value, target type
/// and origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertError {
    reason: String,
}

impl ConvertError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub(crate) fn wrong_type(value: &PropertyValue, expected: &str) -> Self {
        Self::new(format!("expected {expected}, got {}", value.type_label()))
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for ConvertError {}

/// A type convertible from a single raw property value.
pub trait FromProperty: Sized {
    fn from_property(value: &PropertyValue) -> Result<Self, ConvertError>;
}

impl FromProperty for String {
    fn from_property(value: &PropertyValue) -> Result<Self, ConvertError> {
        Ok(value.to_string())
    }
}

impl FromProperty for bool {
    fn from_property(value: &PropertyValue) -> Result<Self, ConvertError> {
        match value {
            PropertyValue::Bool(b) => Ok(*b),
            PropertyValue::Int(0) | PropertyValue::Uint(0) => Ok(false),
            PropertyValue::Int(1) | PropertyValue::Uint(1) => Ok(true),
            PropertyValue::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(true),
                "false" | "no" | "off" | "0" => Ok(false),
                _ => Err(ConvertError::new(format!("'{s}' is not a boolean"))),
            },
            other => Err(ConvertError::wrong_type(other, "boolean")),
        }
    }
}

impl FromProperty for char {
    fn from_property(value: &PropertyValue) -> Result<Self, ConvertError> {
        match value {
            PropertyValue::Str(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(ConvertError::new("expected exactly one character")),
                }
            }
            other => Err(ConvertError::wrong_type(other, "character")),
        }
    }
}

impl FromProperty for PathBuf {
    fn from_property(value: &PropertyValue) -> Result<Self, ConvertError> {
        match value {
            PropertyValue::Str(s) => Ok(PathBuf::from(s)),
            other => Err(ConvertError::wrong_type(other, "path")),
        }
    }
}

impl FromProperty for IpAddr {
    fn from_property(value: &PropertyValue) -> Result<Self, ConvertError> {
        match value {
            PropertyValue::Str(s) => s
                .trim()
                .parse()
                .map_err(|e| ConvertError::new(format!("{e}"))),
            other => Err(ConvertError::wrong_type(other, "IP address")),
        }
    }
}

impl FromProperty for SocketAddr {
    fn from_property(value: &PropertyValue) -> Result<Self, ConvertError> {
        match value {
            PropertyValue::Str(s) => s
                .trim()
                .parse()
                .map_err(|e| ConvertError::new(format!("{e}"))),
            other => Err(ConvertError::wrong_type(other, "socket address")),
        }
    }
}

macro_rules! impl_int_from_property {
    ($($ty:ty),* $(,)?) => {$(
        impl FromProperty for $ty {
            fn from_property(value: &PropertyValue) -> Result<Self, ConvertError> {
                match value {
                    PropertyValue::Str(s) => s
                        .trim()
                        .parse::<$ty>()
                        .map_err(|e| ConvertError::new(format!("{e}"))),
                    PropertyValue::Int(i) => <$ty>::try_from(*i).map_err(|_| {
                        ConvertError::new(format!(
                            "{i} is out of range for {}",
                            stringify!($ty)
                        ))
                    }),
                    PropertyValue::Uint(u) => <$ty>::try_from(*u).map_err(|_| {
                        ConvertError::new(format!(
                            "{u} is out of range for {}",
                            stringify!($ty)
                        ))
                    }),
                    PropertyValue::Float(f) => {
                        if f.fract() != 0.0 {
                            Err(ConvertError::new(format!(
                                "{f} has a fractional part, cannot convert to {}",
                                stringify!($ty)
                            )))
                        } else if *f < <$ty>::MIN as f64 || *f > <$ty>::MAX as f64 {
                            Err(ConvertError::new(format!(
                                "{f} is out of range for {}",
                                stringify!($ty)
                            )))
                        } else {
                            Ok(*f as $ty)
                        }
                    }
                    other => Err(ConvertError::wrong_type(other, "integer")),
                }
            }
        }
    )*};
}

impl_int_from_property!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_float_from_property {
    ($($ty:ty),* $(,)?) => {$(
        impl FromProperty for $ty {
            fn from_property(value: &PropertyValue) -> Result<Self, ConvertError> {
                match value {
                    PropertyValue::Str(s) => s
                        .trim()
                        .parse::<$ty>()
                        .map_err(|e| ConvertError::new(format!("{e}"))),
                    PropertyValue::Int(i) => Ok(*i as $ty),
                    PropertyValue::Uint(u) => Ok(*u as $ty),
                    PropertyValue::Float(f) => {
                        let narrowed = *f as $ty;
                        if f.is_finite() && !narrowed.is_finite() {
                            Err(ConvertError::new(format!(
                                "{f} is out of range for {}",
                                stringify!($ty)
                            )))
                        } else {
                            Ok(narrowed)
                        }
                    }
                    other => Err(ConvertError::wrong_type(other, "float")),
                }
            }
        }
    )*};
}

impl_float_from_property!(f32, f64);

crate::impl_scalar_bind!(
    String,
    bool,
    char,
    std::path::PathBuf,
    std::net::IpAddr,
    std::net::SocketAddr,
    std::time::Duration,
    byte_unit::Byte,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
);

/// Human-readable label for a target type, with module paths stripped:
/// `std::vec::Vec<core::time::Duration>` -> `Vec<Duration>`.
pub(crate) fn type_label<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for c in full.chars() {
        match c {
            ':' => segment.clear(),
            '<' | '>' | ',' | ' ' | '[' | ']' | ';' | '&' => {
                out.push_str(&segment);
                segment.clear();
                out.push(c);
            }
            _ => segment.push(c),
        }
    }
    out.push_str(&segment);
    out
}
