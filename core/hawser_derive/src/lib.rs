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

//! Proc macro generating property binding implementations for configuration
//! structs.
//!
//! This crate provides `#[derive(Bind)]`, which implements the `hawser::Bind`
//! trait for a named-field struct. Each field binds at
//! `prefix.<field-name>` through the engine, so nested structs, collections
//! and scalar conversions all compose without any runtime introspection.

mod bind_impl;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive macro implementing `hawser::Bind` for a named-field struct.
///
/// # Container Attributes
/// - `#[bind(default)]` - bind onto `Default::default()` (or the instance
///   supplied through `Bindable::of`), keeping existing values for unbound
///   fields. Without it the struct binds as a value object: every
///   non-`Option` field without its own `#[bind(default)]` is required, and
///   a missing required field leaves the whole struct unbound.
///
/// # Field Attributes
/// - `#[bind(name = "...")]` - bind the field under a different element name
/// - `#[bind(default)]` - fall back to `Default::default()` when unbound
/// - `#[bind(skip)]` - never bind this field; it always takes its `Default`
///
/// # Examples
///
/// ```ignore
/// // Value object: `host` and `port` are required, `timeout` falls back.
/// #[derive(Bind)]
/// pub struct EndpointConfig {
///     host: String,
///     port: u16,
///     #[bind(default)]
///     timeout: Duration,
/// }
///
/// // Defaulted struct: unbound fields keep their current values.
/// #[derive(Bind, Default)]
/// #[bind(default)]
/// pub struct RetryConfig {
///     enabled: bool,
///     #[bind(name = "max-attempts")]
///     attempts: u32,
/// }
/// ```
#[proc_macro_derive(Bind, attributes(bind))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    bind_impl::generate_impl(&input).into()
}
