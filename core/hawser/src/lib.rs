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

//! Relaxed configuration property binding.
//!
//! `hawser` binds an ordered stack of heterogeneous property sources
//! (environment variables, key/value maps, nested trees) onto strongly typed
//! Rust values:
//!
//! - names match across conventions (`server.read-timeout` binds from
//!   `SERVER_READ_TIMEOUT`, `server.readTimeout` or `server.read_timeout`);
//! - `${other.prop}` placeholders resolve recursively, with defaults and
//!   cycle detection;
//! - scalars convert with hard failures on overflow and malformed units,
//!   including durations (`10s`), byte sizes (`10MB`) and relaxed enums;
//! - collections merge indexed elements across sources, maps discover their
//!   keys, and structs bind per field via `#[derive(Bind)]`;
//! - handlers observe the operation (origin tracking, strict leftover
//!   reporting, error tolerance) and validation aggregates every violation.
//!
//! ```ignore
//! use hawser::{Bind, Binder, EnvPropertySource, MapPropertySource};
//! use serde_json::json;
//!
//! #[derive(Debug, Bind)]
//! struct ServerConfig {
//!     host: String,
//!     port: u16,
//!     #[bind(default)]
//!     read_timeout: std::time::Duration,
//! }
//!
//! let binder = Binder::builder()
//!     .source(EnvPropertySource::from_os_env("APP_"))
//!     .source(MapPropertySource::from_json(
//!         "defaults",
//!         &json!({"server": {"host": "localhost", "port": 8080}}),
//!     ))
//!     .build();
//! let config = binder.bind::<ServerConfig>("server")?;
//! ```

mod error;
mod origin;
mod property;

pub mod bind;
pub mod convert;
pub mod name;
pub mod placeholder;
pub mod source;
pub mod validate;

pub use bind::{
    Bind, BindContext, BindHandler, BindResult, Bindable, Binder, BinderBuilder,
    BoundPropertiesHandler, DefaultHandler, FinishState, HandlerPipeline, IgnoreErrorsHandler,
    NoUnboundElementsHandler, OnFailure, Shape, MAX_BIND_DEPTH,
};
pub use convert::{ConvertError, FromProperty};
pub use error::BindError;
pub use name::{name_from_env_key, Element, PropertyName};
pub use origin::Origin;
pub use placeholder::{PlaceholderMode, MAX_PLACEHOLDER_DEPTH};
pub use property::{Property, PropertyValue};
pub use source::{EnvPropertySource, MapPropertySource, PropertySource};
pub use validate::{Validatable, ValidationError, Validator, Violation, Violations};

/// Derive [`Bind`] for a named-field struct.
///
/// Fields bind at `prefix.field-name` (the field identifier in relaxed
/// form), recursively through the engine. Two container modes exist:
///
/// - value-object (the default): all-or-nothing. Every field without
///   `#[bind(default)]` and not of `Option` type is required; if nothing
///   under the prefix binds, or a required field stays unbound, the whole
///   struct is unbound.
/// - `#[bind(default)]` on the struct: the struct starts from the existing
///   instance (or `Default::default()`), bound fields overwrite and unbound
///   fields keep their values. Partial success is allowed.
///
/// Field attributes: `#[bind(name = "...")]` renames, `#[bind(skip)]`
/// excludes (the field takes its `Default`), `#[bind(default)]` falls back
/// to `Default::default()` when unbound.
pub use hawser_derive::Bind;
