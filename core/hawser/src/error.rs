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

//! Binding error types.

use thiserror::Error;

use crate::origin::Origin;
use crate::validate::ValidationError;

/// Errors raised while binding property sources onto a target type.
///
/// Every variant names the fully qualified property the bind was working on
/// when it failed; conversion failures additionally carry the offending raw
/// value and its origin so the reporter can point at the exact source entry.
#[derive(Debug, Clone, Error)]
pub enum BindError {
    #[error("invalid property name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error(
        "cannot convert '{value}' to {target} for property '{name}'{}: {reason}",
        origin_suffix(.origin)
    )]
    ConversionFailed {
        name: String,
        value: String,
        target: String,
        reason: String,
        origin: Option<Origin>,
    },

    #[error("circular placeholder reference '${{{placeholder}}}' in property '{name}'")]
    CircularPlaceholder { name: String, placeholder: String },

    #[error("could not resolve placeholder '${{{placeholder}}}' in property '{name}'")]
    PlaceholderNotFound { name: String, placeholder: String },

    #[error(
        "the elements [{}] were provided by the property sources but not bound to the target",
        .names.join(", ")
    )]
    UnboundElements { names: Vec<String> },

    #[error("binding of '{name}' exceeded the maximum nesting depth")]
    DepthExceeded { name: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

fn origin_suffix(origin: &Option<Origin>) -> String {
    match origin {
        Some(origin) => format!(" (from {origin})"),
        None => String::new(),
    }
}
