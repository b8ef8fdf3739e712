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

//! Read-only views over single origins of configuration data.

mod env;
mod map;

pub use env::EnvPropertySource;
pub use map::MapPropertySource;

use crate::name::PropertyName;
use crate::property::Property;

/// A single origin of configuration properties.
///
/// Sources are read-only and must answer lookups idempotently for the
/// duration of a bind; the binder never mutates them and may share one source
/// across concurrent binds.
pub trait PropertySource: Send + Sync {
    /// Name of this source, used to stamp [`Origin`](crate::Origin)s.
    fn source_name(&self) -> &str;

    /// Resolve a property by relaxed name match.
    fn get(&self, name: &PropertyName) -> Option<Property>;

    /// Every known name strictly below `prefix`. Drives discovery of
    /// collection indices and map keys, and the strict leftover report.
    fn descendants(&self, prefix: &PropertyName) -> Vec<PropertyName>;

    /// Whether this source's names should appear in the strict "unbound
    /// elements" report. Environment-style sources opt out: underscore keys
    /// lose element boundaries (`SERVER_READ_TIMEOUT` can be either
    /// `server.read-timeout` or `server.read.timeout`), so a consumed dashed
    /// name would still be reported as a leftover.
    fn included_in_unbound_report(&self) -> bool {
        true
    }
}
