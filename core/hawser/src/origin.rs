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

//! Provenance metadata for resolved properties.

use std::fmt;

/// Where a property value came from: the source name plus an optional
/// source-specific location (`environment variable 'APP_PORT'`, `key
/// 'server.port'`).
///
/// Origins are diagnostics only. They are deliberately excluded from
/// [`Property`](crate::Property) equality so that provenance never leaks into
/// value comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    source: String,
    description: Option<String>,
}

impl Origin {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{}: {}", self.source, description),
            None => f.write_str(&self.source),
        }
    }
}
