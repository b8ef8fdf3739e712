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

//! Duration conversion: humantime unit suffixes, bare numbers as
//! milliseconds.

use std::time::Duration;

use super::{ConvertError, FromProperty};
use crate::property::PropertyValue;

impl FromProperty for Duration {
    fn from_property(value: &PropertyValue) -> Result<Self, ConvertError> {
        match value {
            PropertyValue::Str(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Err(ConvertError::new("empty duration"));
                }
                if s.bytes().all(|b| b.is_ascii_digit()) {
                    let millis: u64 = s
                        .parse()
                        .map_err(|e| ConvertError::new(format!("{e}")))?;
                    return Ok(Duration::from_millis(millis));
                }
                humantime::parse_duration(s).map_err(|e| ConvertError::new(format!("{e}")))
            }
            PropertyValue::Int(i) => {
                let millis = u64::try_from(*i)
                    .map_err(|_| ConvertError::new(format!("negative duration {i}")))?;
                Ok(Duration::from_millis(millis))
            }
            PropertyValue::Uint(u) => Ok(Duration::from_millis(*u)),
            other => Err(ConvertError::wrong_type(other, "duration")),
        }
    }
}
