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

//! Byte-size conversion (`10MB`, `512KiB`, bare integers as bytes).

use byte_unit::Byte;

use super::{ConvertError, FromProperty};
use crate::property::PropertyValue;

impl FromProperty for Byte {
    fn from_property(value: &PropertyValue) -> Result<Self, ConvertError> {
        match value {
            PropertyValue::Str(s) => Byte::parse_str(s.trim(), true)
                .map_err(|e| ConvertError::new(format!("{e}"))),
            PropertyValue::Int(i) => {
                let bytes = u64::try_from(*i)
                    .map_err(|_| ConvertError::new(format!("negative byte size {i}")))?;
                Ok(Byte::from_u64(bytes))
            }
            PropertyValue::Uint(u) => Ok(Byte::from_u64(*u)),
            other => Err(ConvertError::wrong_type(other, "byte size")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(raw: &str) -> Result<Byte, ConvertError> {
        Byte::from_property(&PropertyValue::Str(raw.to_string()))
    }

    #[test]
    fn parses_decimal_and_binary_units() {
        assert_eq!(convert("10MB").unwrap(), Byte::from_u64(10_000_000));
        assert_eq!(convert("512KiB").unwrap(), Byte::from_u64(512 * 1024));
        assert_eq!(convert("1 GB").unwrap(), Byte::from_u64(1_000_000_000));
    }

    #[test]
    fn bare_numbers_are_bytes() {
        assert_eq!(convert("4096").unwrap(), Byte::from_u64(4096));
        assert_eq!(
            Byte::from_property(&PropertyValue::Uint(1024)).unwrap(),
            Byte::from_u64(1024)
        );
    }

    #[test]
    fn malformed_units_are_errors() {
        assert!(convert("10XB").is_err());
        assert!(convert("lots").is_err());
    }

    #[test]
    fn negative_sizes_are_errors() {
        assert!(Byte::from_property(&PropertyValue::Int(-1)).is_err());
    }
}
