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

//! The outcome of a bind: a value, or explicit absence.

/// Result of binding a name against the property sources.
///
/// `Unbound` means no source contained anything at that path, which is
/// distinct from binding to an empty or default value: callers use the
/// difference to decide whether their own defaults should apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindResult<T> {
    Bound(T),
    Unbound,
}

impl<T> BindResult<T> {
    pub fn is_bound(&self) -> bool {
        matches!(self, BindResult::Bound(_))
    }

    pub fn get(self) -> Option<T> {
        match self {
            BindResult::Bound(value) => Some(value),
            BindResult::Unbound => None,
        }
    }

    pub fn as_ref(&self) -> BindResult<&T> {
        match self {
            BindResult::Bound(value) => BindResult::Bound(value),
            BindResult::Unbound => BindResult::Unbound,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> BindResult<U> {
        match self {
            BindResult::Bound(value) => BindResult::Bound(f(value)),
            BindResult::Unbound => BindResult::Unbound,
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        match self {
            BindResult::Bound(value) => value,
            BindResult::Unbound => default,
        }
    }

    pub fn unwrap_or_else(self, f: impl FnOnce() -> T) -> T {
        match self {
            BindResult::Bound(value) => value,
            BindResult::Unbound => f(),
        }
    }

    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.unwrap_or_else(T::default)
    }

    pub fn ok_or<E>(self, error: E) -> Result<T, E> {
        match self {
            BindResult::Bound(value) => Ok(value),
            BindResult::Unbound => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combinators() {
        assert_eq!(BindResult::Bound(2).map(|v| v * 2), BindResult::Bound(4));
        assert_eq!(BindResult::<i32>::Unbound.map(|v| v * 2), BindResult::Unbound);
        assert_eq!(BindResult::Bound(1).unwrap_or(9), 1);
        assert_eq!(BindResult::Unbound.unwrap_or(9), 9);
        assert_eq!(BindResult::<u32>::Unbound.unwrap_or_default(), 0);
        assert_eq!(BindResult::Bound(1).ok_or("absent"), Ok(1));
        assert_eq!(BindResult::<i32>::Unbound.ok_or("absent"), Err("absent"));
    }

    #[test]
    fn bound_empty_is_not_unbound() {
        let bound: BindResult<Vec<i32>> = BindResult::Bound(Vec::new());
        assert!(bound.is_bound());
        assert_ne!(bound, BindResult::Unbound);
    }
}
