// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Counters aggregated over a crawl.
//!
//! Increment rules:
//! - `pass` / `fail` / `skip` / `warn`: per-property outcomes reported by
//!   the per-resource validator.
//! - `repeat`: a strong link whose target was already visited.
//! - `unvalidated`: a strong link whose subtree failed validation.
//! - `reflink`: a deferred relationship link visited in the final pass.
//! - `unvalidatedRef`: a deferred link whose validation failed.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Counter kinds surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Counter {
    Pass,
    Fail,
    Skip,
    Warn,
    Repeat,
    RefLink,
    Unvalidated,
    UnvalidatedRef,
}

impl Counter {
    /// All counter kinds in reporting order.
    pub const ALL: [Self; 8] = [
        Self::Pass,
        Self::Fail,
        Self::Skip,
        Self::Warn,
        Self::Repeat,
        Self::RefLink,
        Self::Unvalidated,
        Self::UnvalidatedRef,
    ];

    /// Name used in reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skip => "skip",
            Self::Warn => "warn",
            Self::Repeat => "repeat",
            Self::RefLink => "reflink",
            Self::Unvalidated => "unvalidated",
            Self::UnvalidatedRef => "unvalidatedRef",
        }
    }
}

impl Display for Counter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.name().fmt(f)
    }
}

/// Set of counters. Counters that were never incremented read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Counters(BTreeMap<Counter, u64>);

impl Counters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, counter: Counter) {
        self.add(counter, 1);
    }

    pub fn add(&mut self, counter: Counter, n: u64) {
        if n > 0 {
            *self.0.entry(counter).or_insert(0) += n;
        }
    }

    #[must_use]
    pub fn get(&self, counter: Counter) -> u64 {
        self.0.get(&counter).copied().unwrap_or(0)
    }

    /// Add all counters of `other` to this set.
    pub fn merge(&mut self, other: &Self) {
        other.0.iter().for_each(|(c, n)| self.add(*c, *n));
    }

    /// Non-zero counters in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (Counter, u64)> + '_ {
        self.0.iter().map(|(c, n)| (*c, *n))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Counters {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut first = true;
        for (c, n) in self.iter() {
            if !first {
                ", ".fmt(f)?;
            }
            first = false;
            write!(f, "{c}: {n}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_and_display() {
        let mut a = Counters::new();
        a.increment(Counter::Pass);
        a.increment(Counter::Repeat);
        let mut b = Counters::new();
        b.add(Counter::Pass, 2);
        b.increment(Counter::UnvalidatedRef);
        b.add(Counter::Fail, 0);
        a.merge(&b);
        assert_eq!(a.get(Counter::Pass), 3);
        assert_eq!(a.get(Counter::Fail), 0);
        assert_eq!(a.to_string(), "pass: 3, repeat: 1, unvalidatedRef: 1");
    }

    #[test]
    fn test_names() {
        let names = Counter::ALL.iter().map(|c| c.name()).collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["pass", "fail", "skip", "warn", "repeat", "reflink", "unvalidated", "unvalidatedRef"]
        );
    }
}
