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

//! Per-resource validation results.

use redfish_validator_core::Counter;
use redfish_validator_core::Counters;
use redfish_validator_core::ODataId;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Outcome of one check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
    Skip,
    Warn,
}

impl Outcome {
    /// Counter incremented by the outcome.
    #[must_use]
    pub const fn counter(self) -> Counter {
        match self {
            Self::Pass => Counter::Pass,
            Self::Fail => Counter::Fail,
            Self::Skip => Counter::Skip,
            Self::Warn => Counter::Warn,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.counter().fmt(f)
    }
}

/// Check of one property or payload annotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub property: String,
    /// Payload value, `None` if absent.
    pub value: Option<String>,
    /// What was checked: the resolved type kind, `odata` for
    /// `@odata.*` keys.
    pub kind: String,
    pub outcome: Outcome,
}

/// Result of validating one resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceResult {
    pub uri: ODataId,
    /// Display name: the chain of link names that led to the resource.
    pub name: String,
    pub counters: Counters,
    pub messages: Vec<Message>,
    /// Why the resource could not be validated at all.
    pub error: Option<String>,
}

impl ResourceResult {
    #[must_use]
    pub fn new(uri: ODataId, name: impl Into<String>) -> Self {
        Self {
            uri,
            name: name.into(),
            counters: Counters::new(),
            messages: Vec::new(),
            error: None,
        }
    }

    /// Record a check and count its outcome.
    pub fn push(&mut self, message: Message) {
        self.counters.increment(message.outcome.counter());
        self.messages.push(message);
    }

    #[must_use]
    pub fn failed(&self) -> bool {
        self.error.is_some() || self.counters.get(Counter::Fail) > 0
    }
}

impl Display for ResourceResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let status = if self.failed() { "FAIL" } else { "PASS" };
        write!(f, "{status} {} ({})", self.uri, self.name)?;
        if let Some(err) = &self.error {
            write!(f, ": {err}")
        } else if self.counters.is_empty() {
            Ok(())
        } else {
            write!(f, ": {}", self.counters)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_counts_outcomes() {
        let mut result = ResourceResult::new(ODataId::service_root(), "ServiceRoot");
        for (property, outcome) in [("Id", Outcome::Pass), ("Name", Outcome::Pass), ("UUID", Outcome::Skip)] {
            result.push(Message {
                property: property.into(),
                value: None,
                kind: "primitive".into(),
                outcome,
            });
        }
        assert_eq!(result.counters.get(Counter::Pass), 2);
        assert_eq!(result.counters.get(Counter::Skip), 1);
        assert!(!result.failed());
        assert!(result.to_string().starts_with("PASS /redfish/v1 (ServiceRoot)"));

        result.error = Some("not found".into());
        assert!(result.failed());
        assert_eq!(result.to_string(), "FAIL /redfish/v1 (ServiceRoot): not found");
    }
}
