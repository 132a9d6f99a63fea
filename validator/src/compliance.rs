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

//! Compliance of `@odata.*` payload keys.

use crate::report::Message;
use crate::report::Outcome;
use regex::Error as RegexError;
use regex::Regex;
use serde_json::Value as JsonValue;

const ODATA_PREFIX: &str = "@odata.";

/// Checks `@odata.id`, `@odata.context`, `@odata.type` and
/// `@odata.count` of a payload. Patterns are anchored at the start
/// of the value only.
pub struct PayloadCompliance {
    id: Regex,
    context: Regex,
    odata_type: Regex,
}

impl PayloadCompliance {
    /// # Errors
    ///
    /// Never returns an error for the built-in patterns. Keep it for
    /// regex API consistency.
    pub fn new() -> Result<Self, RegexError> {
        Ok(Self {
            id: Regex::new(r"^(/.*)+(#([a-zA-Z0-9_.-]*\.)+[a-zA-Z0-9_.-]*)?")?,
            context: Regex::new(r"^(/.*)+#([a-zA-Z0-9_.-]*\.)+[a-zA-Z0-9_.-]*")?,
            odata_type: Regex::new(r"^#([a-zA-Z0-9_.-]*\.)+[a-zA-Z0-9_.-]*")?,
        })
    }

    /// One message per `@odata.*` key at the top level of `payload`.
    #[must_use]
    pub fn check(&self, payload: &JsonValue) -> Vec<Message> {
        let Some(object) = payload.as_object() else {
            return Vec::new();
        };
        object
            .iter()
            .filter(|(key, _)| key.starts_with(ODATA_PREFIX))
            .map(|(key, value)| Message {
                property: key.clone(),
                value: Some(value.to_string()),
                kind: "odata".into(),
                outcome: if self.is_compliant(key, value) {
                    Outcome::Pass
                } else {
                    Outcome::Fail
                },
            })
            .collect()
    }

    fn is_compliant(&self, key: &str, value: &JsonValue) -> bool {
        let pattern = match key.strip_prefix(ODATA_PREFIX) {
            Some("id") => &self.id,
            Some("context") => &self.context,
            Some("type") => &self.odata_type,
            Some("count") => return value.is_i64() || value.is_u64(),
            _ => return true,
        };
        value.as_str().is_some_and(|v| pattern.is_match(v))
    }
}
