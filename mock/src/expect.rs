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

//! Expectations for the fetcher mock.

use redfish_validator_core::Fetched;
use serde_json::from_str;
use std::fmt::Display;

pub type Response<E> = Result<Fetched, E>;

/// Request expected by the service.
#[derive(Debug)]
pub enum ExpectedRequest {
    /// Expected fetch of the URI (including fragment, if any).
    Fetch { uri: String },
}

/// Expectation for the tests.
#[derive(Debug)]
pub struct Expect<E> {
    pub request: ExpectedRequest,
    pub response: Response<E>,
}

impl<E> Expect<E> {
    /// Fetch answered with a JSON body.
    pub fn json(uri: impl Display, response: impl Display) -> Self {
        Expect {
            request: ExpectedRequest::Fetch {
                uri: uri.to_string(),
            },
            response: Ok(Fetched::json(
                from_str(&response.to_string()).expect("invalid json"),
            )),
        }
    }

    /// Fetch answered with a text body (schema documents).
    pub fn text(uri: impl Display, response: impl Display) -> Self {
        Expect {
            request: ExpectedRequest::Fetch {
                uri: uri.to_string(),
            },
            response: Ok(Fetched::text(response.to_string())),
        }
    }

    /// Fetch that fails.
    pub fn error(uri: impl Display, err: E) -> Self {
        Expect {
            request: ExpectedRequest::Fetch {
                uri: uri.to_string(),
            },
            response: Err(err),
        }
    }
}
