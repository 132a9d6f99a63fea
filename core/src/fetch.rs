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

//! Network-fetch collaborator abstraction
//!
//! This module defines the transport-agnostic [`Fetcher`] trait. The
//! validator uses it for two things: retrieving live resources of the
//! service under test and retrieving remote schema documents.
//!
//! Operation semantics:
//! - `fetch` performs a GET of the given URI. The URI is either a path
//!   inside the service (`/redfish/v1/Chassis`) or an absolute URL
//!   (`http://redfish.dmtf.org/schemas/v1/Chassis_v1.xml`).
//! - A URI may carry a `#/a/b/0` fragment. For JSON bodies the
//!   implementation navigates the decoded body by the fragment path
//!   segments and returns the addressed value.
//! - Only successful responses are returned as [`Fetched`]. Unexpected
//!   status codes, transport problems and missing fragment targets are
//!   reported through `Self::Error`.
//!
//! Notes for implementors:
//! - Auth-header policy and content-type negotiation belong to the
//!   implementation.
//! - The trait is `Send + Sync` and returns `Send` futures so one
//!   fetcher can be shared by the schema cache and the crawl.

use http::StatusCode;
use serde_json::Value as JsonValue;
use std::error::Error as StdError;
use std::future::Future;

/// Fetcher defines access to the service under test and to remote
/// schema locations.
pub trait Fetcher: Send + Sync {
    /// Fetch error.
    type Error: StdError + Send + Sync;

    /// GET the URI.
    fn fetch(&self, uri: &str) -> impl Future<Output = Result<Fetched, Self::Error>> + Send;
}

/// Decoded body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Response declared `application/json`.
    Json(JsonValue),
    /// Any other content type (schema documents are XML).
    Text(String),
}

/// Successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Decoded body.
    pub body: Body,
}

impl Fetched {
    /// JSON response with status 200.
    #[must_use]
    pub const fn json(body: JsonValue) -> Self {
        Self {
            status: StatusCode::OK,
            body: Body::Json(body),
        }
    }

    /// Text response with status 200.
    #[must_use]
    pub const fn text(body: String) -> Self {
        Self {
            status: StatusCode::OK,
            body: Body::Text(body),
        }
    }

    /// Consume response and return JSON body if it is JSON.
    #[must_use]
    pub fn into_json(self) -> Option<JsonValue> {
        match self.body {
            Body::Json(v) => Some(v),
            Body::Text(_) => None,
        }
    }

    /// Consume response and return text body if it is text.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self.body {
            Body::Text(v) => Some(v),
            Body::Json(_) => None,
        }
    }
}

/// Navigate a decoded JSON body by a `#/a/b/0` fragment.
///
/// Object members are addressed by key, array elements by index.
/// Returns `None` if any segment does not resolve.
#[must_use]
pub fn navigate_fragment(body: JsonValue, fragment: &str) -> Option<JsonValue> {
    fragment
        .split('/')
        .skip(1)
        .try_fold(body, |current, segment| match current {
            JsonValue::Object(mut map) => map.remove(segment),
            JsonValue::Array(mut items) => segment
                .parse::<usize>()
                .ok()
                .filter(|idx| *idx < items.len())
                .map(|idx| items.swap_remove(idx)),
            _ => None,
        })
        .filter(|v| !v.is_null())
}
