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

use crate::config::ConfigError;
use redfish_validator_csdl::Error as SchemaError;
use regex::Error as RegexError;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Errors that stop the validator before the crawl begins.
#[derive(Debug)]
pub enum Error {
    Config(ConfigError),
    /// Target address doesn't form a valid URL.
    InvalidTarget(String, url::ParseError),
    /// HTTP client cannot be created.
    HttpClient(Box<dyn StdError + Send + Sync>),
    /// Built-in payload pattern failed to compile.
    Pattern(RegexError),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Config(err) => write!(f, "configuration error: {err}"),
            Self::InvalidTarget(target, err) => write!(f, "invalid target {target}: {err}"),
            Self::HttpClient(err) => write!(f, "cannot create HTTP client: {err}"),
            Self::Pattern(err) => write!(f, "invalid payload pattern: {err}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::InvalidTarget(_, err) => Some(err),
            Self::HttpClient(err) => Some(err.as_ref()),
            Self::Pattern(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Reasons a single resource cannot be validated. These fail the
/// resource, never the crawl.
#[derive(Debug)]
pub enum ResourceError {
    /// Fetch of the resource failed.
    Fetch(String),
    /// Response body is not JSON.
    NotJson,
    /// Payload has no `@odata.type` and no type is known from the link.
    MissingType,
    InvalidType(String),
    Schema(SchemaError),
}

impl Display for ResourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Fetch(err) => write!(f, "fetch failed: {err}"),
            Self::NotJson => write!(f, "response is not JSON"),
            Self::MissingType => write!(f, "payload has no @odata.type"),
            Self::InvalidType(v) => write!(f, "invalid @odata.type: {v}"),
            Self::Schema(err) => err.fmt(f),
        }
    }
}

impl StdError for ResourceError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Schema(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SchemaError> for ResourceError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}
