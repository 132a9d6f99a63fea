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

use crate::edmx::ValidateError;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Schema resolution errors.
#[derive(Debug)]
pub enum Error {
    /// Schema document could not be fetched, read or parsed. The first
    /// field names what was requested.
    SchemaUnavailable(String, String),
    /// Named type or its schema is absent from the document that is
    /// expected to define it.
    TypeNotFound(String),
    /// Type dereferencing reached an element that cannot be classified
    /// or came back to a type it already visited.
    UnresolvableTypeReference(String),
    /// `edmx:Reference` / `edmx:Include` without required attributes.
    MalformedReference(String),
    /// Property path is not in `Owner:Property` form.
    InvalidPropertyPath(String),
    /// Owner type exists but does not declare the property.
    PropertyNotFound(String, String),
}

impl Error {
    /// Errors that indicate a defect of the schema corpus itself
    /// rather than a missing or unreachable document.
    #[must_use]
    pub const fn is_schema_defect(&self) -> bool {
        matches!(
            self,
            Self::UnresolvableTypeReference(_) | Self::MalformedReference(_)
        )
    }

    pub(crate) fn unavailable(what: impl Into<String>, reason: impl Display) -> Self {
        Self::SchemaUnavailable(what.into(), reason.to_string())
    }

    pub(crate) fn edmx(what: impl Into<String>, err: &ValidateError) -> Self {
        Self::unavailable(what, format!("invalid EDMX document: {err}"))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::SchemaUnavailable(what, reason) => {
                write!(f, "schema unavailable: {what}: {reason}")
            }
            Self::TypeNotFound(name) => write!(f, "type not found: {name}"),
            Self::UnresolvableTypeReference(name) => {
                write!(f, "unresolvable type reference: {name}")
            }
            Self::MalformedReference(details) => write!(f, "malformed reference: {details}"),
            Self::InvalidPropertyPath(path) => write!(f, "invalid property path: {path}"),
            Self::PropertyNotFound(owner, name) => {
                write!(f, "property {name} is not found in {owner}")
            }
        }
    }
}

impl StdError for Error {}
