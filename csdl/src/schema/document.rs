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

use crate::edmx::Edmx;
use crate::edmx::Namespace;
use crate::edmx::Schema;
use crate::schema::references::ReferenceIndex;
use crate::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::path::PathBuf;

/// Where a schema document was loaded from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SchemaSource {
    /// Fetched through the service (or any absolute URL).
    Remote(String),
    /// Read from the local schema directory.
    Local(PathBuf),
}

impl Display for SchemaSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Remote(uri) => uri.fmt(f),
            Self::Local(path) => write!(f, "local:{}", path.display()),
        }
    }
}

/// Immutable parsed EDMX document together with the reference index
/// built from its `edmx:Reference` declarations.
#[derive(Debug)]
pub struct SchemaDocument {
    source: SchemaSource,
    edmx: Edmx,
    references: ReferenceIndex,
}

impl SchemaDocument {
    /// Parse document text.
    ///
    /// # Errors
    ///
    /// `Error::SchemaUnavailable` if the text is not a valid EDMX
    /// document.
    pub fn parse(source: SchemaSource, text: &str) -> Result<Self, Error> {
        let edmx = Edmx::parse(text).map_err(|err| Error::edmx(source.to_string(), &err))?;
        let references = ReferenceIndex::build(&edmx);
        Ok(Self {
            source,
            edmx,
            references,
        })
    }

    #[must_use]
    pub const fn source(&self) -> &SchemaSource {
        &self.source
    }

    /// Canonical URI of the document if it was fetched remotely. This
    /// URI can be passed back to the cache to get this document again.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        match &self.source {
            SchemaSource::Remote(uri) => Some(uri),
            SchemaSource::Local(_) => None,
        }
    }

    #[must_use]
    pub const fn references(&self) -> &ReferenceIndex {
        &self.references
    }

    /// Schema with the namespace (or alias) defined in this document.
    #[must_use]
    pub fn schema(&self, ns: &Namespace) -> Option<&Schema> {
        self.edmx.schema(ns)
    }

    /// Namespace of the first schema of the document.
    #[must_use]
    pub fn first_namespace(&self) -> Option<&Namespace> {
        self.edmx.schemas.first().map(|s| &s.namespace)
    }
}
