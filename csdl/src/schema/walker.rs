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

use crate::edmx::QualifiedName;
use crate::edmx::Schema;
use crate::edmx::SimpleIdentifier;
use crate::edmx::StructuredType;
use crate::schema::cache::DocumentCache;
use crate::schema::descriptor::PropertyPath;
use crate::schema::document::SchemaDocument;
use crate::Error;
use redfish_validator_core::Fetcher;
use std::collections::HashSet;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;
use tracing::debug;
use tracing::warn;

/// Kind of the schema element that owns properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    EntityType,
    ComplexType,
    /// Terms are used for payload annotations (`Property@Namespace.Term`).
    Term,
}

impl Display for TypeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::EntityType => "entity type".fmt(f),
            Self::ComplexType => "complex type".fmt(f),
            Self::Term => "term".fmt(f),
        }
    }
}

/// Where a type is defined. The document carries its own reference
/// index so lookups can continue from here without resolving the
/// namespace again.
#[derive(Clone, Debug)]
pub struct TypeLocation {
    pub document: Arc<SchemaDocument>,
    pub type_name: QualifiedName,
}

impl TypeLocation {
    #[must_use]
    pub const fn new(document: Arc<SchemaDocument>, type_name: QualifiedName) -> Self {
        Self {
            document,
            type_name,
        }
    }

    /// Structured type (entity or complex) at this location.
    ///
    /// # Errors
    ///
    /// `Error::TypeNotFound` if the document doesn't define the type
    /// with the requested kind.
    pub fn structured(&self, kind: TypeKind) -> Result<&StructuredType, Error> {
        self.document
            .schema(&self.type_name.namespace)
            .and_then(|schema| structured(schema, kind, &self.type_name.name))
            .ok_or_else(|| Error::TypeNotFound(format!("{kind} {}", self.type_name)))
    }
}

/// Entity or complex type with the name defined by the schema.
#[must_use]
pub fn structured<'a>(
    schema: &'a Schema,
    kind: TypeKind,
    name: &SimpleIdentifier,
) -> Option<&'a StructuredType> {
    match kind {
        TypeKind::EntityType => schema.entity_type(name),
        TypeKind::ComplexType => schema.complex_type(name),
        TypeKind::Term => None,
    }
}

/// Property of a type found by walking the inheritance chain, with the
/// document that defines its owner.
#[derive(Clone, Debug)]
pub struct FoundProperty {
    pub document: Arc<SchemaDocument>,
    pub path: PropertyPath,
}

/// Type lookups and base-type chains over a [`DocumentCache`].
pub struct TypeWalker<'a, F: Fetcher> {
    cache: &'a DocumentCache<F>,
}

impl<'a, F: Fetcher> TypeWalker<'a, F> {
    pub const fn new(cache: &'a DocumentCache<F>) -> Self {
        Self { cache }
    }

    /// Parent (base) type of the type at `location`.
    ///
    /// Returns `Ok(None)` if the type has no base type. Terms have no
    /// parents.
    ///
    /// # Errors
    ///
    /// - `Error::TypeNotFound` if the type itself, or the schema of its
    ///   base type, cannot be found.
    /// - `Error::SchemaUnavailable` if the document of the base type
    ///   cannot be loaded.
    pub async fn parent_type(
        &self,
        location: &TypeLocation,
        kind: TypeKind,
    ) -> Result<Option<TypeLocation>, Error> {
        if kind == TypeKind::Term {
            return Ok(None);
        }
        let Some(base) = location.structured(kind)?.base_type.clone() else {
            return Ok(None);
        };
        let document = self
            .cache
            .document_for(&location.document, &base.namespace)
            .await?;
        if document.schema(&base.namespace).is_none() {
            return Err(Error::TypeNotFound(base.to_string()));
        }
        debug!("{} derives from {base}", location.type_name);
        Ok(Some(TypeLocation::new(document, base)))
    }

    /// Properties declared directly by the type: structural properties
    /// first, then navigation properties, each in declaration order.
    ///
    /// # Errors
    ///
    /// `Error::TypeNotFound` if the type is not defined at `location`.
    pub fn type_properties(
        location: &TypeLocation,
        kind: TypeKind,
    ) -> Result<Vec<PropertyPath>, Error> {
        Ok(location
            .structured(kind)?
            .properties
            .iter()
            .map(|p| PropertyPath::new(location.type_name.clone(), p.name.inner().clone()))
            .collect())
    }

    /// Complete property list of the type including all inherited
    /// properties. The type's own properties come first, then those of
    /// its parent and so on.
    ///
    /// An ancestor that cannot be loaded ends the walk with a warning;
    /// the properties collected so far are returned.
    ///
    /// # Errors
    ///
    /// - `Error::TypeNotFound` if the type itself is not defined at
    ///   `location`.
    /// - `Error::UnresolvableTypeReference` if the inheritance chain
    ///   comes back to a type already in the chain.
    pub async fn collect_properties(
        &self,
        location: &TypeLocation,
        kind: TypeKind,
    ) -> Result<Vec<FoundProperty>, Error> {
        let mut result = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(location.clone());
        while let Some(loc) = current {
            if !seen.insert(loc.type_name.clone()) {
                return Err(Error::UnresolvableTypeReference(format!(
                    "inheritance cycle at {}",
                    loc.type_name
                )));
            }
            result.extend(
                Self::type_properties(&loc, kind)?
                    .into_iter()
                    .map(|path| FoundProperty {
                        document: loc.document.clone(),
                        path,
                    }),
            );
            current = match self.parent_type(&loc, kind).await {
                Ok(parent) => parent,
                Err(err @ (Error::SchemaUnavailable(..) | Error::TypeNotFound(_))) => {
                    warn!("base type of {}: {err}", loc.type_name);
                    None
                }
                Err(err) => return Err(err),
            };
        }
        Ok(result)
    }

    /// Whether the type at `location` is `ancestor` or derives from it.
    ///
    /// # Errors
    ///
    /// Same as [`Self::parent_type`].
    pub async fn derives_from(
        &self,
        location: &TypeLocation,
        kind: TypeKind,
        ancestor: &QualifiedName,
    ) -> Result<bool, Error> {
        let mut seen = HashSet::new();
        let mut current = Some(location.clone());
        while let Some(loc) = current {
            if &loc.type_name == ancestor {
                return Ok(true);
            }
            if !seen.insert(loc.type_name.clone()) {
                return Ok(false);
            }
            current = self.parent_type(&loc, kind).await?;
        }
        Ok(false)
    }
}
