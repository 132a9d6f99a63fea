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

use crate::annotations::ODataAnnotations as _;
use crate::edmx::Annotation;
use crate::edmx::QualifiedName;
use crate::edmx::Type;
use crate::edmx::TypeRef;
use crate::schema::cache::DocumentCache;
use crate::schema::descriptor::PropertyAttributes;
use crate::schema::descriptor::PropertyDescriptor;
use crate::schema::descriptor::PropertyMap;
use crate::schema::descriptor::PropertyPath;
use crate::schema::descriptor::RealType;
use crate::schema::document::SchemaDocument;
use crate::schema::walker::TypeKind;
use crate::schema::walker::TypeLocation;
use crate::schema::walker::structured;
use crate::schema::walker::TypeWalker;
use crate::Error;
use redfish_validator_core::BoxFuture;
use redfish_validator_core::Fetcher;
use std::collections::BTreeMap;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use tracing::error;
use tracing::warn;

/// Property descriptor resolver.
///
/// Builds [`PropertyDescriptor`]s by locating the property element and
/// dereferencing its declared type until a terminal kind is reached:
///
/// | Declared type | Result |
/// |---|---|
/// | `Collection(T)` | `is_collection = T`, continue with `T` |
/// | `Edm.*` | `Primitive` |
/// | `TypeDefinition` of `Edm.String` with `Redfish.Enumeration` | `DeprecatedEnum` |
/// | other `TypeDefinition` | continue with the underlying type |
/// | `ComplexType` | `Complex` with all nested properties, inherited included |
/// | `EnumType` | `Enum` |
/// | `EntityType` | `Entity` |
///
/// Type chains may cross documents; the owning document of each named
/// type is found through the reference index of the current document.
pub struct Resolver<'a, F: Fetcher> {
    cache: &'a DocumentCache<F>,
}

impl<'a, F: Fetcher> Resolver<'a, F> {
    pub const fn new(cache: &'a DocumentCache<F>) -> Self {
        Self { cache }
    }

    #[must_use]
    pub const fn walker(&self) -> TypeWalker<'a, F> {
        TypeWalker::new(self.cache)
    }

    /// Resolve `Owner:Property` defined by the document.
    ///
    /// A property name containing `@` refers to the owner element
    /// itself. For terms this resolves the term's type.
    ///
    /// # Errors
    ///
    /// - `Error::TypeNotFound` if the owner is not found.
    /// - `Error::PropertyNotFound` if the owner doesn't declare the property.
    /// - `Error::SchemaUnavailable` if a document on the type chain
    ///   cannot be loaded.
    /// - `Error::UnresolvableTypeReference` if the type chain ends in an
    ///   element that is neither a type definition, complex, enum nor
    ///   entity type, or if the chain is cyclic.
    pub async fn property_details(
        &self,
        document: &Arc<SchemaDocument>,
        path: &PropertyPath,
        kind: TypeKind,
    ) -> Result<PropertyDescriptor, Error> {
        self.details(document.clone(), path.clone(), kind, Vec::new())
            .await
    }

    /// Resolve every property in `properties`. Failures are reported
    /// per property and do not affect the others.
    pub async fn resolve_all(
        &self,
        properties: Vec<(Arc<SchemaDocument>, PropertyPath, TypeKind)>,
    ) -> Vec<(PropertyPath, Result<PropertyDescriptor, Error>)> {
        let mut result = Vec::with_capacity(properties.len());
        for (document, path, kind) in properties {
            let details = self.details(document, path.clone(), kind, Vec::new()).await;
            result.push((path, details));
        }
        result
    }

    // `expanding` holds complex types being expanded by the callers up
    // the stack.
    fn details(
        &self,
        document: Arc<SchemaDocument>,
        path: PropertyPath,
        kind: TypeKind,
        expanding: Vec<QualifiedName>,
    ) -> BoxFuture<'_, Result<PropertyDescriptor, Error>> {
        Box::pin(async move {
            debug!("resolving {path} ({kind})");
            let (attributes, annotations, is_nav) = Self::property_element(&document, &path, kind)?;
            let mut is_collection = None;
            let mut current_doc = document;
            let mut current = attributes.type_name.clone();
            let mut seen = HashSet::new();
            let real_type = loop {
                let qname = match current {
                    TypeRef::Collection(inner) => {
                        is_collection = Some(inner.qualified_name().clone());
                        current = *inner;
                        continue;
                    }
                    TypeRef::Primitive(qname) => break RealType::Primitive(qname),
                    TypeRef::Named(qname) => qname,
                };
                if !seen.insert(qname.clone()) {
                    error!("type reference cycle at {qname} resolving {path}");
                    return Err(Error::UnresolvableTypeReference(qname.to_string()));
                }
                let type_doc = self
                    .cache
                    .document_for(&current_doc, &qname.namespace)
                    .await?;
                let schema = type_doc
                    .schema(&qname.namespace)
                    .ok_or_else(|| Error::TypeNotFound(qname.to_string()))?;
                match schema.get(&qname.name) {
                    Some(Type::TypeDefinition(td)) => {
                        if let TypeRef::Primitive(underlying) = &td.underlying_type {
                            if underlying.name.inner() == "String" {
                                if let Some(members) = td.annotations.redfish_enumeration() {
                                    break RealType::DeprecatedEnum(members);
                                }
                            }
                        }
                        current = td.underlying_type.clone();
                    }
                    Some(Type::ComplexType(_)) => {
                        let location = TypeLocation::new(type_doc.clone(), qname);
                        let nested = self.expand_complex(location, expanding.clone()).await?;
                        break RealType::Complex(nested);
                    }
                    Some(Type::EnumType(e)) => break RealType::Enum(e.member_names()),
                    Some(Type::EntityType(_)) => break RealType::Entity,
                    _ => {
                        error!("cannot classify type {qname} of {path}");
                        return Err(Error::UnresolvableTypeReference(qname.to_string()));
                    }
                }
                current_doc = type_doc;
            };
            Ok(PropertyDescriptor {
                attributes,
                annotations,
                is_nav,
                is_collection,
                real_type,
            })
        })
    }

    async fn expand_complex(
        &self,
        location: TypeLocation,
        mut expanding: Vec<QualifiedName>,
    ) -> Result<PropertyMap, Error> {
        if expanding.contains(&location.type_name) {
            warn!(
                "complex type {} is nested in itself; not expanded further",
                location.type_name
            );
            return Ok(PropertyMap::new());
        }
        expanding.push(location.type_name.clone());
        let found = self
            .walker()
            .collect_properties(&location, TypeKind::ComplexType)
            .await?;
        let mut map = PropertyMap::new();
        for prop in found {
            let details = self
                .details(
                    prop.document,
                    prop.path.clone(),
                    TypeKind::ComplexType,
                    expanding.clone(),
                )
                .await;
            match details {
                Ok(descriptor) => map.insert(prop.path, descriptor),
                Err(err) if err.is_schema_defect() => {
                    error!("{} is not resolved: {err}", prop.path);
                }
                Err(err) => warn!("{} is not resolved: {err}", prop.path),
            }
        }
        Ok(map)
    }

    // Locates the element described by `path` and returns its raw
    // attributes, annotations and navigation flag.
    fn property_element(
        document: &SchemaDocument,
        path: &PropertyPath,
        kind: TypeKind,
    ) -> Result<(PropertyAttributes, Annotations, bool), Error> {
        let owner = &path.owner;
        let schema = document
            .schema(&owner.namespace)
            .ok_or_else(|| Error::TypeNotFound(owner.to_string()))?;
        if kind == TypeKind::Term {
            let term = schema
                .term(&owner.name)
                .ok_or_else(|| Error::TypeNotFound(format!("term {owner}")))?;
            let type_name = term
                .ttype
                .clone()
                .unwrap_or_else(|| TypeRef::Primitive(QualifiedName::edm("String")));
            let attributes = PropertyAttributes {
                name: term.name.inner().clone(),
                type_name,
                nullable: None,
            };
            return Ok((attributes, annotation_map(&term.annotations), false));
        }
        let owner_type = structured(schema, kind, &owner.name)
            .ok_or_else(|| Error::TypeNotFound(format!("{kind} {owner}")))?;
        if path.is_annotation() {
            let attributes = PropertyAttributes {
                name: owner.name.inner().clone(),
                type_name: TypeRef::Named(owner.clone()),
                nullable: None,
            };
            return Ok((attributes, annotation_map(&owner_type.annotations), false));
        }
        let property = owner_type
            .property(&path.name)
            .ok_or_else(|| Error::PropertyNotFound(owner.to_string(), path.name.clone()))?;
        let attributes = PropertyAttributes {
            name: property.name.inner().clone(),
            type_name: property.ptype.clone(),
            nullable: property.nullable,
        };
        Ok((
            attributes,
            annotation_map(&property.annotations),
            property.is_navigation,
        ))
    }
}

type Annotations = BTreeMap<String, Annotation>;

fn annotation_map(annotations: &[Annotation]) -> Annotations {
    annotations
        .iter()
        .map(|a| (a.term.to_string(), a.clone()))
        .collect()
}

