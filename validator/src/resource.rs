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

//! Schema-backed validation of one resource.
//!
//! The payload type is looked up in the schema model, every property
//! of the type (including inherited ones) and every payload annotation
//! is resolved, and the payload is checked against the resolved
//! descriptors. The resolved descriptors then drive link extraction.

use crate::compliance::PayloadCompliance;
use crate::error::ResourceError;
use crate::links::LinkExtractor;
use crate::links::Links;
use crate::report::Message;
use crate::report::Outcome;
use crate::report::ResourceResult;
use crate::traversal::Expected;
use crate::traversal::ResourceValidator;
use crate::traversal::Validation;
use redfish_validator_core::Fetcher;
use redfish_validator_core::ODataId;
use redfish_validator_csdl::edmx::QualifiedName;
use redfish_validator_csdl::CacheConfig;
use redfish_validator_csdl::DocumentCache;
use redfish_validator_csdl::Error as SchemaError;
use redfish_validator_csdl::PropertyDescriptor;
use redfish_validator_csdl::PropertyMap;
use redfish_validator_csdl::PropertyPath;
use redfish_validator_csdl::Resolver;
use redfish_validator_csdl::SchemaDocument;
use redfish_validator_csdl::TypeKind;
use redfish_validator_csdl::TypeLocation;
use regex::Error as RegexError;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::debug;
use tracing::error;
use tracing::warn;

type PropertyRequest = (Arc<SchemaDocument>, PropertyPath, TypeKind);

/// [`ResourceValidator`] over the schema model of the service.
pub struct SchemaValidator<F: Fetcher> {
    fetcher: Arc<F>,
    cache: DocumentCache<F>,
    compliance: PayloadCompliance,
}

impl<F: Fetcher> SchemaValidator<F> {
    /// Resources and remote schema documents are both fetched with
    /// `fetcher`.
    ///
    /// # Errors
    ///
    /// See [`PayloadCompliance::new`].
    pub fn new(fetcher: Arc<F>, config: CacheConfig) -> Result<Self, RegexError> {
        Ok(Self {
            cache: DocumentCache::new(fetcher.clone(), config),
            fetcher,
            compliance: PayloadCompliance::new()?,
        })
    }

    #[must_use]
    pub const fn cache(&self) -> &DocumentCache<F> {
        &self.cache
    }

    async fn payload(
        &self,
        uri: &ODataId,
        expected: Option<&Expected>,
    ) -> Result<JsonValue, ResourceError> {
        if let Some(expected) = expected {
            debug!("{uri}: using auto-expanded payload");
            return Ok(expected.payload.clone());
        }
        self.fetcher
            .fetch(uri.as_str())
            .await
            .map_err(|err| ResourceError::Fetch(err.to_string()))?
            .into_json()
            .ok_or(ResourceError::NotJson)
    }

    async fn check(
        &self,
        uri: &ODataId,
        expected: Option<&Expected>,
        result: &mut ResourceResult,
    ) -> Result<Links, ResourceError> {
        let payload = self.payload(uri, expected).await?;

        let type_name = match payload.get("@odata.type").and_then(JsonValue::as_str) {
            Some(v) => v
                .parse::<QualifiedName>()
                .map_err(|_| ResourceError::InvalidType(v.into()))?,
            None => expected
                .map(|e| e.type_name.clone())
                .ok_or(ResourceError::MissingType)?,
        };
        let schema_uri = expected
            .and_then(|e| e.schema_uri.clone())
            .or_else(|| {
                payload
                    .get("@odata.context")
                    .and_then(JsonValue::as_str)
                    .map(Into::into)
            });
        let document = self
            .cache
            .resolve(&type_name.namespace.to_string(), schema_uri.as_deref())
            .await?;
        let document = self
            .cache
            .document_for(&document, &type_name.namespace)
            .await?;
        debug!("{uri}: {type_name} from {}", document.source());

        let mut requests = self.type_properties(&document, &type_name).await?;
        for key in annotation_keys(&payload) {
            match self.annotation_term(&document, key).await {
                Ok(request) => requests.push(request),
                Err(err) => result.push(unresolved(&payload, key, &err)),
            }
        }

        for message in self.compliance.check(&payload) {
            result.push(message);
        }

        let mut properties = PropertyMap::new();
        for (path, details) in Resolver::new(&self.cache).resolve_all(requests).await {
            match details {
                Ok(descriptor) => {
                    result.push(presence(&payload, &path, &descriptor));
                    properties.insert(path, descriptor);
                }
                Err(err) => result.push(unresolved(&payload, &path.name, &err)),
            }
        }

        LinkExtractor::new(document.references(), document.uri())
            .extract(&payload, &properties)
            .or_else(|err| {
                error!("{uri}: {err}");
                result.push(Message {
                    property: err.0.to_string(),
                    value: None,
                    kind: "link".into(),
                    outcome: Outcome::Fail,
                });
                Ok(Links::new())
            })
    }

    /// Properties of the payload type across its inheritance chain.
    /// Entity types are expected; complex types are accepted for
    /// embedded payloads.
    async fn type_properties(
        &self,
        document: &Arc<SchemaDocument>,
        type_name: &QualifiedName,
    ) -> Result<Vec<PropertyRequest>, SchemaError> {
        let location = TypeLocation::new(document.clone(), type_name.clone());
        let walker = Resolver::new(&self.cache).walker();
        let (kind, found) = match walker
            .collect_properties(&location, TypeKind::EntityType)
            .await
        {
            Err(SchemaError::TypeNotFound(_)) => (
                TypeKind::ComplexType,
                walker
                    .collect_properties(&location, TypeKind::ComplexType)
                    .await?,
            ),
            found => (TypeKind::EntityType, found?),
        };
        Ok(found
            .into_iter()
            .map(|f| (f.document, f.path, kind))
            .collect())
    }

    /// Term lookup for a payload annotation such as
    /// `Reset@Redfish.AllowableValues`. The term namespace (usually an
    /// alias) is found through the references of the payload document.
    async fn annotation_term(
        &self,
        document: &Arc<SchemaDocument>,
        key: &str,
    ) -> Result<PropertyRequest, SchemaError> {
        let term = key
            .split_once('@')
            .map(|(_, term)| term)
            .and_then(|term| term.parse::<QualifiedName>().ok())
            .ok_or_else(|| SchemaError::InvalidPropertyPath(key.into()))?;
        let (namespace, term_document) = match document.references().find(&term.namespace) {
            Some(entry) => (
                entry.namespace.clone(),
                self.cache
                    .resolve(&entry.namespace.to_string(), Some(&entry.uri))
                    .await?,
            ),
            None if document.schema(&term.namespace).is_some() => {
                (term.namespace.clone(), document.clone())
            }
            None => return Err(SchemaError::TypeNotFound(term.to_string())),
        };
        let owner = QualifiedName::new(namespace, term.name);
        Ok((term_document, PropertyPath::new(owner, key.into()), TypeKind::Term))
    }
}

impl<F: Fetcher> ResourceValidator for SchemaValidator<F> {
    async fn validate(&self, uri: &ODataId, name: &str, expected: Option<&Expected>) -> Validation {
        let mut result = ResourceResult::new(uri.clone(), name);
        match self.check(uri, expected, &mut result).await {
            Ok(links) => Validation {
                success: true,
                counters: result.counters.clone(),
                results: vec![result],
                links,
            },
            Err(err) => {
                match &err {
                    ResourceError::Schema(schema) if schema.is_schema_defect() => {
                        error!("{uri}: {err}");
                    }
                    _ => warn!("{uri}: {err}"),
                }
                result.error = Some(err.to_string());
                Validation {
                    success: false,
                    counters: result.counters.clone(),
                    results: vec![result],
                    links: Links::new(),
                }
            }
        }
    }
}

/// Payload annotation keys other than `@odata.*`.
fn annotation_keys(payload: &JsonValue) -> impl Iterator<Item = &str> {
    payload
        .as_object()
        .into_iter()
        .flat_map(|object| object.keys())
        .filter(|key| {
            key.split_once('@')
                .is_some_and(|(_, term)| !term.starts_with("odata."))
        })
        .map(String::as_str)
}

fn presence(payload: &JsonValue, path: &PropertyPath, descriptor: &PropertyDescriptor) -> Message {
    let value = payload.get(&path.name);
    let outcome = match value {
        Some(_) => Outcome::Pass,
        None if descriptor.is_required() => Outcome::Fail,
        None => Outcome::Skip,
    };
    Message {
        property: path.name.clone(),
        value: value.map(ToString::to_string),
        kind: descriptor.real_type.name().into(),
        outcome,
    }
}

fn unresolved(payload: &JsonValue, name: &str, err: &SchemaError) -> Message {
    let outcome = if err.is_schema_defect() {
        error!("{name}: {err}");
        Outcome::Fail
    } else {
        warn!("{name}: {err}");
        Outcome::Warn
    };
    Message {
        property: name.into(),
        value: payload.get(name).map(ToString::to_string),
        kind: "unresolved".into(),
        outcome,
    }
}
