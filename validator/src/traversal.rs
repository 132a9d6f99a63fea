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

//! URI Tree Validator
//!
//! Walks the resource graph of the service starting from one URI. Every
//! resource is validated by a [`ResourceValidator`] that also reports
//! the links found in the resource. Links are then followed depth
//! first:
//!
//! - A link to a resource that was already entered counts as `repeat`
//!   and is not followed again.
//! - Relationship links (see [`is_relationship`]) are not followed
//!   where they are found. They are passed up to the outermost call
//!   and visited there, once the strong links are exhausted, if their
//!   target is still unvisited.
//!
//! The crawl is sequential. The visited set is owned by one
//! [`UriTreeValidator::validate_tree`] call, so checking and inserting
//! a URI is a single step.

use crate::links::is_relationship;
use crate::links::LinkEntry;
use crate::links::LinkName;
use crate::links::Links;
use crate::report::ResourceResult;
use redfish_validator_core::BoxFuture;
use redfish_validator_core::Counter;
use redfish_validator_core::Counters;
use redfish_validator_core::ODataId;
use redfish_validator_csdl::edmx::QualifiedName;
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::collections::VecDeque;
use std::future::Future;
use tracing::info;
use tracing::warn;

/// What is already known about a resource reached through an
/// auto-expanded link.
#[derive(Clone, Debug, PartialEq)]
pub struct Expected {
    /// Declared type of the link target.
    pub type_name: QualifiedName,
    pub schema_uri: Option<String>,
    /// Embedded payload. The resource is not fetched.
    pub payload: JsonValue,
}

impl Expected {
    /// Expectation passed down with the link. Only auto-expanded links
    /// carry one.
    #[must_use]
    pub fn from_link(link: &LinkEntry) -> Option<Self> {
        link.auto_expand.then(|| Self {
            type_name: link.target_type.clone(),
            schema_uri: link.schema_uri.clone(),
            payload: link.payload.clone(),
        })
    }
}

/// Result of validating one resource.
#[derive(Debug, Default)]
pub struct Validation {
    /// The resource was fetched and checked against its schema.
    pub success: bool,
    pub counters: Counters,
    pub results: Vec<ResourceResult>,
    pub links: Links,
}

/// Per-resource validation used by the traversal.
pub trait ResourceValidator: Send + Sync {
    /// Validate the resource at `uri`. `name` is the display name of
    /// the resource. With `expected` the resource must not be fetched.
    fn validate(
        &self,
        uri: &ODataId,
        name: &str,
        expected: Option<&Expected>,
    ) -> impl Future<Output = Validation> + Send;
}

/// Relationship link passed up for the final pass.
#[derive(Clone, Debug, PartialEq)]
pub struct DeferredLink {
    /// Display name of the resource the link was found in.
    pub from: String,
    pub name: LinkName,
    pub link: LinkEntry,
}

impl DeferredLink {
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} -> {}", self.from, self.name)
    }
}

/// Aggregated result of a (sub)tree.
#[derive(Debug, Default)]
pub struct TreeResult {
    /// Root and all strong links validated successfully.
    pub success: bool,
    pub counters: Counters,
    pub results: Vec<ResourceResult>,
    /// Relationship links found in the tree.
    pub deferred: Vec<DeferredLink>,
}

/// Set of URIs entered during one crawl.
#[derive(Debug, Default)]
pub struct VisitedSet(HashSet<ODataId>);

impl VisitedSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `uri` as entered. Returns `false` if it already was.
    pub fn insert(&mut self, uri: &ODataId) -> bool {
        if self.0.contains(uri) {
            false
        } else {
            self.0.insert(uri.clone())
        }
    }

    #[must_use]
    pub fn contains(&self, uri: &ODataId) -> bool {
        self.0.contains(uri)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Graph traversal over a [`ResourceValidator`].
pub struct UriTreeValidator<'a, V: ResourceValidator> {
    validator: &'a V,
}

impl<'a, V: ResourceValidator> UriTreeValidator<'a, V> {
    pub const fn new(validator: &'a V) -> Self {
        Self { validator }
    }

    /// Validate everything reachable from `uri`.
    ///
    /// Deferred relationship links are visited after the strong links
    /// of the whole tree. Failures in that pass are counted as
    /// `unvalidatedRef` and don't affect `success`. The returned
    /// `deferred` holds every relationship link seen during the crawl.
    pub async fn validate_tree(&self, uri: ODataId, name: &str) -> TreeResult {
        let mut visited = VisitedSet::new();
        visited.insert(&uri);
        let mut result = self.visit(&mut visited, uri, name.into(), None).await;

        let mut worklist = result.deferred.iter().cloned().collect::<VecDeque<_>>();
        while let Some(deferred) = worklist.pop_front() {
            let Some(target) = deferred.link.target.clone() else {
                warn!("relationship link {} has no @odata.id", deferred.display_name());
                continue;
            };
            if !visited.insert(&target) {
                continue;
            }
            result.counters.increment(Counter::RefLink);
            info!("{}: {target} (relationship)", deferred.display_name());
            let child = self
                .visit(
                    &mut visited,
                    target,
                    deferred.display_name(),
                    Expected::from_link(&deferred.link),
                )
                .await;
            if !child.success {
                result.counters.increment(Counter::UnvalidatedRef);
            }
            result.counters.merge(&child.counters);
            result.results.extend(child.results);
            worklist.extend(child.deferred.iter().cloned());
            result.deferred.extend(child.deferred);
        }
        result
    }

    fn visit<'b>(
        &'b self,
        visited: &'b mut VisitedSet,
        uri: ODataId,
        name: String,
        expected: Option<Expected>,
    ) -> BoxFuture<'b, TreeResult> {
        Box::pin(async move {
            let validation = self.validator.validate(&uri, &name, expected.as_ref()).await;
            let mut result = TreeResult {
                success: validation.success,
                counters: validation.counters,
                results: validation.results,
                deferred: Vec::new(),
            };
            for (link_name, link) in validation.links {
                if is_relationship(&link_name) {
                    result.deferred.push(DeferredLink {
                        from: name.clone(),
                        name: link_name,
                        link,
                    });
                    continue;
                }
                let child_name = format!("{name} -> {link_name}");
                let Some(target) = link.target.clone() else {
                    warn!("{child_name}: link has no @odata.id");
                    result.counters.increment(Counter::Unvalidated);
                    result.success = false;
                    continue;
                };
                if !visited.insert(&target) {
                    result.counters.increment(Counter::Repeat);
                    continue;
                }
                info!("{child_name}: {target}");
                let child = self
                    .visit(visited, target, child_name, Expected::from_link(&link))
                    .await;
                if !child.success {
                    result.counters.increment(Counter::Unvalidated);
                    result.success = false;
                }
                result.counters.merge(&child.counters);
                result.results.extend(child.results);
                result.deferred.extend(child.deferred);
            }
            result
        })
    }
}
