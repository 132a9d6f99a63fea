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

//! Helpers of handling annotations in edmx types and resolved
//! descriptors.

use crate::edmx::Annotation;
use crate::edmx::Namespace;
use std::collections::BTreeMap;

pub trait TermNamespace {
    fn is_term_namespace(&self, id: &str) -> bool;
}

impl TermNamespace for Namespace {
    fn is_term_namespace(&self, id: &str) -> bool {
        self.is_single(id)
    }
}

pub trait ODataAnnotation {
    fn is_odata_annotation(&self, name: &str) -> bool;
    fn is_redfish_annotation(&self, name: &str) -> bool;
}

impl ODataAnnotation for Annotation {
    fn is_odata_annotation(&self, name: &str) -> bool {
        self.term.namespace.is_term_namespace("OData") && self.term.name.inner() == name
    }

    fn is_redfish_annotation(&self, name: &str) -> bool {
        self.term.namespace.is_term_namespace("Redfish") && self.term.name.inner() == name
    }
}

/// Annotation accessors shared by schema elements.
pub trait ODataAnnotations {
    fn annotations(&self) -> impl Iterator<Item = &Annotation>;

    /// `OData.AutoExpand`: the payload embeds the referenced resource.
    fn is_auto_expand(&self) -> bool {
        self.annotations()
            .any(|a| a.is_odata_annotation("AutoExpand") && a.tag_value())
    }

    /// `Redfish.Required`: the property must be present in payloads.
    fn is_required(&self) -> bool {
        self.annotations()
            .any(|a| a.is_redfish_annotation("Required") && a.tag_value())
    }

    /// Member list of a `Redfish.Enumeration` annotation. These are
    /// used by string type definitions that predate enum types.
    fn redfish_enumeration(&self) -> Option<Vec<String>> {
        self.annotations()
            .find(|a| a.is_redfish_annotation("Enumeration"))
            .map(|a| {
                a.collection
                    .iter()
                    .flat_map(|c| c.records.iter())
                    .flat_map(|r| r.property_values.iter())
                    .filter_map(|pv| pv.string_value.clone())
                    .collect()
            })
    }
}

impl ODataAnnotations for [Annotation] {
    fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.iter()
    }
}

impl ODataAnnotations for Vec<Annotation> {
    fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.iter()
    }
}

impl ODataAnnotations for BTreeMap<String, Annotation> {
    fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation(xml: &str) -> Annotation {
        quick_xml::de::from_str(xml).unwrap()
    }

    #[test]
    fn test_property_annotations() {
        let anns = vec![
            annotation(r#"<Annotation Term="OData.Permissions" EnumMember="OData.Permission/ReadWrite"/>"#),
            annotation(r#"<Annotation Term="Redfish.Required"/>"#),
        ];
        assert!(anns.is_required());
        assert!(!anns.is_auto_expand());
    }

    #[test]
    fn test_auto_expand_false() {
        let anns = vec![annotation(r#"<Annotation Term="OData.AutoExpand" Bool="false"/>"#)];
        assert!(!anns.is_auto_expand());
        let anns = vec![annotation(r#"<Annotation Term="OData.AutoExpand"/>"#)];
        assert!(anns.is_auto_expand());
    }
}
