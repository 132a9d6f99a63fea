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

//! Link Extractor
//!
//! Finds every outgoing link of a JSON payload using the resolved
//! property descriptors of its type. Navigation properties produce
//! links directly. Complex properties are descended into, so links
//! nested in structural properties (`Links.ComputerSystems`) are found
//! as well.
//!
//! Link names are paths into the payload:
//!
//! | Payload | Link name |
//! |---------|-----------|
//! | `"Thermal": {"@odata.id": ...}` | `Thermal` |
//! | `"Members": [{...}, {...}]` | `Members#0`, `Members#1` |
//! | `"Links": {"ContainedBy": {...}}` | `Links.ContainedBy` |
//! | `"Sensors": [{"RelatedItem": [{...}]}]` | `Sensors#0.RelatedItem#0` |

use redfish_validator_core::ODataId;
use redfish_validator_csdl::edmx::QualifiedName;
use redfish_validator_csdl::PropertyDescriptor;
use redfish_validator_csdl::PropertyMap;
use redfish_validator_csdl::ReferenceIndex;
use serde_json::Value as JsonValue;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use tagged_types::TaggedType;

/// Path of a link inside the payload it was found in.
pub type LinkName = TaggedType<String, LinkNameTag>;
#[derive(tagged_types::Tag)]
#[implement(Clone, Hash, PartialEq, Eq)]
#[transparent(Debug, Display)]
#[capability(inner_access)]
pub enum LinkNameTag {}

/// Leading path segments of relationship links. These links point to
/// resources that are reachable through their own containment
/// hierarchy, so they are validated in a separate pass.
pub const RELATIONSHIP_SEGMENTS: [&str; 3] = ["Links", "RelatedItem", "Redundancy"];

/// Whether the link is a relationship link (first path segment is one
/// of [`RELATIONSHIP_SEGMENTS`]).
#[must_use]
pub fn is_relationship(name: &LinkName) -> bool {
    let first = name
        .inner()
        .split(['.', '#'])
        .next()
        .unwrap_or_default();
    RELATIONSHIP_SEGMENTS.contains(&first)
}

/// One outgoing link.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkEntry {
    /// `@odata.id` of the link target. `None` if the payload doesn't
    /// carry one.
    pub target: Option<ODataId>,
    /// Target is embedded in the payload (`OData.AutoExpand`).
    pub auto_expand: bool,
    /// Declared type of the target (element type for collections).
    pub target_type: QualifiedName,
    /// URI of the schema document that defines `target_type`.
    pub schema_uri: Option<String>,
    /// Payload element that holds the link.
    pub payload: JsonValue,
}

/// Link names that appear twice in one payload.
#[derive(Debug, PartialEq, Eq)]
pub struct DuplicateLink(pub LinkName);

impl Display for DuplicateLink {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "link {} is found more than once", self.0)
    }
}

impl StdError for DuplicateLink {}

/// Links of a payload in discovery order. Names are unique.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Links {
    entries: Vec<(LinkName, LinkEntry)>,
    index: HashMap<LinkName, usize>,
}

impl Links {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add link.
    ///
    /// # Errors
    ///
    /// `DuplicateLink` if the name is already taken. The existing link
    /// is kept.
    pub fn insert(&mut self, name: LinkName, entry: LinkEntry) -> Result<(), DuplicateLink> {
        match self.index.entry(name) {
            Entry::Occupied(v) => Err(DuplicateLink(v.key().clone())),
            Entry::Vacant(v) => {
                self.entries.push((v.key().clone(), entry));
                v.insert(self.entries.len() - 1);
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn get(&self, name: &LinkName) -> Option<&LinkEntry> {
        self.index.get(name).map(|idx| &self.entries[*idx].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LinkName, &LinkEntry)> {
        self.entries.iter().map(|(n, e)| (n, e))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.inner().as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Links {
    type Item = (LinkName, LinkEntry);
    type IntoIter = std::vec::IntoIter<(LinkName, LinkEntry)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Extracts links from payloads of one schema document.
pub struct LinkExtractor<'a> {
    references: &'a ReferenceIndex,
    context: Option<&'a str>,
}

impl<'a> LinkExtractor<'a> {
    /// `references` is the reference index of the document that
    /// defines the payload type. Targets whose namespace is not
    /// referenced get `context` (the URI of that document) as schema
    /// URI.
    #[must_use]
    pub const fn new(references: &'a ReferenceIndex, context: Option<&'a str>) -> Self {
        Self {
            references,
            context,
        }
    }

    /// All links of the payload described by `properties`.
    ///
    /// # Errors
    ///
    /// `DuplicateLink` if two properties produce the same link name.
    pub fn extract(
        &self,
        payload: &JsonValue,
        properties: &PropertyMap,
    ) -> Result<Links, DuplicateLink> {
        let mut links = Links::new();
        self.collect(payload, properties, "", &mut links)?;
        Ok(links)
    }

    fn collect(
        &self,
        payload: &JsonValue,
        properties: &PropertyMap,
        prefix: &str,
        links: &mut Links,
    ) -> Result<(), DuplicateLink> {
        for (path, descriptor) in properties.iter() {
            let Some(value) = payload.get(&path.name).filter(|v| !v.is_null()) else {
                continue;
            };
            let name = format!("{prefix}{}", path.name);
            if descriptor.is_nav {
                self.navigation(value, descriptor, &name, links)?;
            } else if let Some(nested) = descriptor.real_type.complex() {
                match value {
                    JsonValue::Array(items) => {
                        for (idx, item) in items.iter().enumerate() {
                            self.collect(item, nested, &format!("{name}#{idx}."), links)?;
                        }
                    }
                    JsonValue::Object(_) => {
                        self.collect(value, nested, &format!("{name}."), links)?;
                    }
                    _ => (),
                }
            }
        }
        Ok(())
    }

    fn navigation(
        &self,
        value: &JsonValue,
        descriptor: &PropertyDescriptor,
        name: &str,
        links: &mut Links,
    ) -> Result<(), DuplicateLink> {
        if descriptor.is_collection.is_some() {
            let items = value.as_array().map(Vec::as_slice).unwrap_or_default();
            for (idx, item) in items.iter().enumerate().filter(|(_, v)| !v.is_null()) {
                links.insert(
                    LinkName::new(format!("{name}#{idx}")),
                    self.entry(item, descriptor),
                )?;
            }
            Ok(())
        } else {
            links.insert(LinkName::new(name.into()), self.entry(value, descriptor))
        }
    }

    fn entry(&self, value: &JsonValue, descriptor: &PropertyDescriptor) -> LinkEntry {
        let target_type = descriptor.target_type().clone();
        let schema_uri = self
            .references
            .find(&target_type.namespace)
            .map(|entry| entry.uri.clone())
            .or_else(|| self.context.map(Into::into));
        LinkEntry {
            target: target(value),
            auto_expand: descriptor.is_auto_expand(),
            target_type,
            schema_uri,
            payload: value.clone(),
        }
    }
}

/// `@odata.id` of a link object, or the value itself when the link is
/// given as a plain string.
fn target(value: &JsonValue) -> Option<ODataId> {
    match value {
        JsonValue::String(id) => Some(ODataId::from(id.as_str())),
        _ => value
            .get("@odata.id")
            .and_then(JsonValue::as_str)
            .map(ODataId::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redfish_validator_csdl::edmx::TypeRef;
    use redfish_validator_csdl::schema::descriptor::PropertyAttributes;
    use redfish_validator_csdl::PropertyPath;
    use redfish_validator_csdl::RealType;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn descriptor(type_name: &str, is_nav: bool, real_type: RealType) -> PropertyDescriptor {
        let type_name: TypeRef = type_name.parse().unwrap();
        let is_collection = type_name
            .is_collection()
            .then(|| type_name.qualified_name().clone());
        PropertyDescriptor {
            attributes: PropertyAttributes {
                name: String::new(),
                type_name,
                nullable: None,
            },
            annotations: BTreeMap::new(),
            is_nav,
            is_collection,
            real_type,
        }
    }

    fn map(entries: Vec<(&str, PropertyDescriptor)>) -> PropertyMap {
        entries
            .into_iter()
            .map(|(name, d)| (format!("Test.v1_0_0.Test:{name}").parse::<PropertyPath>().unwrap(), d))
            .collect()
    }

    #[test]
    fn test_relationship_links() {
        for name in ["Links.Chassis#0", "Links", "RelatedItem#2", "Redundancy#0.Members#1"] {
            assert!(is_relationship(&LinkName::new(name.into())), "{name}");
        }
        for name in ["Thermal", "Members#0", "Sensors#0.RelatedItem#0", "PCIeLinks.X", "Linksys"] {
            assert!(!is_relationship(&LinkName::new(name.into())), "{name}");
        }
    }

    #[test]
    fn test_scalar_and_string_targets() {
        let props = map(vec![
            ("Thermal", descriptor("Thermal.Thermal", true, RealType::Entity)),
            ("Power", descriptor("Power.Power", true, RealType::Entity)),
            ("Name", descriptor("Edm.String", false, RealType::Primitive(QualifiedName::edm("String")))),
        ]);
        let payload = json!({
            "Name": "chassis",
            "Thermal": {"@odata.id": "/redfish/v1/Chassis/1/Thermal"},
            "Power": "/redfish/v1/Chassis/1/Power",
        });
        let references = ReferenceIndex::default();
        let links = LinkExtractor::new(&references, Some("/redfish/v1/$metadata"))
            .extract(&payload, &props)
            .unwrap();
        assert_eq!(links.names().collect::<Vec<_>>(), vec!["Thermal", "Power"]);
        let power = links.get(&LinkName::new("Power".into())).unwrap();
        assert_eq!(power.target, Some(ODataId::from("/redfish/v1/Chassis/1/Power")));
        assert_eq!(power.schema_uri.as_deref(), Some("/redfish/v1/$metadata"));
        assert!(!power.auto_expand);
    }

    #[test]
    fn test_missing_odata_id() {
        let props = map(vec![("Thermal", descriptor("Thermal.Thermal", true, RealType::Entity))]);
        let references = ReferenceIndex::default();
        let links = LinkExtractor::new(&references, None)
            .extract(&json!({"Thermal": {"Name": "x"}}), &props)
            .unwrap();
        let thermal = links.get(&LinkName::new("Thermal".into())).unwrap();
        assert_eq!(thermal.target, None);
        assert_eq!(thermal.schema_uri, None);
    }

    #[test]
    fn test_complex_without_navigation() {
        let status = map(vec![(
            "Health",
            descriptor("Edm.String", false, RealType::Primitive(QualifiedName::edm("String"))),
        )]);
        let props = map(vec![(
            "Status",
            descriptor("Resource.Status", false, RealType::Complex(status)),
        )]);
        let references = ReferenceIndex::default();
        let links = LinkExtractor::new(&references, None)
            .extract(&json!({"Status": {"Health": "OK"}}), &props)
            .unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_duplicate_link_is_reported() {
        let mut links = Links::new();
        let entry = LinkEntry {
            target: None,
            auto_expand: false,
            target_type: "Thermal.Thermal".parse().unwrap(),
            schema_uri: None,
            payload: JsonValue::Null,
        };
        links.insert(LinkName::new("A".into()), entry.clone()).unwrap();
        links.insert(LinkName::new("B".into()), entry.clone()).unwrap();
        let err = links.insert(LinkName::new("A".into()), entry).unwrap_err();
        assert_eq!(err.to_string(), "link A is found more than once");
        assert_eq!(links.len(), 2);
        assert_eq!(links.names().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_null_links_are_skipped() {
        let props = map(vec![
            ("Thermal", descriptor("Thermal.Thermal", true, RealType::Entity)),
            ("Members", descriptor("Collection(Thermal.Thermal)", true, RealType::Entity)),
            ("Status", descriptor("Resource.Status", false, RealType::Complex(PropertyMap::new()))),
        ]);
        let payload = json!({
            "Thermal": null,
            "Members": [{"@odata.id": "/redfish/v1/A"}, null, {"@odata.id": "/redfish/v1/C"}],
            "Status": null,
        });
        let references = ReferenceIndex::default();
        let links = LinkExtractor::new(&references, None)
            .extract(&payload, &props)
            .unwrap();
        assert_eq!(links.names().collect::<Vec<_>>(), vec!["Members#0", "Members#2"]);
    }
}
