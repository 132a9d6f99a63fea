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
use crate::edmx::TypeRef;
use crate::Error;
use std::collections::hash_map::Entry;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::str::FromStr;

/// `Owner:Property` reference to a property of a type. The owner is the
/// qualified type name (entity type, complex type or term).
///
/// The property name is not restricted to simple identifiers: payload
/// annotations are addressed as `Namespace.Term:Property@Namespace.Term`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyPath {
    pub owner: QualifiedName,
    pub name: String,
}

impl PropertyPath {
    #[must_use]
    pub const fn new(owner: QualifiedName, name: String) -> Self {
        Self { owner, name }
    }

    /// Name that refers to the owner element itself rather than to
    /// one of its properties.
    #[must_use]
    pub fn is_annotation(&self) -> bool {
        self.name.contains('@')
    }
}

impl FromStr for PropertyPath {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidPropertyPath(s.into()))?;
        if name.is_empty() {
            return Err(Error::InvalidPropertyPath(s.into()));
        }
        let owner = owner
            .parse()
            .map_err(|_| Error::InvalidPropertyPath(s.into()))?;
        Ok(Self {
            owner,
            name: name.into(),
        })
    }
}

impl Display for PropertyPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}:{}", self.owner, self.name)
    }
}

/// Raw attributes of the schema element describing the property.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyAttributes {
    pub name: String,
    /// Declared type. For annotation lookups on an entity or complex
    /// type this is the owner type itself.
    pub type_name: TypeRef,
    pub nullable: Option<bool>,
}

/// Terminal kind of the property type after following type
/// definitions and collections.
#[derive(Clone, Debug, PartialEq)]
pub enum RealType {
    /// EDM primitive type, e.g. `Edm.String`.
    Primitive(QualifiedName),
    /// Members of an `edm:EnumType`.
    Enum(Vec<String>),
    /// `Edm.String` type definition annotated with
    /// `Redfish.Enumeration`, with the listed members.
    DeprecatedEnum(Vec<String>),
    /// Nested properties of a complex type including inherited ones.
    Complex(PropertyMap),
    /// Reference to an entity. Entities are not expanded.
    Entity,
}

impl RealType {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::Enum(_) => "enum",
            Self::DeprecatedEnum(_) => "deprecatedEnum",
            Self::Complex(_) => "complex",
            Self::Entity => "entity",
        }
    }

    #[must_use]
    pub const fn complex(&self) -> Option<&PropertyMap> {
        match self {
            Self::Complex(map) => Some(map),
            _ => None,
        }
    }
}

/// Fully resolved description of one property.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyDescriptor {
    pub attributes: PropertyAttributes,
    /// Annotations of the property element keyed by term.
    pub annotations: BTreeMap<String, Annotation>,
    pub is_nav: bool,
    /// Element type if the declared type is a collection.
    pub is_collection: Option<QualifiedName>,
    pub real_type: RealType,
}

impl PropertyDescriptor {
    /// `OData.AutoExpand`: the link target is embedded in the payload.
    #[must_use]
    pub fn is_auto_expand(&self) -> bool {
        self.annotations.is_auto_expand()
    }

    /// `Redfish.Required`: the property must be present in payloads.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.annotations.is_required()
    }

    /// Type name of the link target: the collection element type for
    /// collections, the declared type otherwise.
    #[must_use]
    pub fn target_type(&self) -> &QualifiedName {
        self.is_collection
            .as_ref()
            .unwrap_or_else(|| self.attributes.type_name.qualified_name())
    }
}

/// Ordered mapping from property path to descriptor. Insertion order
/// is kept; inserting an existing path replaces the descriptor in
/// place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyMap {
    entries: Vec<(PropertyPath, PropertyDescriptor)>,
    index: HashMap<PropertyPath, usize>,
}

impl PropertyMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: PropertyPath, descriptor: PropertyDescriptor) {
        match self.index.entry(path) {
            Entry::Occupied(v) => self.entries[*v.get()].1 = descriptor,
            Entry::Vacant(v) => {
                self.entries.push((v.key().clone(), descriptor));
                v.insert(self.entries.len() - 1);
            }
        }
    }

    #[must_use]
    pub fn get(&self, path: &PropertyPath) -> Option<&PropertyDescriptor> {
        self.index.get(path).map(|idx| &self.entries[*idx].1)
    }

    /// Descriptor by bare property name, regardless of the owner.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.entries
            .iter()
            .find(|(p, _)| p.name == name)
            .map(|(_, d)| d)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyPath, &PropertyDescriptor)> {
        self.entries.iter().map(|(p, d)| (p, d))
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

impl FromIterator<(PropertyPath, PropertyDescriptor)> for PropertyMap {
    fn from_iter<T: IntoIterator<Item = (PropertyPath, PropertyDescriptor)>>(iter: T) -> Self {
        iter.into_iter().fold(Self::new(), |mut map, (p, d)| {
            map.insert(p, d);
            map
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primitive(name: &str) -> PropertyDescriptor {
        let edm_string: QualifiedName = "Edm.String".parse().unwrap();
        PropertyDescriptor {
            attributes: PropertyAttributes {
                name: name.into(),
                type_name: TypeRef::Primitive(edm_string.clone()),
                nullable: None,
            },
            annotations: BTreeMap::new(),
            is_nav: false,
            is_collection: None,
            real_type: RealType::Primitive(edm_string),
        }
    }

    #[test]
    fn test_property_path() {
        let p: PropertyPath = "#Chassis.v1_0_0.Chassis:Name".parse().unwrap();
        assert_eq!(p.owner.to_string(), "Chassis.v1_0_0.Chassis");
        assert_eq!(p.name, "Name");
        assert_eq!(p.to_string(), "Chassis.v1_0_0.Chassis:Name");
        assert!(!p.is_annotation());

        let p: PropertyPath = "Redfish.Deprecated:Status@Redfish.Deprecated".parse().unwrap();
        assert!(p.is_annotation());

        assert!("Chassis.Chassis".parse::<PropertyPath>().is_err());
        assert!("Chassis.Chassis:".parse::<PropertyPath>().is_err());
        assert!("Chassis:Name".parse::<PropertyPath>().is_err());
    }

    #[test]
    fn test_property_map_order_and_replace() {
        let owner: QualifiedName = "A.v1_0_0.A".parse().unwrap();
        let mut map = PropertyMap::new();
        map.insert(PropertyPath::new(owner.clone(), "B".into()), primitive("B"));
        map.insert(PropertyPath::new(owner.clone(), "A".into()), primitive("A"));
        let mut replaced = primitive("B");
        replaced.is_nav = true;
        map.insert(PropertyPath::new(owner.clone(), "B".into()), replaced);

        let names = map.iter().map(|(p, _)| p.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["B", "A"]);
        assert!(map.by_name("B").unwrap().is_nav);
        assert!(map.get(&PropertyPath::new(owner.clone(), "B".into())).unwrap().is_nav);
        assert!(map.get(&PropertyPath::new(owner, "C".into())).is_none());
        assert_eq!(map.len(), 2);
    }
}
