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

use crate::edmx::annotation::Annotation;
use crate::edmx::enum_type::EnumType;
use crate::edmx::structured_type::DeStructuredType;
use crate::edmx::structured_type::StructuredType;
use crate::edmx::Namespace;
use crate::edmx::SimpleIdentifier;
use crate::edmx::TypeRef;
use serde::Deserialize;
use std::collections::HashMap;

/// 5.1 Element edm:Schema
#[derive(Debug, Deserialize)]
pub struct DeSchema {
    #[serde(rename = "@Namespace")]
    pub namespace: Namespace,
    #[serde(rename = "@Alias")]
    pub alias: Option<String>,
    #[serde(rename = "EntityType", default)]
    pub entity_types: Vec<DeStructuredType>,
    #[serde(rename = "ComplexType", default)]
    pub complex_types: Vec<DeStructuredType>,
    #[serde(rename = "EnumType", default)]
    pub enum_types: Vec<EnumType>,
    #[serde(rename = "TypeDefinition", default)]
    pub type_definitions: Vec<TypeDefinition>,
    #[serde(rename = "Term", default)]
    pub terms: Vec<Term>,
}

/// 11.1 Element edm:TypeDefinition
#[derive(Debug, Deserialize)]
pub struct TypeDefinition {
    #[serde(rename = "@Name")]
    pub name: SimpleIdentifier,
    #[serde(rename = "@UnderlyingType")]
    pub underlying_type: TypeRef,
    #[serde(rename = "Annotation", default)]
    pub annotations: Vec<Annotation>,
}

/// 14.1 Element edm:Term
#[derive(Debug, Deserialize)]
pub struct Term {
    #[serde(rename = "@Name")]
    pub name: SimpleIdentifier,
    /// Absent type is treated as `Edm.String`.
    #[serde(rename = "@Type")]
    pub ttype: Option<TypeRef>,
    #[serde(rename = "Annotation", default)]
    pub annotations: Vec<Annotation>,
}

/// Named schema element.
#[derive(Debug)]
pub enum Type {
    EntityType(StructuredType),
    ComplexType(StructuredType),
    EnumType(EnumType),
    TypeDefinition(TypeDefinition),
    Term(Term),
}

/// Schema with its named elements.
#[derive(Debug)]
pub struct Schema {
    pub namespace: Namespace,
    pub alias: Option<String>,
    /// Names are unique within a schema; on a duplicate the last
    /// declaration of the same element kind wins.
    pub types: HashMap<SimpleIdentifier, Type>,
}

impl Schema {
    #[must_use]
    pub fn get(&self, name: &SimpleIdentifier) -> Option<&Type> {
        self.types.get(name)
    }

    #[must_use]
    pub fn entity_type(&self, name: &SimpleIdentifier) -> Option<&StructuredType> {
        match self.types.get(name) {
            Some(Type::EntityType(v)) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn complex_type(&self, name: &SimpleIdentifier) -> Option<&StructuredType> {
        match self.types.get(name) {
            Some(Type::ComplexType(v)) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn term(&self, name: &SimpleIdentifier) -> Option<&Term> {
        match self.types.get(name) {
            Some(Type::Term(v)) => Some(v),
            _ => None,
        }
    }
}

impl DeSchema {
    #[must_use]
    pub fn validate(self) -> Schema {
        let entity_types = self
            .entity_types
            .into_iter()
            .map(|v| Type::EntityType(v.into()));
        let complex_types = self
            .complex_types
            .into_iter()
            .map(|v| Type::ComplexType(v.into()));
        let types = entity_types
            .chain(complex_types)
            .chain(self.enum_types.into_iter().map(Type::EnumType))
            .chain(self.type_definitions.into_iter().map(Type::TypeDefinition))
            .chain(self.terms.into_iter().map(Type::Term))
            .map(|v| (v.name().clone(), v))
            .collect();
        Schema {
            namespace: self.namespace,
            alias: self.alias,
            types,
        }
    }
}

impl Type {
    #[must_use]
    pub const fn name(&self) -> &SimpleIdentifier {
        match self {
            Self::EntityType(v) | Self::ComplexType(v) => &v.name,
            Self::EnumType(v) => &v.name,
            Self::TypeDefinition(v) => &v.name,
            Self::Term(v) => &v.name,
        }
    }
}
