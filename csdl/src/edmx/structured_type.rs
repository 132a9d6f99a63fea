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

use crate::edmx::property::Property;
use crate::edmx::Annotation;
use crate::edmx::QualifiedName;
use crate::edmx::SimpleIdentifier;
use serde::Deserialize;

/// 8.1 Element edm:EntityType / 9.1 Element edm:ComplexType
#[derive(Debug, Deserialize)]
pub struct DeStructuredType {
    #[serde(rename = "@Name")]
    pub name: SimpleIdentifier,
    #[serde(rename = "@BaseType")]
    pub base_type: Option<QualifiedName>,
    #[serde(rename = "Property", default)]
    pub properties: Vec<Property>,
    #[serde(rename = "NavigationProperty", default)]
    pub navigation_properties: Vec<Property>,
    #[serde(rename = "Annotation", default)]
    pub annotations: Vec<Annotation>,
}

/// Entity or complex type. Which of the two is recorded by
/// [`crate::edmx::Type`].
#[derive(Debug)]
pub struct StructuredType {
    pub name: SimpleIdentifier,
    pub base_type: Option<QualifiedName>,
    /// Structural properties followed by navigation properties, each
    /// in declaration order.
    pub properties: Vec<Property>,
    pub annotations: Vec<Annotation>,
}

impl StructuredType {
    /// Property by name. Structural properties come first, so they
    /// shadow navigation properties with the same name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name.inner() == name)
    }
}

impl From<DeStructuredType> for StructuredType {
    fn from(de: DeStructuredType) -> Self {
        let navigation = de.navigation_properties.into_iter().map(|p| Property {
            is_navigation: true,
            ..p
        });
        Self {
            name: de.name,
            base_type: de.base_type,
            properties: de.properties.into_iter().chain(navigation).collect(),
            annotations: de.annotations,
        }
    }
}
