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

//! Deserialization of Annotations

use crate::edmx::QualifiedName;
use serde::Deserialize;

/// 14.3 Element edm:Annotation
///
/// Only the expressions read by the resolver are kept: the boolean
/// constant of tag terms and the string records of
/// `Redfish.Enumeration`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Annotation {
    /// 14.3.1 Attribute Term
    #[serde(rename = "@Term")]
    pub term: QualifiedName,
    #[serde(rename = "@Bool")]
    pub bool_value: Option<bool>,
    #[serde(rename = "Collection")]
    pub collection: Option<AnnotationCollection>,
}

impl Annotation {
    /// Value of a tag-like annotation. `<Annotation Term="Redfish.Required"/>`
    /// has no explicit value and means `true`.
    #[must_use]
    pub fn tag_value(&self) -> bool {
        self.bool_value.unwrap_or(true)
    }
}

/// 14.5.3 Expression edm:Collection
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AnnotationCollection {
    #[serde(rename = "Record", default)]
    pub records: Vec<AnnotationRecord>,
}

/// 14.5.14 Expression edm:Record
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AnnotationRecord {
    #[serde(rename = "PropertyValue", default)]
    pub property_values: Vec<PropertyValue>,
}

/// 14.5.14.2 Element edm:PropertyValue
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PropertyValue {
    #[serde(rename = "@Property")]
    pub property: String,
    #[serde(rename = "@String")]
    pub string_value: Option<String>,
}
