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

//! EDMX documents as far as schema resolution reads them.
//!
//! Only the elements that take part in type resolution are modelled:
//! references with their includes, schemas, entity, complex and enum
//! types, type definitions, terms, properties and annotations. Any
//! other element (entity containers, actions, out-of-line annotations,
//! keys, referential constraints, ...) is skipped by the deserializer.

/// 5 Schema, 11 Type Definition and 14.1 Term
pub mod schema;

/// 6 Structural Property / 7 Navigation Property
pub mod property;

/// 8 Entity Type / 9 Complex Type
pub mod structured_type;

/// 10 Enumeration Type
pub mod enum_type;

/// 14.3 Element edm:Annotation
pub mod annotation;

/// 17 Attribute Values
pub mod attribute_values;

use quick_xml::DeError;
use schema::DeSchema;
use serde::Deserialize;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

pub use annotation::Annotation;
pub use attribute_values::Namespace;
pub use attribute_values::QualifiedName;
pub use attribute_values::SimpleIdentifier;
pub use attribute_values::TypeRef;
pub use enum_type::EnumType;
pub use property::Property;
pub use schema::Schema;
pub use schema::Term;
pub use schema::Type;
pub use schema::TypeDefinition;
pub use structured_type::StructuredType;

pub type PropertyName = SimpleIdentifier;

/// EDMX validation errors.
#[derive(Debug)]
pub enum ValidateError {
    /// XML deserialization error.
    XmlDeserialize(DeError),
    /// `edmx:Edmx` must hold exactly one `edmx:DataServices`.
    WrongDataServicesNumber(usize),
}

impl Display for ValidateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::XmlDeserialize(err) => write!(f, "xml deserialization error: {err}"),
            Self::WrongDataServicesNumber(n) => {
                write!(f, "expected one edmx:DataServices element, found {n}")
            }
        }
    }
}

impl StdError for ValidateError {}

#[derive(Debug, Deserialize)]
struct DeEdmx {
    #[serde(rename = "DataServices", default)]
    data_services: Vec<DeDataServices>,
    #[serde(rename = "Reference", default)]
    references: Vec<Reference>,
}

#[derive(Debug, Deserialize)]
struct DeDataServices {
    #[serde(rename = "Schema", default)]
    schemas: Vec<DeSchema>,
}

/// 3.3 Element edmx:Reference
///
/// `Uri` is required by the format but optional here: a reference
/// without it is reported when the reference index is built and the
/// rest of the document stays usable.
#[derive(Clone, Debug, Deserialize)]
pub struct Reference {
    #[serde(rename = "@Uri")]
    pub uri: Option<String>,
    #[serde(rename = "Include", default)]
    pub includes: Vec<Include>,
}

/// 3.4 Element edmx:Include
#[derive(Clone, Debug, Deserialize)]
pub struct Include {
    #[serde(rename = "@Namespace")]
    pub namespace: Option<String>,
    #[serde(rename = "@Alias")]
    pub alias: Option<String>,
}

/// Parsed `edmx:Edmx` document.
#[derive(Debug)]
pub struct Edmx {
    pub schemas: Vec<Schema>,
    /// References in document declaration order.
    pub references: Vec<Reference>,
}

impl Edmx {
    /// # Errors
    ///
    /// XML error, or `WrongDataServicesNumber` unless the document has
    /// exactly one `edmx:DataServices`.
    pub fn parse(data: &str) -> Result<Self, ValidateError> {
        let de = quick_xml::de::from_str::<DeEdmx>(data).map_err(ValidateError::XmlDeserialize)?;
        let [data_services] = <[DeDataServices; 1]>::try_from(de.data_services)
            .map_err(|v| ValidateError::WrongDataServicesNumber(v.len()))?;
        Ok(Self {
            schemas: data_services
                .schemas
                .into_iter()
                .map(DeSchema::validate)
                .collect(),
            references: de.references,
        })
    }

    /// Schema by namespace, or by alias when no namespace matches.
    #[must_use]
    pub fn schema(&self, ns: &Namespace) -> Option<&Schema> {
        self.schemas.iter().find(|s| &s.namespace == ns).or_else(|| {
            self.schemas
                .iter()
                .find(|s| s.alias.as_ref().is_some_and(|a| ns.is_single(a)))
        })
    }
}
