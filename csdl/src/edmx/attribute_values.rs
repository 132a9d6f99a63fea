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

//! Types defined in 17 Attribute Values

use serde::de::Error as DeError;
use serde::de::Visitor;
use serde::Deserialize;
use serde::Deserializer;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::str::FromStr;

#[derive(Debug)]
pub enum Error {
    InvalidSimpleIdentifier(String),
    InvalidQualifiedIdentifier(String),
    InvalidTypeReference(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::InvalidSimpleIdentifier(id) => write!(f, "invalid simple identifier {id}"),
            Self::InvalidQualifiedIdentifier(id) => write!(f, "invalid qualified identifier {id}"),
            Self::InvalidTypeReference(id) => write!(f, "invalid type reference {id}"),
        }
    }
}

impl std::error::Error for Error {}

/// Implements `Deserialize` through `FromStr` for attribute value types.
macro_rules! deserialize_from_str {
    ($t:ty, $expecting:literal) => {
        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
                struct StrVisitor {}
                impl Visitor<'_> for StrVisitor {
                    type Value = $t;

                    fn expecting(&self, formatter: &mut Formatter) -> FmtResult {
                        formatter.write_str($expecting)
                    }
                    fn visit_str<E: DeError>(self, value: &str) -> Result<Self::Value, E> {
                        value.parse().map_err(DeError::custom)
                    }
                }

                de.deserialize_string(StrVisitor {})
            }
        }
    };
}

/// 17.1 `Namespace`
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Namespace {
    pub ids: Vec<SimpleIdentifier>,
}

impl Namespace {
    /// The EDM built-in namespace holding the primitive types.
    #[must_use]
    pub fn is_edm(&self) -> bool {
        self.ids.len() == 1 && self.ids[0].inner() == "Edm"
    }

    /// Leading segment of the namespace. `Resource.v1_0_0` has
    /// `Resource` as its short namespace.
    #[must_use]
    pub fn short(&self) -> &str {
        self.ids.first().map_or("", SimpleIdentifier::as_ref)
    }

    /// Whether the namespace consists of exactly one segment `id`.
    #[must_use]
    pub fn is_single(&self, id: &str) -> bool {
        self.ids.len() == 1 && self.ids[0].inner() == id
    }
}

impl FromStr for Namespace {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            ids: s
                .split('.')
                .map(SimpleIdentifier::from_str)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut iter = self.ids.iter();
        if let Some(v) = iter.next() {
            v.fmt(f)?;
        }
        for v in iter {
            ".".fmt(f)?;
            v.fmt(f)?;
        }
        Ok(())
    }
}

deserialize_from_str!(Namespace, "Namespace string");

/// 17.2 `SimpleIdentifier`
#[derive(Clone, Debug, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct SimpleIdentifier(String);

impl SimpleIdentifier {
    #[must_use]
    pub const fn inner(&self) -> &String {
        &self.0
    }
}

impl Display for SimpleIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.0.fmt(f)
    }
}

impl AsRef<str> for SimpleIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for SimpleIdentifier {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();

        // Starts with a letter or underscore, followed by letters,
        // underscores or digits. Max length is not checked.
        chars
            .next()
            .filter(|first| first.is_alphabetic() || *first == '_')
            .ok_or_else(|| Error::InvalidSimpleIdentifier(s.into()))?;

        if chars.any(|c| !c.is_alphanumeric() && c != '_') {
            Err(Error::InvalidSimpleIdentifier(s.into()))
        } else {
            Ok(Self(s.into()))
        }
    }
}

deserialize_from_str!(SimpleIdentifier, "SimpleIdentifier string");

/// 17.3 `QualifiedName`
///
/// A leading `#` (as found in `@odata.type` values and some
/// `BaseType` attributes) is accepted and dropped.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifiedName {
    pub namespace: Namespace,
    pub name: SimpleIdentifier,
}

impl QualifiedName {
    #[must_use]
    pub const fn new(namespace: Namespace, name: SimpleIdentifier) -> Self {
        Self { namespace, name }
    }

    /// EDM primitive type such as `Edm.String`.
    #[must_use]
    pub fn edm(name: &str) -> Self {
        Self {
            namespace: Namespace {
                ids: vec![SimpleIdentifier("Edm".into())],
            },
            name: SimpleIdentifier(name.into()),
        }
    }

    #[must_use]
    pub fn is_edm(&self) -> bool {
        self.namespace.is_edm()
    }
}

impl FromStr for QualifiedName {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ids = s
            .strip_prefix('#')
            .unwrap_or(s)
            .split('.')
            .map(SimpleIdentifier::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| Error::InvalidQualifiedIdentifier(s.into()))?;
        let name = ids
            .pop()
            .ok_or_else(|| Error::InvalidQualifiedIdentifier(s.into()))?;
        if ids.is_empty() {
            return Err(Error::InvalidQualifiedIdentifier(s.into()));
        }
        Ok(Self {
            namespace: Namespace { ids },
            name,
        })
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

deserialize_from_str!(QualifiedName, "QualifiedName string");

/// 17.4 `TypeName`, parsed once into the shape the resolver
/// dereferences: primitive (EDM namespace), collection of an inner
/// type, or a named schema type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(QualifiedName),
    Collection(Box<TypeRef>),
    Named(QualifiedName),
}

impl TypeRef {
    /// The qualified name with all collection levels removed.
    #[must_use]
    pub fn qualified_name(&self) -> &QualifiedName {
        match self {
            Self::Primitive(v) | Self::Named(v) => v,
            Self::Collection(inner) => inner.qualified_name(),
        }
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }
}

impl From<QualifiedName> for TypeRef {
    fn from(qname: QualifiedName) -> Self {
        if qname.is_edm() {
            Self::Primitive(qname)
        } else {
            Self::Named(qname)
        }
    }
}

impl FromStr for TypeRef {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const COLLECTION_PREFIX: &str = "Collection(";
        const COLLECTION_SUFFIX: &str = ")";
        if let Some(inner) = s
            .strip_prefix(COLLECTION_PREFIX)
            .and_then(|v| v.strip_suffix(COLLECTION_SUFFIX))
        {
            let inner = inner
                .parse()
                .map_err(|_| Error::InvalidTypeReference(s.into()))?;
            Ok(Self::Collection(Box::new(inner)))
        } else {
            s.parse::<QualifiedName>().map(Into::into)
        }
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Primitive(v) | Self::Named(v) => v.fmt(f),
            Self::Collection(inner) => write!(f, "Collection({inner})"),
        }
    }
}

deserialize_from_str!(TypeRef, "property type string");
