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

use crate::edmx::Edmx;
use crate::edmx::Include;
use crate::edmx::Namespace;
use crate::edmx::Reference;
use crate::Error;
use std::collections::HashMap;
use tracing::error;

/// Where an included namespace is defined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceEntry {
    /// Full namespace as declared by `edmx:Include`.
    pub namespace: Namespace,
    /// URI of the document that defines the namespace.
    pub uri: String,
}

/// Mapping from alias or namespace to the document declaring it.
///
/// An include with an alias is registered under the alias only.
/// Without alias it is registered under the full namespace and under
/// its short (leading segment) namespace. On a key collision the
/// later declaration wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceIndex {
    entries: HashMap<String, ReferenceEntry>,
}

impl ReferenceIndex {
    /// Build the index from the document's top-level references.
    /// Malformed declarations are logged and skipped.
    #[must_use]
    pub fn build(edmx: &Edmx) -> Self {
        let mut entries = HashMap::new();
        for reference in &edmx.references {
            for include in &reference.includes {
                match Self::entry(reference, include) {
                    Ok(entry) => {
                        if let Some(alias) = &include.alias {
                            entries.insert(alias.clone(), entry);
                        } else {
                            entries.insert(entry.namespace.to_string(), entry.clone());
                            entries.insert(entry.namespace.short().to_string(), entry);
                        }
                    }
                    Err(err) => error!("{err}"),
                }
            }
        }
        Self { entries }
    }

    fn entry(reference: &Reference, include: &Include) -> Result<ReferenceEntry, Error> {
        let uri = reference.uri.as_ref().ok_or_else(|| {
            Error::MalformedReference(format!(
                "edmx:Reference without Uri includes {}",
                include.namespace.as_deref().unwrap_or("<none>")
            ))
        })?;
        let namespace = include
            .namespace
            .as_ref()
            .ok_or_else(|| Error::MalformedReference(format!("edmx:Include without Namespace in {uri}")))?;
        let namespace = namespace.parse().map_err(|err| {
            Error::MalformedReference(format!("edmx:Include in {uri}: {err}"))
        })?;
        Ok(ReferenceEntry {
            namespace,
            uri: uri.clone(),
        })
    }

    /// Lookup by alias or namespace string.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ReferenceEntry> {
        self.entries.get(key)
    }

    /// Lookup by full namespace, falling back to the short namespace.
    #[must_use]
    pub fn find(&self, ns: &Namespace) -> Option<&ReferenceEntry> {
        self.entries
            .get(&ns.to_string())
            .or_else(|| self.entries.get(ns.short()))
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

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
        <edmx:Edmx Version="4.0">
          <edmx:Reference Uri="http://docs.oasis-open.org/odata/odata/v4.0/errata03/csd01/complete/vocabularies/Org.OData.Core.V1.xml">
            <edmx:Include Namespace="Org.OData.Core.V1" Alias="OData"/>
          </edmx:Reference>
          <edmx:Reference Uri="/redfish/v1/Schemas/Resource_v1.xml">
            <edmx:Include Namespace="Resource"/>
            <edmx:Include Namespace="Resource.v1_0_0"/>
          </edmx:Reference>
          <edmx:Reference Uri="/redfish/v1/Schemas/Resource_v2.xml">
            <edmx:Include Namespace="Resource.v1_1_0"/>
          </edmx:Reference>
          <edmx:Reference>
            <edmx:Include Namespace="Broken"/>
          </edmx:Reference>
          <edmx:Reference Uri="/redfish/v1/Schemas/NoNs_v1.xml">
            <edmx:Include Alias="NoNs"/>
          </edmx:Reference>
          <edmx:DataServices>
            <Schema Namespace="Test"/>
          </edmx:DataServices>
        </edmx:Edmx>"#;

    #[test]
    fn test_build() {
        let edmx = Edmx::parse(DOC).unwrap();
        let refs = ReferenceIndex::build(&edmx);

        let odata = refs.get("OData").unwrap();
        assert_eq!(odata.namespace.to_string(), "Org.OData.Core.V1");
        assert!(refs.get("Org.OData.Core.V1").is_none());
        assert!(refs.get("Org").is_none());

        let res = refs.get("Resource.v1_0_0").unwrap();
        assert_eq!(res.uri, "/redfish/v1/Schemas/Resource_v1.xml");

        // Short namespace: last writer wins.
        let short = refs.get("Resource").unwrap();
        assert_eq!(short.namespace.to_string(), "Resource.v1_1_0");
        assert_eq!(short.uri, "/redfish/v1/Schemas/Resource_v2.xml");

        assert!(refs.get("Broken").is_none());
        assert!(refs.get("NoNs").is_none());
        assert_eq!(refs.len(), 4);
    }

    #[test]
    fn test_find_falls_back_to_short() {
        let edmx = Edmx::parse(DOC).unwrap();
        let refs = ReferenceIndex::build(&edmx);
        let ns: Namespace = "Resource.v1_5_0".parse().unwrap();
        assert_eq!(
            refs.find(&ns).unwrap().uri,
            "/redfish/v1/Schemas/Resource_v2.xml"
        );
    }
}
