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

use crate::edmx::Namespace;
use crate::schema::document::SchemaDocument;
use crate::schema::document::SchemaSource;
use crate::Error;
use redfish_validator_core::Body;
use redfish_validator_core::Fetcher;
use std::collections::HashMap;
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use tokio::sync::OnceCell;
use tracing::debug;
use tracing::warn;

/// Suffix of local schema files: `<ShortNamespace>_v1.xml`.
pub const DEFAULT_SCHEMA_SUFFIX: &str = "_v1.xml";

/// Where and how schema documents are looked up.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Directory with local schema documents.
    pub schema_dir: Option<PathBuf>,
    /// File name suffix of local schema documents.
    pub suffix: String,
    /// Never fetch schema documents from the network.
    pub local_only: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            schema_dir: None,
            suffix: DEFAULT_SCHEMA_SUFFIX.into(),
            local_only: false,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub fn with_schema_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.schema_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    #[must_use]
    pub const fn with_local_only(mut self, local_only: bool) -> Self {
        self.local_only = local_only;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ResolveKey {
    namespace: String,
    uri: Option<String>,
    suffix: String,
}

type Cell = Arc<OnceCell<Arc<SchemaDocument>>>;

/// Process-wide memoized loader of schema documents.
///
/// Two levels are cached: requests `(namespace, uri, suffix)` and
/// loaded sources (remote URI without fragment, or local path). Each
/// key is populated at most once even when requested concurrently;
/// later requests get the same `Arc<SchemaDocument>`. Failures are not
/// cached.
pub struct DocumentCache<F: Fetcher> {
    fetcher: Arc<F>,
    config: CacheConfig,
    requests: Mutex<HashMap<ResolveKey, Cell>>,
    sources: Mutex<HashMap<SchemaSource, Cell>>,
}

impl<F: Fetcher> DocumentCache<F> {
    pub fn new(fetcher: Arc<F>, config: CacheConfig) -> Self {
        Self {
            fetcher,
            config,
            requests: Mutex::new(HashMap::new()),
            sources: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    #[must_use]
    pub const fn fetcher(&self) -> &Arc<F> {
        &self.fetcher
    }

    /// Resolve the document defining `namespace`.
    ///
    /// With `uri` (and remote lookups allowed) the document is fetched.
    /// If the URI has a fragment (`/redfish/v1/$metadata#Chassis.Chassis`),
    /// the fetched document is only used to find the real document: the
    /// fragment's namespace is looked up in its reference index and that
    /// document is returned. When a remote lookup fails and a schema
    /// directory is configured, the local document is used instead.
    ///
    /// Without `uri`, or in local-only mode, the document is read from
    /// the schema directory as `<ShortNamespace><suffix>`.
    ///
    /// # Errors
    ///
    /// `Error::SchemaUnavailable` if the document cannot be fetched,
    /// read or parsed, or if the fragment is not in the reference index.
    pub async fn resolve(
        &self,
        namespace: &str,
        uri: Option<&str>,
    ) -> Result<Arc<SchemaDocument>, Error> {
        let key = ResolveKey {
            namespace: namespace.into(),
            uri: uri.map(Into::into),
            suffix: self.config.suffix.clone(),
        };
        let cell = cell(&self.requests, key, namespace)?;
        cell.get_or_try_init(|| self.load(namespace, uri))
            .await
            .cloned()
    }

    /// Document that defines the schema `ns`, starting from `doc`.
    ///
    /// Stays in `doc` if it defines the schema. Otherwise follows the
    /// reference index of `doc` (full namespace, then short namespace),
    /// and falls back to the local schema directory.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`].
    pub async fn document_for(
        &self,
        doc: &Arc<SchemaDocument>,
        ns: &Namespace,
    ) -> Result<Arc<SchemaDocument>, Error> {
        if doc.schema(ns).is_some() {
            return Ok(doc.clone());
        }
        match doc.references().find(ns) {
            Some(entry) => {
                self.resolve(&entry.namespace.to_string(), Some(&entry.uri))
                    .await
            }
            None => self.resolve(&ns.to_string(), None).await,
        }
    }

    async fn load(&self, namespace: &str, uri: Option<&str>) -> Result<Arc<SchemaDocument>, Error> {
        match uri {
            Some(uri) if !self.config.local_only => match self.load_remote(uri).await {
                Ok(doc) => Ok(doc),
                Err(err) if self.config.schema_dir.is_some() => {
                    warn!("{err}; trying local schema for {namespace}");
                    self.load_local(namespace).await
                }
                Err(err) => Err(err),
            },
            _ => self.load_local(namespace).await,
        }
    }

    async fn load_remote(&self, uri: &str) -> Result<Arc<SchemaDocument>, Error> {
        let Some((base, fragment)) = uri.split_once('#') else {
            return self.load_source(SchemaSource::Remote(uri.into())).await;
        };
        let doc = self.load_source(SchemaSource::Remote(base.into())).await?;
        // `Chassis.v1_0_0.Chassis` as well as `Chassis/Members/$entity`.
        let type_path = fragment.split('/').next().unwrap_or_default();
        let ns = type_path
            .rsplit_once('.')
            .map_or(type_path, |(ns, _)| ns);
        let entry = doc.references().get(ns).ok_or_else(|| {
            Error::unavailable(uri, format!("no reference for namespace {ns}"))
        })?;
        debug!("schema {uri} resolved through reference to {}", entry.uri);
        self.load_source(SchemaSource::Remote(entry.uri.clone()))
            .await
    }

    async fn load_local(&self, namespace: &str) -> Result<Arc<SchemaDocument>, Error> {
        let dir = self
            .config
            .schema_dir
            .as_ref()
            .ok_or_else(|| Error::unavailable(namespace, "no local schema directory configured"))?;
        let short = namespace
            .trim_start_matches('#')
            .split('.')
            .next()
            .unwrap_or_default();
        let path = dir.join(format!("{short}{}", self.config.suffix));
        let doc = self.load_source(SchemaSource::Local(path.clone())).await?;
        match doc.first_namespace() {
            Some(found) if found.short() == short => Ok(doc),
            found => Err(Error::unavailable(
                namespace,
                format!(
                    "{} defines {} instead",
                    path.display(),
                    found.map_or_else(|| "no schema".into(), ToString::to_string)
                ),
            )),
        }
    }

    async fn load_source(&self, source: SchemaSource) -> Result<Arc<SchemaDocument>, Error> {
        let what = source.to_string();
        let cell = cell(&self.sources, source.clone(), &what)?;
        cell.get_or_try_init(|| async {
            debug!("loading schema document {what}");
            let text = match &source {
                SchemaSource::Remote(uri) => {
                    let fetched = self
                        .fetcher
                        .fetch(uri)
                        .await
                        .map_err(|err| Error::unavailable(uri.as_str(), err))?;
                    match fetched.body {
                        Body::Text(text) => text,
                        Body::Json(_) => {
                            return Err(Error::unavailable(uri.as_str(), "JSON instead of EDMX"))
                        }
                    }
                }
                SchemaSource::Local(path) => tokio::fs::read_to_string(path)
                    .await
                    .map_err(|err| Error::unavailable(what.as_str(), err))?,
            };
            SchemaDocument::parse(source.clone(), &text).map(Arc::new)
        })
        .await
        .cloned()
    }
}

fn cell<K: Eq + Hash>(map: &Mutex<HashMap<K, Cell>>, key: K, what: &str) -> Result<Cell, Error> {
    let mut map = map
        .lock()
        .map_err(|err| Error::unavailable(what, format!("schema cache: {err}")))?;
    Ok(map.entry(key).or_default().clone())
}
