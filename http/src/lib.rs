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

//! HTTP implementation of the [`Fetcher`] collaborator.
//!
//! [`HttpFetcher`] turns service paths and absolute URLs into GET
//! requests through an [`HttpClient`] and applies the request policy
//! of the validator:
//!
//! - Paths (`/redfish/v1/Chassis`) are appended to the service base URL.
//!   Absolute URLs (`http://…`, `https://…`) are out of the service and
//!   are refused in service-only mode.
//! - Credentials are sent only over HTTPS, only to the service itself
//!   and never to the discovery endpoints that must work without
//!   authentication (`/redfish`, `/redfish/v1`, `/redfish/v1/odata`,
//!   `/redfish/v1/$metadata`).
//! - Only `200 OK` is success. `application/json` bodies are decoded,
//!   anything else is returned as text.
//! - `#/a/0` fragments are never sent; JSON bodies are navigated by the
//!   fragment path instead.

pub mod credentials;

#[cfg(feature = "reqwest")]
pub mod reqwest;

use http::StatusCode;
use redfish_validator_core::fetch::navigate_fragment;
use redfish_validator_core::Body;
use redfish_validator_core::Fetched;
use redfish_validator_core::Fetcher;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::future::Future;
use tracing::debug;
use url::Url;

#[doc(inline)]
pub use credentials::ServiceCredentials;

/// Raw response of a GET request.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    /// Value of the `Content-Type` header.
    pub content_type: Option<String>,
    pub body: String,
}

pub trait HttpClient: Send + Sync {
    type Error: Send + Sync + StdError;

    /// Perform an HTTP GET request. Basic authentication is used if
    /// credentials are provided.
    fn get(
        &self,
        url: Url,
        credentials: Option<&ServiceCredentials>,
    ) -> impl Future<Output = Result<RawResponse, Self::Error>> + Send;
}

/// Errors of [`HttpFetcher`].
#[derive(Debug)]
pub enum FetchError<E> {
    /// Client (transport) failure.
    Transport(E),
    /// Response status is not `200 OK`.
    InvalidStatus(String, StatusCode),
    /// Body declared as JSON cannot be decoded.
    Json(String, serde_json::Error),
    /// Absolute URL requested in service-only mode.
    OutOfService(String),
    /// Fragment does not address a value in the body.
    FragmentNotFound(String),
    /// URI cannot be turned into a URL.
    InvalidUrl(String, url::ParseError),
}

impl<E: Display> Display for FetchError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Transport(err) => write!(f, "HTTP client error: {err}"),
            Self::InvalidStatus(uri, status) => write!(f, "{uri}: invalid HTTP status {status}"),
            Self::Json(uri, err) => write!(f, "{uri}: JSON decode error: {err}"),
            Self::OutOfService(uri) => write!(f, "{uri} is outside of the service"),
            Self::FragmentNotFound(uri) => write!(f, "{uri}: fragment is not found in payload"),
            Self::InvalidUrl(uri, err) => write!(f, "{uri}: invalid URL: {err}"),
        }
    }
}

impl<E: StdError + 'static> StdError for FetchError<E> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Json(_, err) => Some(err),
            Self::InvalidUrl(_, err) => Some(err),
            _ => None,
        }
    }
}

/// Base URL of the service under test.
#[derive(Debug, Clone)]
pub struct ServiceEndpoint {
    base_url: Url,
}

impl ServiceEndpoint {
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// `https://<target>` or `http://<target>`.
    ///
    /// # Errors
    ///
    /// Returns error if target is not a valid host (with optional port).
    pub fn from_target(target: &str, use_ssl: bool) -> Result<Self, url::ParseError> {
        let scheme = if use_ssl { "https" } else { "http" };
        Url::parse(&format!("{scheme}://{target}")).map(Self::new)
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL of a service path. Query strings are kept.
    ///
    /// # Errors
    ///
    /// Returns error if the concatenation is not a valid URL.
    pub fn with_path(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}"))
    }
}

impl From<Url> for ServiceEndpoint {
    fn from(url: Url) -> Self {
        Self::new(url)
    }
}

/// Whether a URI points outside of the service.
#[must_use]
pub fn is_out_of_service(uri: &str) -> bool {
    uri.get(..8).is_some_and(|prefix| prefix.contains("http"))
}

/// Discovery endpoints that a conformant service serves without
/// authentication.
#[must_use]
pub fn is_unauthenticated_path(path: &str) -> bool {
    matches!(
        path,
        "/redfish" | "/redfish/" | "/redfish/v1" | "/redfish/v1/" | "/redfish/v1/odata"
    ) || path.contains("/redfish/v1/$metadata")
        || (path.starts_with("/redfish") && !path.starts_with("/redfish/v1"))
}

/// [`Fetcher`] over an [`HttpClient`].
pub struct HttpFetcher<C: HttpClient> {
    client: C,
    endpoint: ServiceEndpoint,
    credentials: Option<ServiceCredentials>,
    service_only: bool,
}

impl<C: HttpClient> HttpFetcher<C> {
    /// Create fetcher of the service at `endpoint`.
    pub fn new(
        client: C,
        endpoint: impl Into<ServiceEndpoint>,
        credentials: Option<ServiceCredentials>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            credentials,
            service_only: false,
        }
    }

    /// Refuse URIs outside of the service.
    #[must_use]
    pub const fn service_only(mut self, service_only: bool) -> Self {
        self.service_only = service_only;
        self
    }

    #[must_use]
    pub const fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    /// URL to request and whether to authenticate the request.
    fn target(&self, uri: &str) -> Result<(Url, bool), FetchError<C::Error>> {
        if is_out_of_service(uri) {
            if self.service_only {
                return Err(FetchError::OutOfService(uri.into()));
            }
            let url = Url::parse(uri).map_err(|err| FetchError::InvalidUrl(uri.into(), err))?;
            return Ok((url, false));
        }
        let url = self
            .endpoint
            .with_path(uri)
            .map_err(|err| FetchError::InvalidUrl(uri.into(), err))?;
        let auth = url.scheme() == "https" && !is_unauthenticated_path(url.path());
        Ok((url, auth))
    }
}

impl<C: HttpClient> Fetcher for HttpFetcher<C>
where
    C::Error: 'static,
{
    type Error = FetchError<C::Error>;

    async fn fetch(&self, uri: &str) -> Result<Fetched, Self::Error> {
        let (location, fragment) = match uri.split_once('#') {
            Some((location, fragment)) => (location, Some(fragment)),
            None => (uri, None),
        };
        let (url, auth) = self.target(location)?;
        let credentials = self.credentials.as_ref().filter(|_| auth);
        debug!(
            "GET {url} ({})",
            if credentials.is_some() { "authenticated" } else { "no auth" }
        );
        let response = self
            .client
            .get(url, credentials)
            .await
            .map_err(FetchError::Transport)?;
        if response.status != StatusCode::OK {
            return Err(FetchError::InvalidStatus(uri.into(), response.status));
        }
        let is_json = response
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"));
        let body = if is_json {
            let value = serde_json::from_str(&response.body)
                .map_err(|err| FetchError::Json(uri.into(), err))?;
            match fragment {
                Some(fragment) => Body::Json(
                    navigate_fragment(value, fragment)
                        .ok_or_else(|| FetchError::FragmentNotFound(uri.into()))?,
                ),
                None => Body::Json(value),
            }
        } else {
            Body::Text(response.body)
        };
        Ok(Fetched {
            status: response.status,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Error as IoError;
    use std::sync::Mutex;

    /// Records requests and answers every one with an empty object.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(String, bool)>>,
    }

    impl HttpClient for Recorder {
        type Error = IoError;

        async fn get(
            &self,
            url: Url,
            credentials: Option<&ServiceCredentials>,
        ) -> Result<RawResponse, IoError> {
            self.seen
                .lock()
                .expect("not poisoned")
                .push((url.to_string(), credentials.is_some()));
            Ok(RawResponse {
                status: StatusCode::OK,
                content_type: Some("application/json; charset=utf-8".into()),
                body: "{}".into(),
            })
        }
    }

    fn fetcher(base: &str) -> HttpFetcher<Recorder> {
        HttpFetcher::new(
            Recorder::default(),
            Url::parse(base).unwrap(),
            Some(ServiceCredentials::new("admin".into(), "secret".into())),
        )
    }

    async fn authenticated(fetcher: &HttpFetcher<Recorder>, uri: &str) -> bool {
        fetcher.fetch(uri).await.unwrap();
        fetcher.client.seen.lock().unwrap().last().unwrap().1
    }

    #[test]
    fn test_unauthenticated_paths() {
        for path in [
            "/redfish",
            "/redfish/v1",
            "/redfish/v1/",
            "/redfish/v1/odata",
            "/redfish/v1/$metadata",
            "/redfish/v2/Something",
        ] {
            assert!(is_unauthenticated_path(path), "{path}");
        }
        for path in ["/redfish/v1/Chassis", "/redfish/v1/Systems/1"] {
            assert!(!is_unauthenticated_path(path), "{path}");
        }
    }

    #[test]
    fn test_out_of_service() {
        assert!(is_out_of_service("http://redfish.dmtf.org/schemas/v1/Chassis_v1.xml"));
        assert!(is_out_of_service("https://example.com/x"));
        assert!(!is_out_of_service("/redfish/v1/Chassis"));
    }

    #[tokio::test]
    async fn test_auth_policy_over_https() {
        let fetcher = fetcher("https://bmc.example.com");
        assert!(authenticated(&fetcher, "/redfish/v1/Chassis").await);
        assert!(!authenticated(&fetcher, "/redfish/v1").await);
        assert!(!authenticated(&fetcher, "/redfish/v1/$metadata").await);
        assert!(!authenticated(&fetcher, "/redfish/v1/odata").await);
        assert!(!authenticated(&fetcher, "http://redfish.dmtf.org/schemas/v1/A_v1.xml").await);
        let seen = fetcher.client.seen.lock().unwrap();
        assert_eq!(seen[0].0, "https://bmc.example.com/redfish/v1/Chassis");
        assert_eq!(seen[4].0, "http://redfish.dmtf.org/schemas/v1/A_v1.xml");
    }

    #[tokio::test]
    async fn test_no_auth_over_http() {
        let fetcher = fetcher("http://bmc.example.com");
        assert!(!authenticated(&fetcher, "/redfish/v1/Chassis").await);
    }

    #[tokio::test]
    async fn test_service_only_refuses_absolute_uri() {
        let fetcher = fetcher("https://bmc.example.com").service_only(true);
        assert!(matches!(
            fetcher.fetch("http://redfish.dmtf.org/schemas/v1/A_v1.xml").await,
            Err(FetchError::OutOfService(_))
        ));
        assert!(fetcher.client.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_endpoint_from_target() {
        let endpoint = ServiceEndpoint::from_target("192.168.1.100:8443", true).unwrap();
        assert_eq!(
            endpoint.with_path("/redfish/v1/Chassis?$top=2").unwrap().as_str(),
            "https://192.168.1.100:8443/redfish/v1/Chassis?$top=2"
        );
        let endpoint = ServiceEndpoint::from_target("bmc", false).unwrap();
        assert_eq!(endpoint.base_url().scheme(), "http");
    }
}
