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

//! Redfish service validator.
//!
//! Crawls the resource graph of a live Redfish service and checks every
//! resource against the published schema model:
//!
//! - [`links`]: finds outgoing links of a payload using resolved
//!   property descriptors.
//! - [`traversal`]: depth-first walk over links with repeat detection
//!   and a final pass over relationship links.
//! - [`resource`]: per-resource validation backed by the schema model.
//!
//! ```rust,no_run
//! use redfish_validator::resource::SchemaValidator;
//! use redfish_validator::traversal::UriTreeValidator;
//! use redfish_validator_core::ODataId;
//! use redfish_validator_csdl::CacheConfig;
//! use redfish_validator_http::reqwest::Client;
//! use redfish_validator_http::HttpFetcher;
//! use redfish_validator_http::ServiceEndpoint;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let endpoint = ServiceEndpoint::from_target("192.168.1.100", true)?;
//! let fetcher = Arc::new(HttpFetcher::new(Client::new()?, endpoint, None));
//! let validator = SchemaValidator::new(
//!     fetcher,
//!     CacheConfig::default().with_schema_dir("./SchemaFiles"),
//! )?;
//! let result = UriTreeValidator::new(&validator)
//!     .validate_tree(ODataId::service_root(), "ServiceRoot")
//!     .await;
//! println!("{}", result.counters);
//! # Ok(())
//! # }
//! ```

/// Validator configuration file.
pub mod config;
/// Compliance of `@odata.*` payload keys.
pub mod compliance;
/// Link Extractor.
pub mod links;
/// Validation results.
pub mod report;
/// Schema-backed resource validation.
pub mod resource;
/// URI Tree Validator.
pub mod traversal;

mod error;

#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use error::ResourceError;
