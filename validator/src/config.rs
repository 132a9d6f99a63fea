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

//! Validator configuration.
//!
//! The configuration file is TOML:
//!
//! ```toml
//! [system]
//! target = "192.168.1.100"
//! username = "admin"
//! password = "secret"
//!
//! [options]
//! use_ssl = true
//! schema_dir = "./SchemaFiles"
//! local_only = false
//! ```
//!
//! Only `system.target` and `options.schema_dir` are required. They
//! are checked by [`Config::validate`] since both can also be given on
//! the command line.

use redfish_validator_csdl::CacheConfig;
use serde::Deserialize;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::fs::File;
use std::io::Error as IoError;
use std::io::Read as _;
use std::path::Path;
use std::path::PathBuf;
use toml::de::Error as TomlError;

const DEFAULT_SCHEMA_SUFFIX: &str = "_v1.xml";
const DEFAULT_START_URI: &str = "/redfish/v1";

#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file.
    Io(PathBuf, IoError),
    /// Invalid TOML or unknown configuration layout.
    Toml(TomlError),
    /// No service address to validate.
    MissingTarget,
    /// No local schema directory.
    MissingSchemaLocation,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Io(path, err) => write!(f, "cannot read {}: {err}", path.display()),
            Self::Toml(err) => write!(f, "invalid configuration: {err}"),
            Self::MissingTarget => write!(f, "target address of the service is not set"),
            Self::MissingSchemaLocation => write!(f, "schema directory is not set"),
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(_, err) => Some(err),
            Self::Toml(err) => Some(err),
            _ => None,
        }
    }
}

/// Service under test.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct SystemConfig {
    /// Host (with optional port) of the service.
    pub target: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub description: Option<String>,
}

/// Validation options.
#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    pub use_ssl: bool,
    /// Verify the certificate of the service.
    pub certificate_check: bool,
    /// Directory of local schema documents.
    pub schema_dir: Option<PathBuf>,
    /// File name suffix of local schema documents.
    pub schema_suffix: String,
    /// Never fetch schema documents from the service.
    pub local_only: bool,
    /// Never fetch anything outside of the service.
    pub service_only: bool,
    /// URI where the crawl starts.
    pub start_uri: String,
    /// HTTP request timeout in seconds.
    pub timeout: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            use_ssl: true,
            certificate_check: false,
            schema_dir: None,
            schema_suffix: DEFAULT_SCHEMA_SUFFIX.into(),
            local_only: false,
            service_only: false,
            start_uri: DEFAULT_START_URI.into(),
            timeout: None,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub options: Options,
}

impl Config {
    /// Read configuration from TOML file.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Io` if failed to read file
    /// - `ConfigError::Toml` if the content is not a valid configuration
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let mut file = File::open(path).map_err(|err| ConfigError::Io(path.into(), err))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|err| ConfigError::Io(path.into(), err))?;
        Self::parse(&content)
    }

    /// Parse configuration text.
    ///
    /// # Errors
    ///
    /// `ConfigError::Toml` if the content is not a valid configuration.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Toml)
    }

    /// Check that the configuration is complete.
    ///
    /// # Errors
    ///
    /// `ConfigError::MissingTarget` or `ConfigError::MissingSchemaLocation`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.system.target.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingTarget);
        }
        if self.options.schema_dir.is_none() {
            return Err(ConfigError::MissingSchemaLocation);
        }
        Ok(())
    }

    /// Schema cache settings.
    #[must_use]
    pub fn cache_config(&self) -> CacheConfig {
        let config = CacheConfig::default()
            .with_suffix(self.options.schema_suffix.clone())
            .with_local_only(self.options.local_only);
        match &self.options.schema_dir {
            Some(dir) => config.with_schema_dir(dir.clone()),
            None => config,
        }
    }
}
