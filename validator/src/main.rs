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

use clap::Parser;
use redfish_validator::config::Config;
use redfish_validator::resource::SchemaValidator;
use redfish_validator::traversal::UriTreeValidator;
use redfish_validator::Error;
use redfish_validator_core::Counter;
use redfish_validator_core::ODataId;
use redfish_validator_http::reqwest::Client;
use redfish_validator_http::reqwest::ClientParams;
use redfish_validator_http::HttpFetcher;
use redfish_validator_http::ServiceCredentials;
use redfish_validator_http::ServiceEndpoint;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::EnvFilter;

/// Validator CLI.
#[derive(Parser, Debug)]
#[command(name = "redfish-validator")]
#[command(about = "Validate a Redfish service against its schema model", long_about = None)]
struct Cli {
    /// Configuration file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Service address (host with optional port). Overrides
    /// `system.target`.
    #[arg(short, long)]
    target: Option<String>,
    /// Directory of local schema documents. Overrides
    /// `options.schema_dir`.
    #[arg(short, long)]
    schema_dir: Option<PathBuf>,
    /// Read schema documents from the schema directory only.
    #[arg(long)]
    local_only: bool,
    /// Don't fetch anything outside of the service.
    #[arg(long)]
    service_only: bool,
    /// URI where the crawl starts.
    #[arg(long)]
    start_uri: Option<String>,
    /// Debug logging unless `RUST_LOG` says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => Config::read(path)?,
            None => Config::default(),
        };
        if let Some(target) = &self.target {
            config.system.target = Some(target.clone());
        }
        if let Some(dir) = &self.schema_dir {
            config.options.schema_dir = Some(dir.clone());
        }
        if let Some(uri) = &self.start_uri {
            config.options.start_uri = uri.clone();
        }
        config.options.local_only |= self.local_only;
        config.options.service_only |= self.service_only;
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode, Error> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = cli.config()?;

    let target = config.system.target.clone().unwrap_or_default();
    let endpoint = ServiceEndpoint::from_target(&target, config.options.use_ssl)
        .map_err(|err| Error::InvalidTarget(target.clone(), err))?;
    let mut params = ClientParams::new().accept_invalid_certs(!config.options.certificate_check);
    if let Some(timeout) = config.options.timeout {
        params = params.timeout(Duration::from_secs(timeout));
    }
    let client = Client::with_params(params).map_err(|err| Error::HttpClient(Box::new(err)))?;
    let credentials = match (&config.system.username, &config.system.password) {
        (Some(username), Some(password)) => {
            Some(ServiceCredentials::new(username.clone(), password.clone()))
        }
        _ => None,
    };
    if let Some(credentials) = &credentials {
        info!("using {credentials}");
    }
    let fetcher = Arc::new(
        HttpFetcher::new(client, endpoint, credentials).service_only(config.options.service_only),
    );
    let validator = SchemaValidator::new(fetcher, config.cache_config()).map_err(Error::Pattern)?;

    let start = ODataId::from(config.options.start_uri.as_str());
    info!(
        "validating {target}{} starting at {start}",
        config
            .system
            .description
            .as_ref()
            .map(|d| format!(" ({d})"))
            .unwrap_or_default()
    );
    let result = UriTreeValidator::new(&validator)
        .validate_tree(start, "ServiceRoot")
        .await;

    for resource in &result.results {
        println!("{resource}");
    }
    println!(
        "{} resources, {} relationship links: {}",
        result.results.len(),
        result.deferred.len(),
        result.counters
    );
    if result.success && result.counters.get(Counter::Fail) == 0 {
        println!("Validation has succeeded.");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Validation has failed.");
        Ok(ExitCode::FAILURE)
    }
}
