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

use redfish_validator::report::Outcome;
use redfish_validator::resource::SchemaValidator;
use redfish_validator::traversal::ResourceValidator;
use redfish_validator::traversal::UriTreeValidator;
use redfish_validator_core::Counter;
use redfish_validator_core::ODataId;
use redfish_validator_csdl::CacheConfig;
use redfish_validator_mock::Expect;
use redfish_validator_mock::Service;
use serde_json::json;
use std::io::Error as IoError;
use std::io::ErrorKind;
use std::sync::Arc;

const SCHEMAS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/test-data/schemas");
const ROOT_TYPE: &str = "#ServiceRoot.v1_0_0.ServiceRoot";
const WIDGET_TYPE: &str = "#Widget.v1_0_0.Widget";

fn service() -> (Arc<Service<IoError>>, SchemaValidator<Service<IoError>>) {
    let mock = Arc::new(Service::default());
    let validator = SchemaValidator::new(
        mock.clone(),
        CacheConfig::default()
            .with_schema_dir(SCHEMAS)
            .with_local_only(true),
    )
    .unwrap();
    (mock, validator)
}

fn gadget(id: usize) -> serde_json::Value {
    json!({
        "@odata.id": format!("/redfish/v1/Gadgets/{id}"),
        "@odata.type": WIDGET_TYPE,
        "Id": id.to_string(),
        "Root": {"@odata.id": "/redfish/v1"},
    })
}

fn root_with_links() -> serde_json::Value {
    json!({
        "@odata.id": "/redfish/v1",
        "@odata.type": ROOT_TYPE,
        "@odata.context": "/redfish/v1/$metadata#ServiceRoot.ServiceRoot",
        "Id": "RootService",
        "Name": "Root Service",
        "Links": {"Sessions": {"@odata.id": "/redfish/v1/SessionService/Sessions"}},
        "Gadgets": [
            {"@odata.id": "/redfish/v1/Gadgets/0"},
            {"@odata.id": "/redfish/v1/Gadgets/1"},
            {"@odata.id": "/redfish/v1/Gadgets/2"},
        ],
        "Spare": {"@odata.id": "/redfish/v1/Gadgets/1"},
        "Backup": {"@odata.id": "/redfish/v1/Gadgets/1"},
    })
}

#[tokio::test]
async fn test_auto_expanded_link_is_not_fetched() {
    let (mock, validator) = service();
    mock.expect(Expect::json(
        "/redfish/v1",
        json!({
            "@odata.id": "/redfish/v1",
            "@odata.type": ROOT_TYPE,
            "Id": "RootService",
            "Name": "Root Service",
            "Widget": {
                "@odata.id": "/redfish/v1/Widget",
                "@odata.type": WIDGET_TYPE,
                "Id": "W",
                "Name": "Embedded",
                "Root": {"@odata.id": "/redfish/v1"},
            },
        }),
    ));
    let result = UriTreeValidator::new(&validator)
        .validate_tree(ODataId::service_root(), "ServiceRoot")
        .await;
    assert_eq!(mock.remaining(), 0);
    assert!(result.success, "{:?}", result.results);
    assert_eq!(result.results.len(), 2);
    let widget = &result.results[1];
    assert_eq!(widget.uri, ODataId::from("/redfish/v1/Widget"));
    assert_eq!(widget.name, "ServiceRoot -> Widget");
    assert!(widget.error.is_none());
    assert!(widget
        .messages
        .iter()
        .any(|m| m.property == "Name" && m.outcome == Outcome::Pass));
    assert_eq!(result.counters.get(Counter::Repeat), 1);
    assert_eq!(result.counters.get(Counter::Fail), 0);
}

#[tokio::test]
async fn test_links_from_resolved_properties() {
    let (mock, validator) = service();
    mock.expect(Expect::json("/redfish/v1", root_with_links()));
    let validation = validator
        .validate(&ODataId::service_root(), "ServiceRoot", None)
        .await;
    assert!(validation.success);
    assert_eq!(
        validation.links.names().collect::<Vec<_>>(),
        vec![
            "Links.Sessions",
            "Gadgets#0",
            "Gadgets#1",
            "Gadgets#2",
            "Spare",
            "Backup"
        ]
    );
    let (_, spare) = validation
        .links
        .iter()
        .find(|(name, _)| name.inner() == "Spare")
        .unwrap();
    assert_eq!(spare.target, Some(ODataId::from("/redfish/v1/Gadgets/1")));
    assert_eq!(spare.target_type.to_string(), "Widget.Widget");
    assert_eq!(
        spare.schema_uri.as_deref(),
        Some("/redfish/v1/Schemas/Widget_v1.xml")
    );
    assert!(!spare.auto_expand);
}

#[tokio::test]
async fn test_null_navigation_property_is_not_a_link() {
    let (mock, validator) = service();
    mock.expect(Expect::json(
        "/redfish/v1",
        json!({
            "@odata.id": "/redfish/v1",
            "@odata.type": ROOT_TYPE,
            "Id": "RootService",
            "Name": "Root Service",
            "Spare": null,
            "Gadgets": [null, {"@odata.id": "/redfish/v1/Gadgets/1"}],
        }),
    ));
    mock.expect(Expect::json("/redfish/v1/Gadgets/1", gadget(1)));
    let result = UriTreeValidator::new(&validator)
        .validate_tree(ODataId::service_root(), "ServiceRoot")
        .await;
    assert!(result.success);
    assert_eq!(result.counters.get(Counter::Unvalidated), 0);
    assert_eq!(result.counters.get(Counter::Repeat), 1);
    assert_eq!(result.results.len(), 2);
    assert_eq!(mock.remaining(), 0);
}

#[tokio::test]
async fn test_crawl_with_repeats_and_relationship_links() {
    let (mock, validator) = service();
    mock.expect(Expect::json("/redfish/v1", root_with_links()));
    for id in 0..3 {
        mock.expect(Expect::json(format!("/redfish/v1/Gadgets/{id}"), gadget(id)));
    }
    mock.expect(Expect::error(
        "/redfish/v1/SessionService/Sessions",
        IoError::new(ErrorKind::NotFound, "no sessions"),
    ));
    let result = UriTreeValidator::new(&validator)
        .validate_tree(ODataId::service_root(), "ServiceRoot")
        .await;
    assert_eq!(mock.remaining(), 0);
    assert!(result.success);
    assert_eq!(result.results.len(), 5);
    // Spare, Backup and the Root link of each gadget.
    assert_eq!(result.counters.get(Counter::Repeat), 5);
    assert_eq!(result.counters.get(Counter::RefLink), 1);
    assert_eq!(result.counters.get(Counter::UnvalidatedRef), 1);
    assert_eq!(result.counters.get(Counter::Unvalidated), 0);
    let sessions = &result.results[4];
    assert_eq!(sessions.name, "ServiceRoot -> Links.Sessions");
    assert!(sessions.error.as_deref().unwrap().contains("no sessions"));
}

#[tokio::test]
async fn test_presence_and_payload_annotations() {
    let (mock, validator) = service();
    mock.expect(Expect::json(
        "/redfish/v1",
        json!({
            "@odata.id": "/redfish/v1",
            "@odata.type": ROOT_TYPE,
            "Name": "Root Service",
            "Name@Redfish.AllowableValues": ["Root Service"],
            "Name@Contoso.Unknown": "x",
        }),
    ));
    let validation = validator
        .validate(&ODataId::service_root(), "ServiceRoot", None)
        .await;
    assert!(validation.success);
    let result = &validation.results[0];
    let outcome = |property: &str| {
        result
            .messages
            .iter()
            .find(|m| m.property == property)
            .map(|m| m.outcome)
    };
    assert_eq!(outcome("Id"), Some(Outcome::Fail));
    assert_eq!(outcome("Name"), Some(Outcome::Pass));
    assert_eq!(outcome("UUID"), Some(Outcome::Skip));
    assert_eq!(outcome("Name@Redfish.AllowableValues"), Some(Outcome::Pass));
    assert_eq!(outcome("Name@Contoso.Unknown"), Some(Outcome::Warn));
    assert_eq!(outcome("@odata.id"), Some(Outcome::Pass));
    assert_eq!(result.counters.get(Counter::Fail), 1);
    assert_eq!(validation.counters, result.counters);
}

#[tokio::test]
async fn test_unvalidated_resources() {
    let (mock, validator) = service();
    mock.expect(Expect::error(
        "/redfish/v1",
        IoError::new(ErrorKind::ConnectionRefused, "refused"),
    ));
    mock.expect(Expect::json("/redfish/v1/Untyped", json!({"Id": "1"})));
    mock.expect(Expect::text("/redfish/v1/Text", "plain"));

    for uri in ["/redfish/v1", "/redfish/v1/Untyped", "/redfish/v1/Text"] {
        let validation = validator.validate(&ODataId::from(uri), "X", None).await;
        assert!(!validation.success, "{uri}");
        assert!(validation.links.is_empty());
        assert!(validation.results[0].error.is_some(), "{uri}");
    }
    assert_eq!(mock.remaining(), 0);
}
