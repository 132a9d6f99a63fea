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

#[cfg(feature = "reqwest")]
mod fetcher_tests {
    use redfish_validator_core::Body;
    use redfish_validator_core::Fetcher;
    use redfish_validator_http::reqwest::Client;
    use redfish_validator_http::FetchError;
    use redfish_validator_http::HttpFetcher;
    use redfish_validator_http::ServiceCredentials;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::method;
    use wiremock::matchers::path;
    use wiremock::Mock;
    use wiremock::MockServer;
    use wiremock::ResponseTemplate;

    fn create_fetcher(mock_server: &MockServer) -> HttpFetcher<Client> {
        HttpFetcher::new(
            Client::new().unwrap(),
            Url::parse(&mock_server.uri()).unwrap(),
            Some(ServiceCredentials::new("root".into(), "password".into())),
        )
    }

    #[tokio::test]
    async fn test_json_resource() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/redfish/v1/Chassis/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "@odata.id": "/redfish/v1/Chassis/1",
                "Id": "1"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetched = create_fetcher(&mock_server)
            .fetch("/redfish/v1/Chassis/1")
            .await
            .unwrap();
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.into_json().unwrap()["Id"], "1");
    }

    #[tokio::test]
    async fn test_credentials_are_not_sent_over_http() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/redfish/v1/Systems"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        create_fetcher(&mock_server)
            .fetch("/redfish/v1/Systems")
            .await
            .unwrap();
        let requests = mock_server.received_requests().await.unwrap();
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_schema_document_is_text() {
        let mock_server = MockServer::start().await;
        let xml = r#"<edmx:Edmx Version="4.0"/>"#;
        Mock::given(method("GET"))
            .and(path("/schemas/v1/Chassis_v1.xml"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/xml")
                    .set_body_string(xml),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let uri = format!("{}/schemas/v1/Chassis_v1.xml", mock_server.uri());
        let fetched = create_fetcher(&mock_server).fetch(&uri).await.unwrap();
        assert_eq!(fetched.body, Body::Text(xml.into()));
    }

    #[tokio::test]
    async fn test_fragment_navigation() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/redfish/v1/Chassis/1/Thermal"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Temperatures": [
                    {"@odata.id": "/redfish/v1/Chassis/1/Thermal#/Temperatures/0", "Name": "CPU"},
                ]
            })))
            .expect(2)
            .mount(&mock_server)
            .await;

        let fetcher = create_fetcher(&mock_server);
        let fetched = fetcher
            .fetch("/redfish/v1/Chassis/1/Thermal#/Temperatures/0")
            .await
            .unwrap();
        assert_eq!(fetched.into_json().unwrap()["Name"], "CPU");

        assert!(matches!(
            fetcher
                .fetch("/redfish/v1/Chassis/1/Thermal#/Temperatures/7")
                .await,
            Err(FetchError::FragmentNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unexpected_status_and_bad_json() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/redfish/v1/Missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/redfish/v1/Accepted"))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({})))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/redfish/v1/Broken"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("{ not json", "application/json"),
            )
            .mount(&mock_server)
            .await;

        let fetcher = create_fetcher(&mock_server);
        assert!(matches!(
            fetcher.fetch("/redfish/v1/Missing").await,
            Err(FetchError::InvalidStatus(_, status)) if status == 404
        ));
        assert!(matches!(
            fetcher.fetch("/redfish/v1/Accepted").await,
            Err(FetchError::InvalidStatus(_, status)) if status == 202
        ));
        assert!(matches!(
            fetcher.fetch("/redfish/v1/Broken").await,
            Err(FetchError::Json(..))
        ));
    }

    #[tokio::test]
    async fn test_service_only_mode() {
        let mock_server = MockServer::start().await;
        let fetcher = create_fetcher(&mock_server).service_only(true);
        let uri = format!("{}/schemas/v1/Chassis_v1.xml", mock_server.uri());
        assert!(matches!(
            fetcher.fetch(&uri).await,
            Err(FetchError::OutOfService(_))
        ));
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }
}
