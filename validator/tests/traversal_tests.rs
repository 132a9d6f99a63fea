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

use redfish_validator::links::LinkEntry;
use redfish_validator::links::LinkName;
use redfish_validator::links::Links;
use redfish_validator::report::ResourceResult;
use redfish_validator::traversal::Expected;
use redfish_validator::traversal::ResourceValidator;
use redfish_validator::traversal::TreeResult;
use redfish_validator::traversal::UriTreeValidator;
use redfish_validator::traversal::Validation;
use redfish_validator_core::Counter;
use redfish_validator_core::Counters;
use redfish_validator_core::ODataId;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;

/// Link of a test resource: (name, target, auto-expand).
type TestLink = (&'static str, &'static str, bool);

/// In-memory resource graph. Unknown URIs fail validation.
#[derive(Default)]
struct Graph {
    nodes: HashMap<&'static str, (bool, Vec<TestLink>)>,
    calls: Mutex<Vec<(String, String, bool)>>,
}

impl Graph {
    fn node(mut self, uri: &'static str, links: Vec<TestLink>) -> Self {
        self.nodes.insert(uri, (true, links));
        self
    }

    fn failing(mut self, uri: &'static str) -> Self {
        self.nodes.insert(uri, (false, Vec::new()));
        self
    }

    fn visited(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(uri, _, _)| uri.clone())
            .collect()
    }

    fn names(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, name, _)| name.clone())
            .collect()
    }

    async fn crawl(&self) -> TreeResult {
        UriTreeValidator::new(self)
            .validate_tree(ODataId::from("/r"), "Root")
            .await
    }
}

impl ResourceValidator for Graph {
    async fn validate(&self, uri: &ODataId, name: &str, expected: Option<&Expected>) -> Validation {
        self.calls
            .lock()
            .unwrap()
            .push((uri.to_string(), name.to_string(), expected.is_some()));
        let Some((success, node_links)) = self.nodes.get(uri.as_str()) else {
            return Validation::default();
        };
        let mut counters = Counters::new();
        counters.increment(Counter::Pass);
        let mut links = Links::new();
        for (link_name, target, auto_expand) in node_links {
            links
                .insert(
                    LinkName::new((*link_name).to_string()),
                    LinkEntry {
                        target: Some(ODataId::from(*target)),
                        auto_expand: *auto_expand,
                        target_type: "Test.Test".parse().unwrap(),
                        schema_uri: None,
                        payload: json!({"@odata.id": target}),
                    },
                )
                .unwrap();
        }
        Validation {
            success: *success,
            counters,
            results: vec![ResourceResult::new(uri.clone(), name)],
            links,
        }
    }
}

#[tokio::test]
async fn test_cycle_visits_root_once() {
    let graph = Graph::default()
        .node("/r", vec![("Systems", "/a", false)])
        .node("/a", vec![("Parent", "/r", false), ("Self", "/a", false)]);
    let result = graph.crawl().await;
    assert!(result.success);
    assert_eq!(graph.visited(), vec!["/r", "/a"]);
    assert_eq!(result.counters.get(Counter::Repeat), 2);
    assert_eq!(result.counters.get(Counter::Pass), 2);
    assert_eq!(result.results.len(), 2);
}

#[tokio::test]
async fn test_repeat_under_two_paths() {
    let graph = Graph::default()
        .node("/r", vec![("Thermal", "/x", false), ("Power", "/x", false)])
        .node("/x", vec![]);
    let result = graph.crawl().await;
    assert_eq!(graph.visited(), vec!["/r", "/x"]);
    assert_eq!(result.counters.get(Counter::Repeat), 1);
    assert_eq!(graph.names(), vec!["Root", "Root -> Thermal"]);
}

#[tokio::test]
async fn test_relationship_links_visited_last() {
    let graph = Graph::default()
        .node(
            "/r",
            vec![("Links.Chassis#0", "/c", false), ("Systems", "/s", false)],
        )
        .node(
            "/s",
            vec![("Links.ManagedBy#0", "/m", false), ("Processors", "/p", false)],
        )
        .node("/p", vec![])
        .node("/c", vec![])
        .node("/m", vec![]);
    let result = graph.crawl().await;
    assert!(result.success);
    assert_eq!(graph.visited(), vec!["/r", "/s", "/p", "/c", "/m"]);
    assert_eq!(result.counters.get(Counter::RefLink), 2);
    assert_eq!(result.counters.get(Counter::Repeat), 0);
    assert_eq!(result.deferred.len(), 2);
    assert_eq!(
        graph.names()[4],
        "Root -> Systems -> Links.ManagedBy#0".to_string()
    );
}

#[tokio::test]
async fn test_relationship_link_to_visited_resource() {
    let graph = Graph::default()
        .node(
            "/r",
            vec![("Links.Self", "/s", false), ("Systems", "/s", false)],
        )
        .node("/s", vec![("RelatedItem#0", "/r", false)]);
    let result = graph.crawl().await;
    assert_eq!(graph.visited(), vec!["/r", "/s"]);
    assert_eq!(result.counters.get(Counter::RefLink), 0);
    assert_eq!(result.counters.get(Counter::Repeat), 0);
    assert_eq!(result.deferred.len(), 2);
}

#[tokio::test]
async fn test_relationship_links_found_in_final_pass() {
    let graph = Graph::default()
        .node("/r", vec![("Links.A", "/a", false)])
        .node("/a", vec![("Redundancy#0", "/b", false), ("Links.Root", "/r", false)])
        .node("/b", vec![]);
    let result = graph.crawl().await;
    assert_eq!(graph.visited(), vec!["/r", "/a", "/b"]);
    assert_eq!(result.counters.get(Counter::RefLink), 2);
    assert_eq!(result.deferred.len(), 3);
}

#[tokio::test]
async fn test_strong_failure_fails_crawl() {
    let graph = Graph::default()
        .node("/r", vec![("Systems", "/bad", false), ("Chassis", "/c", false)])
        .failing("/bad")
        .node("/c", vec![]);
    let result = graph.crawl().await;
    assert!(!result.success);
    assert_eq!(result.counters.get(Counter::Unvalidated), 1);
    assert_eq!(graph.visited(), vec!["/r", "/bad", "/c"]);
}

#[tokio::test]
async fn test_relationship_failure_keeps_success() {
    let graph = Graph::default().node(
        "/r",
        vec![("RelatedItem#0", "/missing", false), ("Links.Bad", "/bad", false)],
    );
    let graph = graph.failing("/bad");
    let result = graph.crawl().await;
    assert!(result.success);
    assert_eq!(result.counters.get(Counter::RefLink), 2);
    assert_eq!(result.counters.get(Counter::UnvalidatedRef), 2);
    assert_eq!(result.counters.get(Counter::Unvalidated), 0);
}

#[tokio::test]
async fn test_auto_expand_passes_payload() {
    let graph = Graph::default()
        .node("/r", vec![("Thermal", "/t", true), ("Power", "/p", false)])
        .node("/t", vec![])
        .node("/p", vec![]);
    graph.crawl().await;
    let expected = graph
        .calls
        .lock()
        .unwrap()
        .iter()
        .map(|(_, _, expected)| *expected)
        .collect::<Vec<_>>();
    assert_eq!(expected, vec![false, true, false]);
}
