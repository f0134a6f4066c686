mod common;

use common::TestServer;
use serde_json::Value;

const FILTER_QUERY: &str = "?filter=%28today+%7C+overdue%29";

#[test]
fn creating_a_known_task_returns_the_canned_reply() {
    let server = TestServer::start();
    let client = reqwest::blocking::Client::new();

    let response = client
        .post(server.url("/api/v1/tasks"))
        .body(r#"{"content": "do the laundry"}"#)
        .send()
        .unwrap();

    assert_eq!(response.status(), 200);
    let task: Value = response.json().unwrap();
    assert_eq!(task["content"], "do the laundry");
    assert_eq!(task["id"], "7000005");
    assert_eq!(task["checked"], false);

    // The canned reply is not inserted into the store.
    let listed: Value = client
        .get(server.url("/api/v1/tasks"))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert!(listed["results"]
        .as_array()
        .unwrap()
        .iter()
        .all(|task| task["id"] != "7000005"));
}

#[test]
fn renaming_post_mutates_the_second_task_in_place() {
    let server = TestServer::start();
    let client = reqwest::blocking::Client::new();

    let response = client
        .post(server.url("/api/v1/tasks"))
        .body(r#"{"content": "be lazy"}"#)
        .send()
        .unwrap();
    assert_eq!(response.status(), 204);
    assert!(response.bytes().unwrap().is_empty());

    let listed: Value = client
        .get(server.url("/api/v1/tasks"))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(listed["results"][1]["content"], "be lazy");
    assert_eq!(listed["results"][1]["id"], "7000001");

    // The mutation is visible through the per-id lookup as well.
    let task: Value = client
        .get(server.url("/api/v1/tasks/7000001"))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(task["content"], "be lazy");
}

#[test]
fn closing_a_task_drops_it_from_every_list_view() {
    let server = TestServer::start();
    let client = reqwest::blocking::Client::new();

    let response = client
        .post(server.url("/api/v1/tasks/7000003/close"))
        .send()
        .unwrap();
    assert_eq!(response.status(), 204);

    let filtered: Value = client
        .get(server.url(&format!("/api/v1/tasks{}", FILTER_QUERY)))
        .send()
        .unwrap()
        .json()
        .unwrap();
    let filtered_ids: Vec<&str> = filtered["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["id"].as_str().unwrap())
        .collect();
    assert_eq!(filtered_ids, vec!["7000000", "7000001"]);

    let listed: Value = client
        .get(server.url("/api/v1/tasks"))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert!(listed["results"]
        .as_array()
        .unwrap()
        .iter()
        .all(|task| task["id"] != "7000003"));

    // The task itself stays addressable, now checked.
    let task: Value = client
        .get(server.url("/api/v1/tasks/7000003"))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(task["checked"], true);
}

#[test]
fn unrelated_posts_succeed_trivially() {
    let server = TestServer::start();
    let client = reqwest::blocking::Client::new();

    let response = client
        .post(server.url("/api/v1/tasks/7000002/comments"))
        .body(r#"{"note": "no content field"}"#)
        .send()
        .unwrap();
    assert_eq!(response.status(), 204);
    assert!(response.bytes().unwrap().is_empty());

    let response = client.post(server.url("/api/v1/tasks")).send().unwrap();
    assert_eq!(response.status(), 204);
}

#[test]
fn malformed_bodies_fail_the_request_but_not_the_server() {
    let server = TestServer::start();
    let client = reqwest::blocking::Client::new();

    let response = client
        .post(server.url("/api/v1/tasks"))
        .body("{not json")
        .send()
        .unwrap();
    assert_eq!(response.status(), 500);

    let response = client.get(server.url("/api/v1/tasks")).send().unwrap();
    assert_eq!(response.status(), 200);
}
