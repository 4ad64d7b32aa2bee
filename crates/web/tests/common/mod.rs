#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use weather::{geolocation::Ip2LocationTable, memory::MemoryDatabase};
use web::WebState;

const GEOLOCATION_TABLE: &str = "\
\"0\",\"16777215\",\"-\",\"-\",\"-\",\"-\"
\"16777216\",\"16777471\",\"US\",\"United States of America\",\"California\",\"Los Angeles\"
\"1729546240\",\"1729546495\",\"IN\",\"India\",\"Delhi\",\"New Delhi\"
";

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub fn app() -> Router {
    let geolocation = Ip2LocationTable::from_reader(GEOLOCATION_TABLE.as_bytes()).unwrap();
    web::app(WebState::new(MemoryDatabase::new(), Arc::new(geolocation)))
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn new_delhi() -> Value {
    json!({
        "code": "DELHI_IN",
        "city_name": "New Delhi",
        "region_name": "Delhi",
        "country_code": "IN",
        "country_name": "India",
        "enabled": true
    })
}

pub fn sunny() -> Value {
    json!({
        "temperature": 35,
        "humidity": 60,
        "precipitation": 10,
        "wind_speed": 5,
        "status": "Sunny"
    })
}

pub async fn add_location(app: &Router, location: &Value) {
    let response = send(app, json_request(Method::POST, "/v1/locations", location)).await;
    assert_eq!(response.status, StatusCode::CREATED);
}
