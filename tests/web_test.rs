
use std::sync::Arc;

use incidentframe::web::Params;
use incidentframe::{ApiResponse, IncidentService, ServiceConfig};
use serde_json::json;
use test_utils::*;

fn service() -> IncidentService {
    IncidentService::new(Arc::new(incidents_table()))
}

fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn get(service: &IncidentService, path: &str, pairs: &[(&str, &str)]) -> ApiResponse {
    service.handle(path, &params(pairs))
}

fn ids(body: &serde_json::Value) -> Vec<&str> {
    body["incidents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["Traffic Report ID"].as_str().unwrap())
        .collect()
}

#[test]
fn test_root() {
    let response = get(&service(), "/", &[]);
    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!({ "message": "Hello World!" }));
}

#[test]
fn test_unknown_endpoint() {
    let response = get(&service(), "/severity", &[]);
    assert_eq!(response.status, 404);
    assert_eq!(response.body["kind"], "NotFound");
}

#[test]
fn test_head() {
    let service = service();

    let response = get(&service, "/head", &[]);
    assert_eq!(response.status, 200);
    assert_eq!(response.body["count"], 5);
    assert_eq!(ids(&response.body), vec!["A1", "A2", "A3", "A4", "A5"]);

    let response = get(&service, "/head", &[("count", "2")]);
    assert_eq!(ids(&response.body), vec!["A1", "A2"]);

    let response = get(&service, "/head/", &[("count", "0")]);
    assert_eq!(response.body["count"], 0);

    for bad in ["-1", "two", "1.5"] {
        let response = get(&service, "/head", &[("count", bad)]);
        assert_eq!(response.status, 400, "count={}", bad);
        assert_eq!(response.body["kind"], "InvalidArgument");
    }
}

#[test]
fn test_head_count_from_config() {
    let mut config = ServiceConfig::default();
    config.server.default_head_count = 2;
    let service = IncidentService::from_config(Arc::new(incidents_table()), &config);
    assert_eq!(get(&service, "/head", &[]).body["count"], 2);
}

#[test]
fn test_summary() {
    let response = get(&service(), "/summary", &[]);
    assert_eq!(response.status, 200);
    assert_eq!(response.body["row_count"], 6);

    let columns = response.body["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 10);
    assert_eq!(columns[1]["name"], "Published Date");
    assert_eq!(columns[1]["dtype"], "timestamp");
    assert_eq!(columns[1]["null_count"], 1);
}

#[test]
fn test_describe() {
    let response = get(&service(), "/describe", &[]);
    assert_eq!(response.status, 200);

    let body = response.body.as_object().unwrap();
    let keys: Vec<&str> = body.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Latitude", "Longitude", "Year", "Hour"]);
    assert_eq!(body["Hour"]["count"], 5);
    assert_eq!(body["Hour"]["50%"], 12.0);
}

#[test]
fn test_uniqueval() {
    let service = service();

    let response = get(&service, "/uniqueval", &[("column", "Status")]);
    assert_eq!(response.status, 200);
    assert_eq!(
        response.body,
        json!({ "column": "Status", "unique_values": ["ACTIVE", "ARCHIVED"], "count": 2 })
    );

    let response = get(&service, "/uniqueval", &[("column", "Severity")]);
    assert_eq!(response.status, 404);
    assert_eq!(response.body["kind"], "ColumnNotFound");

    let response = get(&service, "/uniqueval", &[]);
    assert_eq!(response.status, 400);
}

#[test]
fn test_year_and_hour() {
    let service = service();

    let response = get(&service, "/year", &[]);
    assert_eq!(response.body, json!({ "years": [2022, 2023, 2024] }));

    let response = get(&service, "/hour", &[]);
    let counts = response.body["hour_counts"].as_array().unwrap();
    assert_eq!(counts.len(), 5);
    assert_eq!(counts[0], json!({ "hour": 7, "count": 1 }));
}

#[test]
fn test_hazard_count() {
    let service = service();

    let response = get(&service, "/hazard_count", &[("year", "2024")]);
    assert_eq!(response.status, 200);
    assert_eq!(
        response.body,
        json!({ "year": 2024, "issue": "Traffic Hazard", "count": 2 })
    );

    let response = get(&service, "/hazard_count", &[("year", "2024"), ("full", "true")]);
    assert_eq!(ids(&response.body), vec!["A1", "A5"]);

    let response = get(&service, "/hazard_count", &[("year", "2024"), ("issue", "crash")]);
    assert_eq!(response.body["count"], 1);

    assert_eq!(get(&service, "/hazard_count", &[]).status, 400);
    assert_eq!(get(&service, "/hazard_count", &[("year", "recent")]).status, 400);
    assert_eq!(
        get(&service, "/hazard_count", &[("year", "2024"), ("full", "maybe")]).status,
        400
    );
}

#[test]
fn test_by_hour_range() {
    let service = service();

    let response = get(&service, "/by_hour_range", &[("start", "7"), ("end", "12")]);
    assert_eq!(response.status, 200);
    assert_eq!(response.body["count"], 3);
    assert_eq!(ids(&response.body), vec!["A1", "A2", "A5"]);

    let response = get(&service, "/by_hour_range", &[("start", "9"), ("end", "5")]);
    assert_eq!(response.status, 200);
    assert_eq!(response.body["count"], 0);

    let response = get(&service, "/by_hour_range", &[("start", "25"), ("end", "30")]);
    assert_eq!(response.status, 400);
    assert_eq!(response.body["kind"], "InvalidArgument");
}

#[test]
fn test_nearby_incidents() {
    let service = service();

    let response = get(
        &service,
        "/nearby_incidents",
        &[("lat", "30.2895"), ("lon", "-97.7368"), ("radius", "0")],
    );
    assert_eq!(response.status, 200);
    assert_eq!(ids(&response.body), vec!["A1"]);
    let distance = response.body["incidents"][0]["Distance_km"].as_f64().unwrap();
    assert!(distance.abs() < 1e-9);

    // Default radius is one kilometer
    let response = get(
        &service,
        "/nearby_incidents",
        &[("lat", "30.2895"), ("lon", "-97.7368")],
    );
    assert_eq!(ids(&response.body), vec!["A1", "A3"]);

    for bad in [
        &[("lat", "north"), ("lon", "-97.7")][..],
        &[("lat", "91"), ("lon", "-97.7")][..],
        &[("lat", "30.2"), ("lon", "-97.7"), ("radius", "-1")][..],
        &[("lat", "30.2")][..],
    ] {
        assert_eq!(get(&service, "/nearby_incidents", bad).status, 400);
    }
}

#[test]
fn test_cleaned_geo() {
    let response = get(&service(), "/cleaned_geo", &[]);
    assert_eq!(response.status, 200);
    assert_eq!(ids(&response.body), vec!["A1", "A2", "A3"]);
}

#[test]
fn test_rush_hour() {
    let response = get(&service(), "/rush_hour", &[]);
    assert_eq!(response.status, 200);
    assert_eq!(ids(&response.body), vec!["A1", "A3", "A5"]);
    for record in response.body["incidents"].as_array().unwrap() {
        assert_eq!(record["rush_hour"], true);
    }
}

#[test]
fn test_rush_hour_nearby() {
    let service = service();

    let response = get(
        &service,
        "/rush_hour_nearby",
        &[("lat", "30.2895"), ("lon", "-97.7368"), ("year", "2023")],
    );
    assert_eq!(response.status, 200);
    assert_eq!(ids(&response.body), vec!["A3"]);
    assert!(response.body["incidents"][0]["Distance_km"].is_number());

    let response = get(
        &service,
        "/rush_hour_nearby",
        &[("lat", "30.2895"), ("lon", "-97.7368")],
    );
    assert_eq!(response.status, 400);
}

#[test]
fn test_missing_timestamp_statuses() {
    let service = IncidentService::new(Arc::new(table_from(NO_TIMESTAMP_CSV)));

    let response = get(&service, "/year", &[]);
    assert_eq!(response.status, 404);
    assert_eq!(response.body["kind"], "ColumnUnavailable");

    let response = get(
        &service,
        "/rush_hour_nearby",
        &[("lat", "30.2895"), ("lon", "-97.7368"), ("year", "2024")],
    );
    assert_eq!(response.status, 422);
    assert_eq!(response.body["kind"], "SchemaError");
}

#[test]
fn test_unloaded_service() {
    let service = IncidentService::unloaded();

    for path in ["/head", "/summary", "/describe", "/year", "/hour", "/cleaned_geo", "/rush_hour"] {
        let response = get(&service, path, &[]);
        assert_eq!(response.status, 503, "{}", path);
        assert_eq!(response.body["kind"], "DataNotLoaded");
    }

    // The greeting does not need data
    assert!(get(&service, "/", &[]).is_success());
}
