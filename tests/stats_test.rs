
use incidentframe::stats::{describe, percentile};
use incidentframe::QueryEngine;
use test_utils::*;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_describe_basic() {
    let stats = describe(&[1.0, 2.0, 3.0, 4.0]);

    assert_eq!(stats.count, 4);
    assert!(approx_eq(stats.mean, 2.5));
    assert!(approx_eq(stats.std, 1.2909944487358056));
    assert!(approx_eq(stats.min, 1.0));
    assert!(approx_eq(stats.q1, 1.75));
    assert!(approx_eq(stats.median, 2.5));
    assert!(approx_eq(stats.q3, 3.25));
    assert!(approx_eq(stats.max, 4.0));
}

#[test]
fn test_describe_single_value() {
    let stats = describe(&[42.0]);
    assert_eq!(stats.count, 1);
    assert!(approx_eq(stats.mean, 42.0));
    assert!(stats.std.is_nan());
    assert!(approx_eq(stats.median, 42.0));
}

#[test]
fn test_describe_empty() {
    let stats = describe(&[]);
    assert_eq!(stats.count, 0);
    assert!(stats.mean.is_nan());
    assert!(stats.min.is_nan());
    assert!(stats.max.is_nan());
}

#[test]
fn test_percentile_interpolates() {
    let sorted = [10.0, 20.0, 30.0];
    assert!(approx_eq(percentile(&sorted, 0.0), 10.0));
    assert!(approx_eq(percentile(&sorted, 0.5), 20.0));
    assert!(approx_eq(percentile(&sorted, 0.75), 25.0));
    assert!(approx_eq(percentile(&sorted, 1.0), 30.0));
    assert!(percentile(&[], 0.5).is_nan());
}

#[test]
fn test_describe_ignores_nulls() {
    let table = incidents_table();
    let engine = QueryEngine::new(&table);
    let descriptions = engine.describe();

    let columns: Vec<&str> = descriptions.iter().map(|d| d.column.as_str()).collect();
    assert_eq!(columns, vec!["Latitude", "Longitude", "Year", "Hour"]);

    let hour = &descriptions[3].stats;
    assert_eq!(hour.count, 5);
    assert!(approx_eq(hour.mean, 13.4));
    assert!(approx_eq(hour.min, 7.0));
    assert!(approx_eq(hour.q1, 8.0));
    assert!(approx_eq(hour.median, 12.0));
    assert!(approx_eq(hour.q3, 17.0));
    assert!(approx_eq(hour.max, 23.0));

    let year = &descriptions[2].stats;
    assert_eq!(year.count, 5);
    assert!(approx_eq(year.mean, 2023.4));
    assert!(approx_eq(year.median, 2024.0));
}

#[test]
fn test_stats_serialize_with_percentile_keys() {
    let stats = describe(&[1.0, 2.0, 3.0, 4.0]);
    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["count"], 4);
    assert_eq!(json["25%"], 1.75);
    assert_eq!(json["50%"], 2.5);
    assert_eq!(json["75%"], 3.25);

    // Non-finite statistics become null
    let json = serde_json::to_value(describe(&[5.0])).unwrap();
    assert!(json["std"].is_null());
}
