
use incidentframe::query::{is_rush_hour, DEFAULT_HAZARD_ISSUE};
use incidentframe::{Error, Predicate, QueryEngine, Value};
use test_utils::*;

#[test]
fn test_head_returns_min_of_n_and_rows() {
    let table = incidents_table();
    let engine = QueryEngine::new(&table);

    assert!(engine.head(0).unwrap().is_empty());
    assert_eq!(engine.head(2).unwrap().indices(), &[0, 1]);
    assert_eq!(engine.head(6).unwrap().len(), 6);
    assert_eq!(engine.head(100).unwrap().indices(), &[0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_head_rejects_negative() {
    let table = incidents_table();
    let engine = QueryEngine::new(&table);
    assert!(matches!(engine.head(-1), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_unique_values() {
    let table = incidents_table();
    let engine = QueryEngine::new(&table);

    let status = engine.unique_values("Status").unwrap();
    assert_eq!(status.values, vec![Value::from("ACTIVE"), Value::from("ARCHIVED")]);
    assert_eq!(status.count, status.values.len());

    // A6 has no issue; nulls are never reported
    let issues = engine.unique_values("Issue Reported").unwrap();
    assert_eq!(issues.count, 5);
    assert_eq!(issues.values[0], Value::from("Traffic Hazard"));

    assert!(matches!(
        engine.unique_values("Severity"),
        Err(Error::ColumnNotFound(_))
    ));
}

#[test]
fn test_years_sorted() {
    let table = incidents_table();
    let engine = QueryEngine::new(&table);
    assert_eq!(engine.years().unwrap(), vec![2022, 2023, 2024]);
}

#[test]
fn test_hour_frequencies_omit_absent_hours() {
    let table = incidents_table();
    let engine = QueryEngine::new(&table);

    let counts: Vec<(i64, usize)> = engine
        .hour_frequencies()
        .unwrap()
        .into_iter()
        .map(|h| (h.hour, h.count))
        .collect();
    assert_eq!(counts, vec![(7, 1), (8, 1), (12, 1), (17, 1), (23, 1)]);
}

#[test]
fn test_derived_columns_unavailable_without_timestamp() {
    let table = table_from(NO_TIMESTAMP_CSV);
    let engine = QueryEngine::new(&table);

    assert!(matches!(engine.years(), Err(Error::ColumnUnavailable(_))));
    assert!(matches!(engine.hour_frequencies(), Err(Error::ColumnUnavailable(_))));
    assert!(matches!(engine.rush_hour_filter(), Err(Error::ColumnUnavailable(_))));
    assert!(matches!(
        engine.hazard_count_by_year(2024, DEFAULT_HAZARD_ISSUE),
        Err(Error::ColumnUnavailable(_))
    ));
    assert!(matches!(
        engine.rush_hour_nearby(QUERY_LAT, QUERY_LON, 2024, 1.0),
        Err(Error::Schema(_))
    ));

    // Proximity search does not depend on the timestamp
    assert_eq!(engine.nearby(QUERY_LAT, QUERY_LON, 1.0).unwrap().len(), 1);
}

#[test]
fn test_filter_by_hour_range() {
    let table = incidents_table();
    let engine = QueryEngine::new(&table);

    assert_eq!(engine.filter_by_hour_range(7, 12).unwrap().indices(), &[0, 1, 4]);
    assert_eq!(engine.filter_by_hour_range(23, 23).unwrap().indices(), &[5]);
    assert_eq!(engine.filter_by_hour_range(0, 23).unwrap().len(), 5);
}

#[test]
fn test_filter_by_hour_range_inverted_is_empty() {
    let table = incidents_table();
    let engine = QueryEngine::new(&table);
    assert!(engine.filter_by_hour_range(9, 5).unwrap().is_empty());
}

#[test]
fn test_filter_by_hour_range_out_of_bounds() {
    let table = incidents_table();
    let engine = QueryEngine::new(&table);
    assert!(matches!(
        engine.filter_by_hour_range(25, 30),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        engine.filter_by_hour_range(-1, 5),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_hazard_count_by_year() {
    let table = incidents_table();
    let engine = QueryEngine::new(&table);

    // "Traffic Hazard" and "traffic hazard" in 2024
    assert_eq!(engine.hazard_count_by_year(2024, DEFAULT_HAZARD_ISSUE).unwrap(), 2);
    assert_eq!(engine.hazard_count_by_year(2023, DEFAULT_HAZARD_ISSUE).unwrap(), 1);
    assert_eq!(engine.hazard_count_by_year(2022, DEFAULT_HAZARD_ISSUE).unwrap(), 0);
    assert_eq!(engine.hazard_count_by_year(2024, "crash").unwrap(), 1);
}

#[test]
fn test_hazard_count_two_row_dataset() {
    let table = table_from(
        "Published Date,Issue Reported\n\
         2024-02-01 10:00:00,Traffic Hazard - X\n\
         2024-02-01 11:00:00,Crash\n",
    );
    let engine = QueryEngine::new(&table);
    assert_eq!(engine.hazard_count_by_year(2024, DEFAULT_HAZARD_ISSUE).unwrap(), 1);
}

#[test]
fn test_custom_issue_column() {
    let table = table_from(
        "Published Date,Description\n\
         2024-02-01 10:00:00,Traffic Hazard\n",
    );
    let engine = QueryEngine::new(&table);
    assert!(matches!(
        engine.hazard_count_by_year(2024, DEFAULT_HAZARD_ISSUE),
        Err(Error::ColumnNotFound(_))
    ));

    let engine = engine.with_issue_column("Description");
    assert_eq!(engine.hazard_count_by_year(2024, DEFAULT_HAZARD_ISSUE).unwrap(), 1);
}

#[test]
fn test_rush_hour() {
    assert!(is_rush_hour(Some(8)));
    assert!(!is_rush_hour(Some(12)));
    assert!(!is_rush_hour(None));

    let table = incidents_table();
    let engine = QueryEngine::new(&table);
    let view = engine.rush_hour_filter().unwrap();
    assert_eq!(view.indices(), &[0, 2, 4]);

    let flags = engine.rush_hour_flags(&view).unwrap();
    assert_eq!(flags.name, "rush_hour");
    assert!(flags.values.iter().all(|v| *v == Some(Value::Boolean(true))));
}

#[test]
fn test_rush_hour_does_not_touch_table() {
    let table = incidents_table();
    let columns_before = table.column_count();
    let engine = QueryEngine::new(&table);
    engine.rush_hour_filter().unwrap();
    assert_eq!(table.column_count(), columns_before);
    assert!(!table.contains_column("rush_hour"));
}

#[test]
fn test_nearby_exact_point() {
    let table = incidents_table();
    let engine = QueryEngine::new(&table);

    let exact = engine.nearby(QUERY_LAT, QUERY_LON, 0.0).unwrap();
    assert_eq!(exact.rows.indices(), &[0]);
    assert!(exact.distances_km[0].abs() < 1e-9);

    let within_km = engine.nearby(QUERY_LAT, QUERY_LON, 1.0).unwrap();
    assert_eq!(within_km.rows.indices(), &[0, 2]);
    assert!(within_km.distances_km.iter().all(|&d| d <= 1.0));
}

#[test]
fn test_nearby_monotonic_in_radius() {
    let table = incidents_table();
    let engine = QueryEngine::new(&table);

    let mut previous = usize::MAX;
    for radius in [10_000.0, 100.0, 5.0, 1.0, 0.5, 0.01, 0.0] {
        let count = engine.nearby(QUERY_LAT, QUERY_LON, radius).unwrap().len();
        assert!(count <= previous, "radius {} grew the result", radius);
        previous = count;
    }
}

#[test]
fn test_nearby_skips_null_coordinates() {
    let table = incidents_table();
    let engine = QueryEngine::new(&table);

    // Every row with both coordinates, but never A5
    let everything = engine.nearby(0.0, 0.0, 20_000.0).unwrap();
    assert_eq!(everything.rows.indices(), &[0, 1, 2, 3, 5]);
}

#[test]
fn test_nearby_rejects_bad_input() {
    let table = incidents_table();
    let engine = QueryEngine::new(&table);
    assert!(matches!(engine.nearby(120.0, 0.0, 1.0), Err(Error::InvalidArgument(_))));
    assert!(matches!(
        engine.nearby(QUERY_LAT, QUERY_LON, -1.0),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_cleaned_geo() {
    let table = incidents_table();
    let engine = QueryEngine::new(&table);
    // Drops the 0/0 row, the row without coordinates and the New York row
    assert_eq!(engine.cleaned_geo().unwrap().indices(), &[0, 1, 2]);
}

#[test]
fn test_rush_hour_nearby() {
    let table = incidents_table();
    let engine = QueryEngine::new(&table);

    let in_2024 = engine.rush_hour_nearby(QUERY_LAT, QUERY_LON, 2024, 1.0).unwrap();
    assert_eq!(in_2024.rows.indices(), &[0]);

    let in_2023 = engine.rush_hour_nearby(QUERY_LAT, QUERY_LON, 2023, 1.0).unwrap();
    assert_eq!(in_2023.rows.indices(), &[2]);

    let in_2021 = engine.rush_hour_nearby(QUERY_LAT, QUERY_LON, 2021, 1.0).unwrap();
    assert!(in_2021.is_empty());
}

#[test]
fn test_composed_predicate() {
    let table = incidents_table();
    let predicate = Predicate::equals("Status", "ARCHIVED")
        .and(Predicate::NotNull("Issue Reported".to_string()))
        .and(Predicate::between("Latitude", 0.0, 35.0));
    assert_eq!(table.filter(&predicate).unwrap().indices(), &[1, 2, 3]);
}

#[test]
fn test_concurrent_queries_share_table() {
    use std::sync::Arc;
    use std::thread;

    let table = Arc::new(incidents_table());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                let engine = QueryEngine::new(&table);
                (
                    engine.rush_hour_filter().unwrap().len(),
                    engine.nearby(QUERY_LAT, QUERY_LON, 1.0).unwrap().len(),
                )
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), (3, 2));
    }
}

#[test]
fn test_cleaned_geo_drops_partial_coordinates() {
    // Missing values never satisfy a comparison, "!= 0" included
    let table = table_from(
        "Traffic Report ID,Latitude,Longitude\n\
         C1,30.2,-97.7\n\
         C2,30.3,\n\
         C3,,-97.7\n",
    );
    let engine = QueryEngine::new(&table);
    assert_eq!(engine.cleaned_geo().unwrap().indices(), &[0]);

    let not_zero = table.filter(&Predicate::not_equals("Longitude", 0.0)).unwrap();
    assert_eq!(not_zero.indices(), &[0, 2]);
}
