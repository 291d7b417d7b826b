// SB8200 - Integration Tests
//
// End-to-end collection over synthetic tables and a captured status page.
// The tests are organized into categories:
// 1. Status page fixture
// 2. Downstream / upstream channel tables
// 3. Startup procedure
// 4. Failure modes

use approx::assert_relative_eq;
use sb8200::{
    header, Collector, CollectorConfig, MetricKind, Observation, RawTable, Sb8200Error, Table,
};
use std::collections::HashSet;

const STATUS_PAGE: &str = include_str!("fixtures/cmconnectionstatus.html");

fn find<'a>(obs: &'a [Observation], name: &str, channel_id: &str) -> &'a Observation {
    obs.iter()
        .find(|o| o.name == name && o.labels.get("channel_id") == Some(channel_id))
        .unwrap_or_else(|| panic!("missing {} for channel {}", name, channel_id))
}

fn downstream(rows: Vec<Vec<&str>>) -> RawTable {
    let mut cells = vec![vec![
        "Channel ID",
        "Frequency",
        "Corrected",
        "Uncorrectables",
    ]];
    cells.extend(rows);
    RawTable::new(Some("Downstream Bonded Channels"), cells)
}

// ============================================================================
// Status Page Fixture
// ============================================================================

#[test]
fn test_status_page_observation_count() {
    let obs = Collector::new().collect_page(STATUS_PAGE).unwrap();

    // 3 downstream rows x (4 values + state), 2 upstream rows x (3 values + state), page state
    assert_eq!(obs.len(), 24);
    assert_eq!(obs.last().unwrap().name, "sb8200_state");
}

#[test]
fn test_status_page_downstream_values() {
    let obs = Collector::new().collect_page(STATUS_PAGE).unwrap();

    let power = find(&obs, "sb8200_downstream_power", "33");
    assert_eq!(power.kind, MetricKind::Gauge);
    assert_relative_eq!(power.value, -1.4);
    assert_eq!(power.labels.get("frequency"), Some("690000000 Hz"));

    let snr = find(&obs, "sb8200_downstream_snr_mer", "1");
    assert_relative_eq!(snr.value, 43.3);

    let corrected = find(&obs, "sb8200_downstream_corrected", "33");
    assert_eq!(corrected.kind, MetricKind::Counter);
    assert_relative_eq!(corrected.value, 1458721.0);

    let state = find(&obs, "sb8200_downstream_state", "2");
    assert_eq!(state.labels.get("lock_status"), Some("Locked"));
    assert_eq!(state.labels.get("modulation"), Some("QAM256"));
    assert_eq!(state.labels.get("frequency"), Some("555000000 Hz"));
}

#[test]
fn test_status_page_upstream_values() {
    let obs = Collector::new().collect_page(STATUS_PAGE).unwrap();

    let power = find(&obs, "sb8200_upstream_power", "2");
    assert_relative_eq!(power.value, 45.0);
    assert_eq!(power.kind, MetricKind::Gauge);

    let width = find(&obs, "sb8200_upstream_width", "1");
    assert_relative_eq!(width.value, 6400000.0);

    let state = find(&obs, "sb8200_upstream_state", "1");
    assert_eq!(state.labels.get("us_channel_type"), Some("SC-QAM Upstream"));
    assert!(obs
        .iter()
        .filter(|o| o.name.starts_with("sb8200_upstream_"))
        .all(|o| o.kind == MetricKind::Gauge));
}

#[test]
fn test_status_page_startup_state() {
    let obs = Collector::new().collect_page(STATUS_PAGE).unwrap();
    let state = obs.iter().find(|o| o.name == "sb8200_state").unwrap();

    assert_eq!(state.value, 1.0);
    assert_eq!(state.labels.len(), 12);
    assert_eq!(
        state.labels.get("acquire_downstream_channel_comment"),
        Some("Locked")
    );
    assert_eq!(state.labels.get("security_comment"), Some("BPI+"));
    assert_eq!(state.labels.get("configuration_file_comment"), Some(""));
    assert_eq!(
        state.labels.get("docsis_network_access_enabled_status"),
        Some("Allowed")
    );
}

#[test]
fn test_status_page_no_duplicates() {
    let obs = Collector::new().collect_page(STATUS_PAGE).unwrap();
    let identities: HashSet<_> = obs.iter().map(|o| o.identity()).collect();
    assert_eq!(identities.len(), obs.len());
}

#[test]
fn test_status_page_deterministic() {
    let collector = Collector::new();
    let first = collector.collect_page(STATUS_PAGE).unwrap();
    let second = collector.collect_page(STATUS_PAGE).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_status_page_names_are_normalized() {
    let obs = Collector::new().collect_page(STATUS_PAGE).unwrap();
    for o in &obs {
        assert!(header::is_normalized(&o.name), "bad name {}", o.name);
        for key in o.labels.keys() {
            assert!(header::is_normalized(key), "bad label {}", key);
        }
    }
}

#[test]
fn test_status_page_serializes() {
    let obs = Collector::new().collect_page(STATUS_PAGE).unwrap();
    let json = serde_json::to_string(&obs).unwrap();
    assert!(json.contains("\"kind\":\"counter\""));
    assert!(json.contains("sb8200_downstream_uncorrectables"));
}

// ============================================================================
// Channel Tables
// ============================================================================

#[test]
fn test_downstream_round_trip() {
    let table = downstream(vec![
        vec!["1", "549000000 Hz", "0", "0"],
        vec!["2", "555000000 Hz", "3", "1"],
    ]);
    let obs = Collector::new().collect_tables(&[table]).unwrap();

    assert_eq!(obs.len(), 4);
    assert!(obs.iter().all(|o| o.kind == MetricKind::Counter));
    assert!(obs.iter().all(|o| o.name != "sb8200_downstream_state"));

    let c1 = find(&obs, "sb8200_downstream_corrected", "1");
    let c2 = find(&obs, "sb8200_downstream_corrected", "2");
    let u1 = find(&obs, "sb8200_downstream_uncorrectables", "1");
    let u2 = find(&obs, "sb8200_downstream_uncorrectables", "2");
    assert_eq!(c1.value, 0.0);
    assert_eq!(c2.value, 3.0);
    assert_eq!(u1.value, 0.0);
    assert_eq!(u2.value, 1.0);
    assert_eq!(c1.labels.get("frequency"), Some("549000000 Hz"));
    assert_eq!(u2.labels.get("frequency"), Some("555000000 Hz"));
}

#[test]
fn test_identifiers_never_named() {
    let obs = Collector::new()
        .collect_tables(&[downstream(vec![vec!["7", "603000000 Hz", "15", "2"]])])
        .unwrap();
    for o in &obs {
        assert!(!o.name.ends_with("channel_id"));
        assert!(!o.name.ends_with("frequency"));
    }
    assert_eq!(find(&obs, "sb8200_downstream_corrected", "7").value, 15.0);
}

#[test]
fn test_added_channel_and_reordered_columns() {
    let table = RawTable::new(
        Some("Downstream Bonded Channels"),
        vec![
            vec!["Uncorrectables", "Frequency", "Channel ID", "Corrected"],
            vec!["9", "561000000 Hz", "3", "4"],
            vec!["0", "567000000 Hz", "4", "0"],
        ],
    );
    let obs = Collector::new().collect_tables(&[table]).unwrap();
    assert_eq!(obs.len(), 4);
    assert_eq!(find(&obs, "sb8200_downstream_uncorrectables", "3").value, 9.0);
    assert_eq!(find(&obs, "sb8200_downstream_corrected", "3").value, 4.0);
}

#[test]
fn test_short_row_tolerated() {
    let table = downstream(vec![vec!["1", "549000000 Hz", "5"]]);
    let obs = Collector::new().collect_tables(&[table]).unwrap();
    assert_eq!(obs.len(), 1);
    assert_eq!(obs[0].name, "sb8200_downstream_corrected");
}

#[test]
fn test_extractor_row_count() {
    let raw = downstream(vec![
        vec![],
        vec!["1", "549000000 Hz", "0", "0"],
        vec![],
        vec!["2", "555000000 Hz", "0", "0"],
    ]);
    let non_empty = raw.cells.iter().filter(|r| !r.is_empty()).count();
    assert_eq!(Table::extract(&raw).rows().len(), non_empty - 1);
}

// ============================================================================
// Startup Procedure
// ============================================================================

#[test]
fn test_startup_single_row() {
    let table = RawTable::new(
        Some("Startup Procedure"),
        vec![
            vec!["Procedure", "Status"],
            vec!["Acquire Downstream Channel", "Locked"],
        ],
    );
    let obs = Collector::new().collect_tables(&[table]).unwrap();
    assert_eq!(obs.len(), 1);
    assert_eq!(obs[0].name, "sb8200_state");
    assert_eq!(obs[0].kind, MetricKind::Gauge);
    assert_eq!(
        obs[0].labels.get("acquire_downstream_channel_status"),
        Some("Locked")
    );
}

#[test]
fn test_missing_startup_table_adds_no_state() {
    let obs = Collector::new()
        .collect_tables(&[downstream(vec![vec!["1", "549000000 Hz", "0", "0"]])])
        .unwrap();
    assert!(obs.iter().all(|o| o.name != "sb8200_state"));
}

// ============================================================================
// Failure Modes
// ============================================================================

#[test]
fn test_unknown_table_fails_cycle() {
    let page = STATUS_PAGE.replace("Upstream Bonded Channels", "Upstream OFDMA Channels");
    let result = Collector::new().collect_page(&page);
    assert_eq!(
        result,
        Err(Sb8200Error::Schema {
            title: "Upstream OFDMA Channels".to_string()
        })
    );
}

#[test]
fn test_unknown_table_skipped_when_configured() {
    let page = STATUS_PAGE.replace("Upstream Bonded Channels", "Upstream OFDMA Channels");
    let config = CollectorConfig {
        ignore_unknown_tables: true,
        ..Default::default()
    };
    let obs = Collector::with_config(config).collect_page(&page).unwrap();
    // Upstream observations are gone, everything else remains
    assert_eq!(obs.len(), 16);
}

#[test]
fn test_malformed_number_fails_cycle() {
    let table = downstream(vec![vec!["1", "549000000 Hz", "1.2.3", "0"]]);
    let result = Collector::new().collect_tables(&[table]);
    assert!(matches!(
        result,
        Err(Sb8200Error::Classification { ref text, .. }) if text == "1.2.3"
    ));
}

#[test]
fn test_repeated_downstream_table_fails_cycle() {
    let row = vec!["1", "549000000 Hz", "0", "0"];
    let tables = [downstream(vec![row.clone()]), downstream(vec![row])];
    let result = Collector::new().collect_tables(&tables);
    assert!(matches!(
        result,
        Err(Sb8200Error::DuplicateObservation { .. })
    ));
}

#[test]
fn test_login_page_yields_nothing() {
    let page = "<html><body><form><label>Username:</label><label>Password:</label></form></body></html>";
    let obs = Collector::new().collect_page(page).unwrap();
    assert!(obs.is_empty());
}
