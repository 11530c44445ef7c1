//! Unit tests for threshold evaluation.
//!
//! Run with: cargo test --test trigger_unit_test

use irrigo_api::decision::{TriggerReason, evaluate_trigger};
use irrigo_api::entity::devices::DeviceConfig;

#[test]
fn moisture_below_default_floor_triggers() {
    let config = DeviceConfig::default();

    assert_eq!(
        evaluate_trigger(&config, Some(25.0), Some(20.0)),
        Some(TriggerReason::LowMoisture)
    );
}

#[test]
fn moisture_at_or_above_floor_does_not_trigger() {
    let config = DeviceConfig::default();

    // At the floor is not a breach
    assert_eq!(evaluate_trigger(&config, Some(30.0), Some(20.0)), None);
    assert_eq!(evaluate_trigger(&config, Some(50.0), Some(20.0)), None);
}

#[test]
fn temperature_above_default_ceiling_triggers() {
    let config = DeviceConfig::default();

    assert_eq!(
        evaluate_trigger(&config, Some(50.0), Some(40.0)),
        Some(TriggerReason::HighTemp)
    );

    // At the ceiling is not a breach
    assert_eq!(evaluate_trigger(&config, Some(50.0), Some(35.0)), None);
}

#[test]
fn moisture_floor_wins_over_temperature_ceiling() {
    let config = DeviceConfig::default();

    assert_eq!(
        evaluate_trigger(&config, Some(10.0), Some(40.0)),
        Some(TriggerReason::LowMoisture)
    );
}

#[test]
fn missing_readings_never_trigger() {
    let config = DeviceConfig::default();

    assert_eq!(evaluate_trigger(&config, None, None), None);
    assert_eq!(evaluate_trigger(&config, None, Some(20.0)), None);
    assert_eq!(evaluate_trigger(&config, Some(50.0), None), None);
}

#[test]
fn stored_thresholds_override_defaults() {
    let config = DeviceConfig {
        min_moisture: 50.0,
        max_temp: 25.0,
        ..DeviceConfig::default()
    };

    assert_eq!(
        evaluate_trigger(&config, Some(45.0), Some(20.0)),
        Some(TriggerReason::LowMoisture)
    );
    assert_eq!(
        evaluate_trigger(&config, Some(60.0), Some(30.0)),
        Some(TriggerReason::HighTemp)
    );
    assert_eq!(evaluate_trigger(&config, Some(60.0), Some(20.0)), None);
}

#[test]
fn default_config_matches_firmware_expectations() {
    let config = DeviceConfig::default();

    assert_eq!(config.min_moisture, 30.0);
    assert_eq!(config.max_moisture, 70.0);
    assert_eq!(config.min_temp, 10.0);
    assert_eq!(config.max_temp, 35.0);
    assert_eq!(config.irrigation_duration, 1800);
    assert_eq!(config.sensor_interval, 60);
    assert_eq!(config.sync_interval, 300);
}

#[test]
fn config_serializes_with_wire_field_names() {
    let json = serde_json::to_value(DeviceConfig::default()).unwrap();

    assert_eq!(json["minMoisture"], 30.0);
    assert_eq!(json["maxTemp"], 35.0);
    assert_eq!(json["irrigationDuration"], 1800);
}

#[test]
fn partial_stored_config_falls_back_per_field() {
    let config: DeviceConfig = serde_json::from_value(serde_json::json!({
        "minMoisture": 42.0
    }))
    .unwrap();

    assert_eq!(config.min_moisture, 42.0);
    assert_eq!(config.max_temp, 35.0);
}
