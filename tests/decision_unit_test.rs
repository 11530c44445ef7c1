//! Unit tests for the recommendation rule.
//!
//! Run with: cargo test --test decision_unit_test

use irrigo_api::decision::{Recommendation, TriggerReason, recommend};

#[test]
fn low_moisture_recommends_irrigate() {
    assert_eq!(recommend("low_moisture"), Recommendation::Irrigate);
}

#[test]
fn high_temp_recommends_evening_irrigation() {
    assert_eq!(recommend("high_temp"), Recommendation::IrrigateEvening);
}

#[test]
fn unknown_trigger_recommends_monitor() {
    assert_eq!(recommend("frost_warning"), Recommendation::Monitor);
    assert_eq!(recommend(""), Recommendation::Monitor);
}

#[test]
fn trigger_reasons_round_trip_through_storage_strings() {
    // What ingestion writes is what the batch reads back
    assert_eq!(
        recommend(TriggerReason::LowMoisture.as_str()),
        Recommendation::Irrigate
    );
    assert_eq!(
        recommend(TriggerReason::HighTemp.as_str()),
        Recommendation::IrrigateEvening
    );
}

#[test]
fn recommendation_strings_are_stable() {
    assert_eq!(Recommendation::Irrigate.as_str(), "irrigate");
    assert_eq!(Recommendation::IrrigateEvening.as_str(), "irrigate_evening");
    assert_eq!(Recommendation::Monitor.as_str(), "monitor");
}
