//! GPS receiver state folding tests
//!
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test gps_tests

use weather_firmware::drivers::gps::GpsReceiver;
use weather_firmware::nmea::checksum;
use weather_firmware::types::AntennaStatus;

/// Frame a body into a full sentence with a correct checksum
fn sentence(body: &str) -> String {
    format!("${}*{:02X}\r\n", body, checksum(body.as_bytes()))
}

fn feed(receiver: &mut GpsReceiver, body: &str) -> bool {
    sentence(body).bytes().fold(false, |changed, b| {
        changed | receiver.feed(b)
    })
}

// ============================================================================
// Snapshot Folding Tests
// ============================================================================

#[test]
fn test_starts_empty() {
    let receiver = GpsReceiver::new();
    let data = receiver.data();
    assert!(!data.has_fix());
    assert_eq!(data.datetime, None);
    assert_eq!(data.antenna, AntennaStatus::Unknown);
}

#[test]
fn test_gga_with_fix_populates_position() {
    let mut receiver = GpsReceiver::new();
    assert!(feed(
        &mut receiver,
        "GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,"
    ));

    let fix = receiver.data().fix.expect("fix expected");
    assert!((fix.latitude - 48.1173).abs() < 0.0001);
    assert!((fix.longitude - 11.5166).abs() < 0.0001);
    assert!((fix.altitude_m - 545.4).abs() < 0.01);
}

#[test]
fn test_fixless_gga_clears_stale_position() {
    let mut receiver = GpsReceiver::new();
    feed(
        &mut receiver,
        "GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,",
    );
    assert!(receiver.data().has_fix());

    assert!(feed(&mut receiver, "GPGGA,123520,,,,,0,00,,,M,,M,,"));
    assert!(!receiver.data().has_fix());
}

#[test]
fn test_zda_populates_datetime() {
    let mut receiver = GpsReceiver::new();
    assert!(feed(&mut receiver, "GPZDA,160012.71,11,03,2004,,"));

    let datetime = receiver.data().datetime.expect("datetime expected");
    assert_eq!(datetime.year, 2004);
    assert_eq!(datetime.hour, 16);
}

#[test]
fn test_txt_updates_antenna_status() {
    let mut receiver = GpsReceiver::new();
    assert!(feed(&mut receiver, "GPTXT,01,01,01,ANTENNA OPEN"));
    assert_eq!(receiver.data().antenna, AntennaStatus::Open);

    assert!(feed(&mut receiver, "GPTXT,01,01,01,ANTENNA OK"));
    assert_eq!(receiver.data().antenna, AntennaStatus::Connected);
}

#[test]
fn test_repeated_identical_sentences_report_no_change() {
    let mut receiver = GpsReceiver::new();
    let body = "GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,";

    assert!(feed(&mut receiver, body));
    assert!(!feed(&mut receiver, body));
}

#[test]
fn test_unsupported_sentences_leave_state_untouched() {
    let mut receiver = GpsReceiver::new();
    assert!(!feed(
        &mut receiver,
        "GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W"
    ));
    assert!(!receiver.data().has_fix());
}

#[test]
fn test_corrupted_sentence_ignored() {
    let mut receiver = GpsReceiver::new();
    let mut raw = sentence("GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,");
    // Flip one payload character so the checksum no longer matches
    raw = raw.replace("4807", "4907");

    let changed = raw.bytes().fold(false, |c, b| c | receiver.feed(b));
    assert!(!changed);
    assert!(!receiver.data().has_fix());
}
