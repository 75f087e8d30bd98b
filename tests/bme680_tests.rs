//! BME680 calibration decode and compensation tests
//!
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test bme680_tests

use weather_firmware::drivers::bme680::{
    decode_field, encode_gas_wait, field_ready, Calibration, Oversampling, COEFF_BLOCK_1_LEN,
    COEFF_BLOCK_2_LEN, FIELD_LEN,
};

/// Calibration values in the range real parts report
fn typical_calibration() -> Calibration {
    Calibration {
        par_t1: 26_136,
        par_t2: 26_591,
        par_t3: 3,
        par_p1: 36_283,
        par_p2: -10_380,
        par_p3: 88,
        par_p4: 7_245,
        par_p5: -117,
        par_p6: 30,
        par_p7: 45,
        par_p8: -3_977,
        par_p9: -2_360,
        par_p10: 30,
        par_h1: 724,
        par_h2: 1_019,
        par_h3: 0,
        par_h4: 45,
        par_h5: 20,
        par_h6: 120,
        par_h7: -100,
        par_gh1: -30,
        par_gh2: -8_557,
        par_gh3: 18,
        res_heat_range: 1,
        res_heat_val: 48,
        range_sw_err: 0,
    }
}

// ============================================================================
// Register Encoding Tests
// ============================================================================

#[test]
fn test_oversampling_bits() {
    assert_eq!(Oversampling::Skipped.as_bits(), 0b000);
    assert_eq!(Oversampling::X1.as_bits(), 0b001);
    assert_eq!(Oversampling::X2.as_bits(), 0b010);
    assert_eq!(Oversampling::X4.as_bits(), 0b011);
    assert_eq!(Oversampling::X8.as_bits(), 0b100);
    assert_eq!(Oversampling::X16.as_bits(), 0b101);
}

#[test]
fn test_gas_wait_short_duration_uses_x1_multiplier() {
    assert_eq!(encode_gas_wait(30), 0x1E);
    assert_eq!(encode_gas_wait(63), 0x3F);
}

#[test]
fn test_gas_wait_150ms() {
    // 150 ms does not fit the 6-bit base, so 37 * 4 ms
    assert_eq!(encode_gas_wait(150), 0x65);
}

#[test]
fn test_gas_wait_saturates_at_register_maximum() {
    assert_eq!(encode_gas_wait(4032), 0xFF);
    assert_eq!(encode_gas_wait(u16::MAX), 0xFF);
}

// ============================================================================
// Field Decode Tests
// ============================================================================

#[test]
fn test_field_decode_bit_packing() {
    let mut data = [0u8; FIELD_LEN];
    data[0] = 0x80;
    data[2] = 0x12;
    data[3] = 0x34;
    data[4] = 0x50;
    data[5] = 0x67;
    data[6] = 0x89;
    data[7] = 0xA0;
    data[8] = 0x0B;
    data[9] = 0xB8;
    data[13] = 0xFF;
    data[14] = 0xDF;

    let raw = decode_field(&data);
    assert_eq!(raw.pressure, 0x12345);
    assert_eq!(raw.temperature, 0x6789A);
    assert_eq!(raw.humidity, 3000);
    assert_eq!(raw.gas, 1023);
    assert_eq!(raw.gas_range, 0x0F);
    assert!(raw.heater_stable);
}

#[test]
fn test_field_ready_bit() {
    assert!(field_ready(0x80));
    assert!(field_ready(0xA0));
    assert!(!field_ready(0x00));
    assert!(!field_ready(0x7F));
}

// ============================================================================
// Calibration Decode Tests
// ============================================================================

#[test]
fn test_coefficient_block_mapping() {
    let mut coeff1 = [0u8; COEFF_BLOCK_1_LEN];
    let mut coeff2 = [0u8; COEFF_BLOCK_2_LEN];

    // par_t2 is little-endian at coeff1[1..3], par_t3 at coeff1[3]
    coeff1[1] = 0xDF;
    coeff1[2] = 0x67; // 0x67DF = 26591
    coeff1[3] = 0x03;

    // par_t1 is little-endian at coeff2[8..10]
    coeff2[8] = 0x18;
    coeff2[9] = 0x66; // 0x6618 = 26136

    // par_h1/par_h2 are 12-bit values sharing coeff2[1]
    coeff2[0] = 0x3F;
    coeff2[1] = 0x8A;
    coeff2[2] = 0x2D;

    // par_gh2 little-endian at coeff2[10..12], gh1 and gh3 after it
    coeff2[10] = 0x93;
    coeff2[11] = 0xDE; // -8557
    coeff2[12] = 0xE2; // -30
    coeff2[13] = 0x12; // 18

    let calib = Calibration::from_registers(&coeff1, &coeff2, 0x16, 0x30, 0xF0);

    assert_eq!(calib.par_t1, 26_136);
    assert_eq!(calib.par_t2, 26_591);
    assert_eq!(calib.par_t3, 3);
    assert_eq!(calib.par_h1, (0x2D << 4) | 0x0A);
    assert_eq!(calib.par_h2, (0x3F << 4) | 0x08);
    assert_eq!(calib.par_gh2, -8_557);
    assert_eq!(calib.par_gh1, -30);
    assert_eq!(calib.par_gh3, 18);
    assert_eq!(calib.res_heat_range, 1);
    assert_eq!(calib.res_heat_val, 48);
    assert_eq!(calib.range_sw_err, -1);
}

// ============================================================================
// Compensation Tests
// ============================================================================

#[test]
fn test_temperature_in_plausible_range() {
    let calib = typical_calibration();
    let (temp, t_fine) = calib.compensate_temperature(500_000);
    assert!(temp > 15.0 && temp < 35.0, "temp {temp}");
    assert!((t_fine / 5120.0 - temp).abs() < 1e-3);
}

#[test]
fn test_temperature_monotonic_in_adc() {
    let calib = typical_calibration();
    let (low, _) = calib.compensate_temperature(480_000);
    let (high, _) = calib.compensate_temperature(520_000);
    assert!(high > low);
}

#[test]
fn test_pressure_positive_and_finite() {
    let calib = typical_calibration();
    let (_, t_fine) = calib.compensate_temperature(500_000);
    let pascal = calib.compensate_pressure(350_000, t_fine);
    assert!(pascal.is_finite());
    assert!(pascal > 30_000.0 && pascal < 120_000.0, "pressure {pascal}");
}

#[test]
fn test_humidity_always_clamped() {
    let calib = typical_calibration();
    for adc in [0u16, 10_000, 30_000, u16::MAX] {
        let humidity = calib.compensate_humidity(adc, 25.0);
        assert!((0.0..=100.0).contains(&humidity), "humidity {humidity}");
    }
}

#[test]
fn test_gas_resistance_positive() {
    let calib = typical_calibration();
    let ohms = calib.gas_resistance(400, 4);
    assert!(ohms.is_finite());
    assert!(ohms > 0.0);
}

#[test]
fn test_heater_set_point_rises_with_target() {
    let calib = typical_calibration();
    let low = calib.res_heat(200, 25.0);
    let high = calib.res_heat(320, 25.0);
    assert!(high > low);
}
