//! HM3301 frame decode tests
//!
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test frame_tests

use weather_firmware::drivers::hm3301::{checksum_ok, chip_id, decode, CHIP_ID, FRAME_LEN};

/// Build a frame with the given six concentration fields and a valid checksum
fn frame_with(fields: [u16; 6]) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[2..4].copy_from_slice(&CHIP_ID.to_be_bytes());
    for (i, field) in fields.iter().enumerate() {
        frame[4 + i * 2..6 + i * 2].copy_from_slice(&field.to_be_bytes());
    }
    let sum: u32 = frame[..FRAME_LEN - 1].iter().map(|&b| u32::from(b)).sum();
    frame[FRAME_LEN - 1] = (sum & 0xFF) as u8;
    frame
}

// ============================================================================
// Checksum Tests
// ============================================================================

#[test]
fn test_valid_checksum_accepted() {
    let frame = frame_with([10, 25, 40, 11, 26, 41]);
    assert!(checksum_ok(&frame));
}

#[test]
fn test_checksum_is_truncated_sum() {
    // Field values large enough that the 28-byte sum exceeds 255
    let frame = frame_with([0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF]);
    assert!(checksum_ok(&frame));
}

#[test]
fn test_single_byte_mutation_rejected() {
    let mut frame = frame_with([10, 25, 40, 11, 26, 41]);
    frame[5] ^= 0x01;
    assert!(!checksum_ok(&frame));
}

#[test]
fn test_mutated_checksum_byte_rejected() {
    let mut frame = frame_with([10, 25, 40, 11, 26, 41]);
    frame[FRAME_LEN - 1] = frame[FRAME_LEN - 1].wrapping_add(1);
    assert!(!checksum_ok(&frame));
}

#[test]
fn test_all_zero_frame_has_valid_checksum() {
    let frame = [0u8; FRAME_LEN];
    assert!(checksum_ok(&frame));
}

// ============================================================================
// Field Decode Tests
// ============================================================================

#[test]
fn test_fields_decode_at_documented_offsets() {
    let frame = frame_with([101, 202, 303, 404, 505, 606]);
    let reading = decode(&frame);

    assert_eq!(reading.pm1_0_std, 101);
    assert_eq!(reading.pm2_5_std, 202);
    assert_eq!(reading.pm10_std, 303);
    assert_eq!(reading.pm1_0_atm, 404);
    assert_eq!(reading.pm2_5_atm, 505);
    assert_eq!(reading.pm10_atm, 606);
}

#[test]
fn test_fields_are_big_endian() {
    let mut frame = [0u8; FRAME_LEN];
    frame[4] = 0x01;
    frame[5] = 0x02;
    assert_eq!(decode(&frame).pm1_0_std, 0x0102);
}

#[test]
fn test_decode_ignores_checksum() {
    // Decode is unconditional; the caller pairs it with checksum_ok
    let mut frame = frame_with([7, 8, 9, 10, 11, 12]);
    frame[FRAME_LEN - 1] ^= 0xFF;
    assert!(!checksum_ok(&frame));
    assert_eq!(decode(&frame).pm2_5_std, 8);
}

#[test]
fn test_chip_id_at_bytes_2_and_3() {
    let frame = frame_with([0; 6]);
    assert_eq!(chip_id(&frame), CHIP_ID);

    let mut other = frame;
    other[2] = 0xAB;
    other[3] = 0xCD;
    assert_eq!(chip_id(&other), 0xABCD);
}
