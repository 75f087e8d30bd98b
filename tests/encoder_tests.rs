//! Rotary encoder direction resolution tests
//!
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test encoder_tests

use weather_firmware::drivers::encoder::{Debounce, Direction, EdgeTracker};

// ============================================================================
// Direction Resolution Tests
// ============================================================================

#[test]
fn test_dt_then_clk_resolves_clockwise() {
    let mut tracker = EdgeTracker::new();

    assert_eq!(tracker.dt_edge(), None);
    assert_eq!(tracker.clk_edge(), Some(Direction::Clockwise));
}

#[test]
fn test_clk_then_dt_resolves_counter_clockwise() {
    let mut tracker = EdgeTracker::new();

    assert_eq!(tracker.clk_edge(), None);
    assert_eq!(tracker.dt_edge(), Some(Direction::CounterClockwise));
}

#[test]
fn test_lone_edge_stays_pending() {
    let mut tracker = EdgeTracker::new();

    assert_eq!(tracker.clk_edge(), None);
    assert!(tracker.is_pending());
}

#[test]
fn test_flags_reset_after_resolution() {
    let mut tracker = EdgeTracker::new();

    tracker.dt_edge();
    tracker.clk_edge();
    assert!(!tracker.is_pending());

    // The next pair resolves fresh, unaffected by the previous rotation
    assert_eq!(tracker.clk_edge(), None);
    assert_eq!(tracker.dt_edge(), Some(Direction::CounterClockwise));
}

#[test]
fn test_repeated_edges_on_one_channel_never_resolve() {
    let mut tracker = EdgeTracker::new();

    for _ in 0..5 {
        assert_eq!(tracker.clk_edge(), None);
    }
    assert!(tracker.is_pending());
}

#[test]
fn test_explicit_reset_discards_pending_edge() {
    let mut tracker = EdgeTracker::new();

    tracker.dt_edge();
    tracker.reset();
    assert!(!tracker.is_pending());

    // The discarded DT edge must not pair with this CLK edge
    assert_eq!(tracker.clk_edge(), None);
}

#[test]
fn test_alternating_rotations() {
    let mut tracker = EdgeTracker::new();

    tracker.dt_edge();
    assert_eq!(tracker.clk_edge(), Some(Direction::Clockwise));

    tracker.clk_edge();
    assert_eq!(tracker.dt_edge(), Some(Direction::CounterClockwise));

    tracker.dt_edge();
    assert_eq!(tracker.clk_edge(), Some(Direction::Clockwise));
}

// ============================================================================
// Debounce Tests
// ============================================================================

#[test]
fn test_first_edge_always_accepted() {
    let mut debounce = Debounce::new(100);
    assert!(debounce.accept(0));
}

#[test]
fn test_edge_inside_window_rejected() {
    let mut debounce = Debounce::new(100);

    assert!(debounce.accept(1000));
    assert!(!debounce.accept(1050));
    assert!(!debounce.accept(1099));
}

#[test]
fn test_edge_after_window_accepted() {
    let mut debounce = Debounce::new(100);

    assert!(debounce.accept(1000));
    assert!(debounce.accept(1100));
}

#[test]
fn test_rejected_edge_does_not_extend_window() {
    let mut debounce = Debounce::new(100);

    assert!(debounce.accept(1000));
    assert!(!debounce.accept(1090));
    // Window is measured from the accepted edge at 1000, not from 1090
    assert!(debounce.accept(1105));
}

#[test]
fn test_window_survives_millisecond_counter_wrap() {
    let mut debounce = Debounce::new(100);

    assert!(debounce.accept(u32::MAX - 10));
    assert!(!debounce.accept(20)); // 31 ms later across the wrap
    assert!(debounce.accept(150));
}
