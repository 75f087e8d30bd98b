//! OLED text layout tests
//!
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test ui_tests

use weather_firmware::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use weather_firmware::drivers::display::DisplayBuffer;
use weather_firmware::ui::{self, centered_x, TextSize};

// ============================================================================
// Font Selection Tests
// ============================================================================

#[test]
fn test_single_line_gets_huge_face() {
    assert_eq!(TextSize::for_line_count(1), TextSize::Huge);
}

#[test]
fn test_two_lines_get_big_face() {
    assert_eq!(TextSize::for_line_count(2), TextSize::Big);
}

#[test]
fn test_three_or_more_lines_get_default_face() {
    assert_eq!(TextSize::for_line_count(3), TextSize::Default);
    assert_eq!(TextSize::for_line_count(7), TextSize::Default);
    assert_eq!(TextSize::for_line_count(0), TextSize::Default);
}

#[test]
fn test_face_widths_are_ordered() {
    assert!(TextSize::Default.char_width() < TextSize::Big.char_width());
    assert!(TextSize::Big.char_width() < TextSize::Huge.char_width());
}

// ============================================================================
// Centering Tests
// ============================================================================

#[test]
fn test_short_line_centered() {
    // Two Huge glyphs of 10 px: (128 - 20) / 2 + 2
    assert_eq!(centered_x("AB", TextSize::Huge), 56);
}

#[test]
fn test_empty_line_centered_to_midpoint() {
    assert_eq!(centered_x("", TextSize::Big), 66);
}

#[test]
fn test_overlong_line_clamps_to_left_edge() {
    let long = "ABCDEFGHIJKLMNOPQRSTUVWX";
    assert_eq!(centered_x(long, TextSize::Huge), 0);
}

#[test]
fn test_wider_face_starts_further_left() {
    let text = "12345";
    assert!(centered_x(text, TextSize::Huge) < centered_x(text, TextSize::Default));
}

// ============================================================================
// Rendering Tests
// ============================================================================

#[test]
fn test_render_lights_pixels() {
    let mut buffer = DisplayBuffer::new();
    ui::render_value(&mut buffer, "21.5C");
    assert!(buffer.lit_pixels() > 0);
}

#[test]
fn test_render_clears_previous_content() {
    let mut buffer = DisplayBuffer::new();
    ui::render_value(&mut buffer, "WWWWWWWWWW\nWWWWWWWWWW");

    // Whitespace-only text leaves an empty panel
    ui::render_value(&mut buffer, " ");
    assert_eq!(buffer.lit_pixels(), 0);
}

#[test]
fn test_multi_line_text_renders_more_pixels_than_one_line() {
    let mut one = DisplayBuffer::new();
    let mut two = DisplayBuffer::new();
    ui::render(&mut one, "888", TextSize::Default);
    ui::render(&mut two, "888\n888", TextSize::Default);
    assert!(two.lit_pixels() > one.lit_pixels());
}

#[test]
fn test_label_rendering_uses_big_face_for_any_line_count() {
    // One line rendered as a label must match Big, not Huge
    let mut label = DisplayBuffer::new();
    let mut big = DisplayBuffer::new();
    ui::render_label(&mut label, "GPS");
    ui::render(&mut big, "GPS", TextSize::Big);
    assert_eq!(label.as_bytes(), big.as_bytes());
}

// ============================================================================
// Display Buffer Tests
// ============================================================================

#[test]
fn test_pixel_set_and_read_back() {
    let mut buffer = DisplayBuffer::new();
    buffer.set_pixel(10, 20, true);
    assert!(buffer.pixel(10, 20));
    buffer.set_pixel(10, 20, false);
    assert!(!buffer.pixel(10, 20));
}

#[test]
fn test_out_of_range_pixels_ignored() {
    let mut buffer = DisplayBuffer::new();
    buffer.set_pixel(DISPLAY_WIDTH, 0, true);
    buffer.set_pixel(0, DISPLAY_HEIGHT, true);
    assert_eq!(buffer.lit_pixels(), 0);
    assert!(!buffer.pixel(DISPLAY_WIDTH, 0));
}

#[test]
fn test_page_major_byte_layout() {
    let mut buffer = DisplayBuffer::new();

    // (0, 0) is bit 0 of byte 0
    buffer.set_pixel(0, 0, true);
    assert_eq!(buffer.as_bytes()[0], 0x01);

    // (5, 9) is bit 1 of byte 128 + 5 on page 1
    buffer.clear_all();
    buffer.set_pixel(5, 9, true);
    assert_eq!(buffer.as_bytes()[133], 0x02);
}

#[test]
fn test_clear_all_resets_buffer() {
    let mut buffer = DisplayBuffer::new();
    buffer.set_pixel(3, 3, true);
    buffer.clear_all();
    assert_eq!(buffer.lit_pixels(), 0);
}
