//! OLED Text Layout
//!
//! Centered multi-line text rendering onto a [`DisplayBuffer`]. The font
//! scales with how much has to fit: a single line gets the largest face, two
//! lines a medium one, three or more the small one. Labels always use the
//! medium face so page headings look consistent while values resize.

use embedded_graphics::{
    mono_font::{iso_8859_1, MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::{Drawable, Point},
    text::{Baseline, Text},
};

use crate::config::DISPLAY_WIDTH;
use crate::drivers::display::DisplayBuffer;

/// Text face selected by line count
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextSize {
    /// Small face for three or more lines
    Default,
    /// Medium face for two lines, and for page labels
    Big,
    /// Large face for a single line
    Huge,
}

impl TextSize {
    /// Face to pick for a value spanning `line_count` lines
    #[must_use]
    pub const fn for_line_count(line_count: usize) -> Self {
        match line_count {
            1 => Self::Huge,
            2 => Self::Big,
            _ => Self::Default,
        }
    }

    /// The monospace font for this size
    #[must_use]
    pub const fn font(self) -> &'static MonoFont<'static> {
        match self {
            Self::Default => &iso_8859_1::FONT_6X13,
            Self::Big => &iso_8859_1::FONT_9X18,
            Self::Huge => &iso_8859_1::FONT_10X20,
        }
    }

    /// Vertical distance between line tops in pixels
    #[must_use]
    pub const fn line_height(self) -> i32 {
        match self {
            Self::Default => 20,
            Self::Big => 23,
            Self::Huge => 25,
        }
    }

    /// Top margin above the first line in pixels
    #[must_use]
    pub const fn top_offset(self) -> i32 {
        match self {
            Self::Default => 3,
            Self::Big => 5,
            Self::Huge => 15,
        }
    }

    /// Glyph advance width in pixels
    #[must_use]
    pub const fn char_width(self) -> i32 {
        self.font().character_size.width as i32
    }
}

/// Left edge that centers `line` on the panel, clamped to the panel
#[must_use]
pub fn centered_x(line: &str, size: TextSize) -> i32 {
    let width = line.chars().count() as i32 * size.char_width();
    let x = (DISPLAY_WIDTH as i32 - width) / 2 + 2;
    x.max(0)
}

/// Render `text` centered on a cleared buffer at a fixed size
pub fn render(buffer: &mut DisplayBuffer, text: &str, size: TextSize) {
    let style = MonoTextStyle::new(size.font(), BinaryColor::On);

    buffer.clear_all();
    for (i, line) in text.lines().enumerate() {
        let origin = Point::new(
            centered_x(line, size),
            size.top_offset() + i as i32 * size.line_height(),
        );
        Text::with_baseline(line, origin, style, Baseline::Top)
            .draw(buffer)
            .ok();
    }
}

/// Render a page label (always the medium face)
pub fn render_label(buffer: &mut DisplayBuffer, text: &str) {
    render(buffer, text, TextSize::Big);
}

/// Render a page value, sizing the face by line count
pub fn render_value(buffer: &mut DisplayBuffer, text: &str) {
    let line_count = text.lines().count();
    render(buffer, text, TextSize::for_line_count(line_count));
}
