//! Weather Station Application State
//!
//! The polling-loop state machine: a page cursor driven by encoder events,
//! an acquisition throttle, and the formatting of sensor readings into the
//! strings the two panels show. Formatting never fails; a sensor that could
//! not be read shows a fixed placeholder instead.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::config::READ_INTERVAL_MS;
use crate::drivers::encoder::{Direction, EncoderEvent};
use crate::types::{DustReading, EnvReading, GpsData, Page};

/// Banner shown before the first acquisition completes
pub const BANNER: &str = "Weather\nStation";

/// Placeholder for a sensor that failed to read
pub const READ_ERROR: &str = "Read\nError";

/// Placeholder for GPS values without a fix
pub const NO_FIX: &str = "No Fix";

/// One formatted display value
pub type DisplayString = String<64>;

/// Ordinal page index with wrap-around in both directions
///
/// The count follows the number of formatted items, so the cursor is valid
/// at boot when only the banner exists.
#[derive(Clone, Copy, Debug)]
pub struct PageCursor {
    index: usize,
    count: usize,
}

impl PageCursor {
    /// Create a cursor over a single page
    #[must_use]
    pub const fn new() -> Self {
        Self { index: 0, count: 1 }
    }

    /// Current index
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Advance to the next page, wrapping past the end
    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.count;
    }

    /// Step to the previous page, wrapping past the start
    pub fn prev(&mut self) {
        self.index = self.index.checked_sub(1).unwrap_or(self.count - 1);
    }

    /// Change the page count, keeping the index in range
    pub fn set_count(&mut self, count: usize) {
        self.count = count.max(1);
        self.index %= self.count;
    }

    /// Jump back to the first page
    pub fn reset(&mut self) {
        self.index = 0;
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimum-interval gate for sensor acquisition
#[derive(Clone, Copy, Debug)]
pub struct ReadThrottle {
    interval_ms: u32,
    last_ms: Option<u32>,
}

impl ReadThrottle {
    /// Create a throttle with the given minimum interval
    #[must_use]
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// Whether an acquisition is due at `now_ms`; records it if so
    pub fn due(&mut self, now_ms: u32) -> bool {
        match self.last_ms {
            Some(last) if now_ms.wrapping_sub(last) < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }
}

/// Format GPS date/time and coordinates for the two GPS pages
///
/// Both strings degrade to `"No Fix"` until the receiver has a position and
/// a calendar date.
#[must_use]
pub fn format_gps(gps: &GpsData) -> (DisplayString, DisplayString) {
    let (Some(fix), Some(datetime)) = (gps.fix, gps.datetime) else {
        return (no_fix(), no_fix());
    };
    if !datetime.is_valid() {
        return (no_fix(), no_fix());
    }

    let mut date = DisplayString::new();
    write!(
        date,
        "{:02}-{}-{}\n{:02}:{:02}:{:02}",
        datetime.day,
        datetime.month_abbrev(),
        datetime.year,
        datetime.hour,
        datetime.minute,
        datetime.second
    )
    .ok();

    let mut location = DisplayString::new();
    write!(
        location,
        "Lat: {:.4}\nLon: {:.4}",
        fix.latitude, fix.longitude
    )
    .ok();

    (date, location)
}

fn no_fix() -> DisplayString {
    let mut s = DisplayString::new();
    s.push_str(NO_FIX).ok();
    s
}

fn read_error() -> DisplayString {
    let mut s = DisplayString::new();
    s.push_str(READ_ERROR).ok();
    s
}

/// Format temperature, humidity, and pressure for their pages
///
/// A failed read yields the placeholder for all three.
#[must_use]
pub fn format_env(reading: Option<&EnvReading>) -> [DisplayString; 3] {
    let Some(env) = reading else {
        return [read_error(), read_error(), read_error()];
    };

    let mut temperature = DisplayString::new();
    write!(temperature, "{:.1}\u{b0}C", env.temperature_c).ok();

    let mut humidity = DisplayString::new();
    write!(humidity, "{:.1} %", env.humidity_pct).ok();

    let mut pressure = DisplayString::new();
    write!(pressure, "{:.0} hPa", env.pressure_hpa).ok();

    [temperature, humidity, pressure]
}

/// Format the particulate concentrations for their page
#[must_use]
pub fn format_dust(reading: Option<&DustReading>) -> DisplayString {
    let Some(dust) = reading else {
        return read_error();
    };

    let mut s = DisplayString::new();
    write!(
        s,
        "PM1.0: {}ug/m3\nPM2.5: {}ug/m3\nPM10: {}ug/m3",
        dust.pm1_0_std, dust.pm2_5_std, dust.pm10_std
    )
    .ok();
    s
}

/// Top-level application state for the polling loop
pub struct Station {
    cursor: PageCursor,
    throttle: ReadThrottle,
    items: Vec<DisplayString, { Page::COUNT }>,
}

impl Station {
    /// Create the station in its boot state (banner page only)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cursor: PageCursor::new(),
            throttle: ReadThrottle::new(READ_INTERVAL_MS),
            items: Vec::new(),
        }
    }

    /// Apply one encoder event to the page cursor
    pub fn handle_event(&mut self, event: EncoderEvent) {
        match event {
            EncoderEvent::Rotate(Direction::Clockwise) => self.cursor.next(),
            EncoderEvent::Rotate(Direction::CounterClockwise) => self.cursor.prev(),
            // The push switch snaps back to the first page
            EncoderEvent::SwitchPress => self.cursor.reset(),
        }
    }

    /// Whether a sensor acquisition is due at `now_ms`
    pub fn acquire_due(&mut self, now_ms: u32) -> bool {
        self.throttle.due(now_ms)
    }

    /// Refresh the formatted page values from the latest readings
    pub fn update(
        &mut self,
        gps: &GpsData,
        env: Option<&EnvReading>,
        dust: Option<&DustReading>,
    ) {
        let (date, location) = format_gps(gps);
        let [temperature, humidity, pressure] = format_env(env);
        let particulates = format_dust(dust);

        self.items.clear();
        // Order matches the Page enum ordinals
        for item in [date, location, temperature, humidity, pressure, particulates] {
            self.items.push(item).ok();
        }
        self.cursor.set_count(self.items.len());
    }

    /// Label for the current page, shown on the primary panel
    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.items.is_empty() {
            BANNER
        } else {
            Page::from_index(self.cursor.index()).label()
        }
    }

    /// Value for the current page, shown on the secondary panel
    #[must_use]
    pub fn value(&self) -> &str {
        self.items
            .get(self.cursor.index())
            .map_or(BANNER, String::as_str)
    }

    /// Current page count (1 while only the banner exists)
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.items.len().max(1)
    }

    /// Currently selected page
    #[must_use]
    pub fn page(&self) -> Page {
        Page::from_index(self.cursor.index())
    }
}

impl Default for Station {
    fn default() -> Self {
        Self::new()
    }
}
