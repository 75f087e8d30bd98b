//! Rotary Encoder Input
//!
//! Direction resolution for a quadrature encoder whose CLK and DT outputs
//! arrive as independent falling-edge interrupts. Whichever channel fires
//! second resolves the rotation: if DT's edge is already pending when CLK
//! fires, the knob turned clockwise; if CLK's edge is pending when DT fires,
//! counter-clockwise. There is no de-glitching beyond a fixed bounce-time
//! window per input; a spurious or missed edge simply produces a missed or
//! wrong rotation event.

/// Encoder rotation direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Clockwise rotation (next page)
    Clockwise,
    /// Counter-clockwise rotation (previous page)
    CounterClockwise,
}

#[cfg(feature = "embedded")]
impl defmt::Format for Direction {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Clockwise => defmt::write!(f, "CW"),
            Self::CounterClockwise => defmt::write!(f, "CCW"),
        }
    }
}

/// Encoder event delivered to the polling loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncoderEvent {
    /// Encoder rotated one detent
    Rotate(Direction),
    /// Push switch pressed
    SwitchPress,
}

#[cfg(feature = "embedded")]
impl defmt::Format for EncoderEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Rotate(direction) => defmt::write!(f, "Rotate({})", direction),
            Self::SwitchPress => defmt::write!(f, "SwitchPress"),
        }
    }
}

/// Two-bit edge tracker resolving rotation direction
///
/// Owns the per-channel edge flags; both reset to false whenever a rotation
/// resolves. A lone edge on either channel stays pending until the other
/// channel fires.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeTracker {
    clk: bool,
    dt: bool,
}

impl EdgeTracker {
    /// Create a tracker with no pending edges
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clk: false,
            dt: false,
        }
    }

    /// Record a falling edge on CLK, resolving if DT is already pending
    pub fn clk_edge(&mut self) -> Option<Direction> {
        self.clk = true;
        if self.dt {
            self.reset();
            Some(Direction::Clockwise)
        } else {
            None
        }
    }

    /// Record a falling edge on DT, resolving if CLK is already pending
    pub fn dt_edge(&mut self) -> Option<Direction> {
        self.dt = true;
        if self.clk {
            self.reset();
            Some(Direction::CounterClockwise)
        } else {
            None
        }
    }

    /// Whether either channel has an unresolved edge
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.clk || self.dt
    }

    /// Clear both edge flags
    pub fn reset(&mut self) {
        self.clk = false;
        self.dt = false;
    }
}

/// Fixed bounce-time window filter for one input
///
/// Edges inside the window after the last accepted edge are discarded.
#[derive(Clone, Copy, Debug)]
pub struct Debounce {
    window_ms: u32,
    last_ms: Option<u32>,
}

impl Debounce {
    /// Create a filter with the given window in milliseconds
    #[must_use]
    pub const fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            last_ms: None,
        }
    }

    /// Report an edge at `now_ms`; returns true if it should be acted on
    pub fn accept(&mut self, now_ms: u32) -> bool {
        match self.last_ms {
            Some(last) if now_ms.wrapping_sub(last) < self.window_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }
}
