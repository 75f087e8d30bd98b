//! Air530 GPS Receiver
//!
//! Accumulates the module's NMEA output into a [`GpsData`] snapshot. The
//! module streams sentences continuously at 9600 baud; this layer is pure
//! state folding over the parsed stream, so the UART plumbing lives with
//! the task that owns the peripheral.

use crate::nmea::{NmeaParser, Sentence};
use crate::types::{GpsData, GpsFix};

/// Latest-known GPS state folded from the sentence stream
pub struct GpsReceiver {
    parser: NmeaParser,
    data: GpsData,
}

impl GpsReceiver {
    /// Create a receiver with no fix, no date, and unknown antenna state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            parser: NmeaParser::new(),
            data: GpsData::new(),
        }
    }

    /// Feed one byte of UART data
    /// Returns true when the byte completed a sentence that changed state
    pub fn feed(&mut self, byte: u8) -> bool {
        match self.parser.feed(byte) {
            Some(sentence) => self.apply(&sentence),
            None => false,
        }
    }

    /// Fold one decoded sentence into the snapshot
    /// Returns true if any field changed
    pub fn apply(&mut self, sentence: &Sentence) -> bool {
        match sentence {
            Sentence::Gga(gga) => {
                // A fixless GGA invalidates a previously held position
                let fix = if gga.has_fix() {
                    Some(GpsFix {
                        latitude: gga.latitude.unwrap_or_default(),
                        longitude: gga.longitude.unwrap_or_default(),
                        altitude_m: gga.altitude_m.unwrap_or_default(),
                    })
                } else {
                    None
                };
                let changed = self.data.fix != fix;
                self.data.fix = fix;
                changed
            }
            Sentence::Zda(zda) => {
                let datetime = zda.datetime();
                let changed = self.data.datetime != Some(datetime);
                self.data.datetime = Some(datetime);
                changed
            }
            Sentence::Txt(txt) => match txt.antenna_status() {
                Some(status) if status != self.data.antenna => {
                    self.data.antenna = status;
                    true
                }
                _ => false,
            },
            Sentence::Unsupported => false,
        }
    }

    /// Current snapshot
    #[must_use]
    pub const fn data(&self) -> &GpsData {
        &self.data
    }
}

impl Default for GpsReceiver {
    fn default() -> Self {
        Self::new()
    }
}
