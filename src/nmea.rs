//! NMEA 0183 Sentence Parsing
//!
//! Byte-fed parser for the sentence types the Air530 GPS module emits.
//! Only GGA (position), ZDA (time), and TXT (antenna status) are decoded;
//! everything else is framed, checksum-verified, and reported as
//! `Sentence::Unsupported`. Malformed input and checksum failures are
//! silently discarded.

use heapless::{String, Vec};

use crate::types::{AntennaStatus, UtcDateTime};

/// Maximum sentence length including `$` and checksum, per NMEA 0183
pub const MAX_SENTENCE_LEN: usize = 82;

/// Maximum TXT message payload length
pub const MAX_TXT_LEN: usize = 64;

/// XOR checksum over a sentence body (the bytes between `$` and `*`)
#[must_use]
pub fn checksum(body: &[u8]) -> u8 {
    body.iter().fold(0, |acc, &b| acc ^ b)
}

/// UTC time-of-day as carried in GGA and ZDA sentences
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HmsTime {
    /// Hour 0-23
    pub hour: u8,
    /// Minute 0-59
    pub minute: u8,
    /// Second 0-59
    pub second: u8,
}

impl HmsTime {
    /// Parse from the `hhmmss.sss` field format
    #[must_use]
    pub fn parse(field: &str) -> Option<Self> {
        if field.len() < 6 || !field.is_ascii() {
            return None;
        }
        let hour: u8 = field[0..2].parse().ok()?;
        let minute: u8 = field[2..4].parse().ok()?;
        let second: u8 = field[4..6].parse().ok()?;
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        Some(Self {
            hour,
            minute,
            second,
        })
    }
}

/// Decoded GGA (fix data) sentence
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Gga {
    /// UTC time of the fix
    pub time: Option<HmsTime>,
    /// Latitude in decimal degrees, north positive
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees, east positive
    pub longitude: Option<f64>,
    /// Fix quality indicator (0 = no fix)
    pub quality: u8,
    /// Number of satellites in use
    pub satellites: u8,
    /// Horizontal dilution of precision
    pub hdop: Option<f32>,
    /// Antenna altitude above mean sea level in meters
    pub altitude_m: Option<f32>,
}

impl Gga {
    /// Whether this sentence carries a usable position
    #[must_use]
    pub fn has_fix(&self) -> bool {
        self.quality > 0 && self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Decoded ZDA (date and time) sentence
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Zda {
    /// UTC time of day
    pub time: Option<HmsTime>,
    /// Day of month 1-31 (0 when absent)
    pub day: u8,
    /// Month 1-12 (0 when absent)
    pub month: u8,
    /// Four-digit year (0 when absent)
    pub year: u16,
}

impl Zda {
    /// Combine into a calendar timestamp; `year` stays 0 without a date
    #[must_use]
    pub fn datetime(&self) -> UtcDateTime {
        let time = self.time.unwrap_or_default();
        UtcDateTime {
            year: self.year,
            month: self.month,
            day: self.day,
            hour: time.hour,
            minute: time.minute,
            second: time.second,
        }
    }
}

/// Decoded TXT (free-form text) sentence
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Txt {
    /// Message payload (truncated to [`MAX_TXT_LEN`])
    pub message: String<MAX_TXT_LEN>,
}

impl Txt {
    /// Antenna status if the message reports one
    #[must_use]
    pub fn antenna_status(&self) -> Option<AntennaStatus> {
        if self.message.contains("ANTENNA OK") {
            Some(AntennaStatus::Connected)
        } else if self.message.contains("ANTENNA OPEN") {
            Some(AntennaStatus::Open)
        } else {
            None
        }
    }
}

/// One checksum-verified NMEA sentence
#[derive(Clone, Debug, PartialEq)]
pub enum Sentence {
    /// Fix data
    Gga(Gga),
    /// Date and time
    Zda(Zda),
    /// Text message
    Txt(Txt),
    /// Verified but not a sentence type this firmware consumes
    Unsupported,
}

/// Byte-at-a-time NMEA sentence parser
pub struct NmeaParser {
    /// Sentence buffer, `$` through the checksum digits
    buffer: Vec<u8, MAX_SENTENCE_LEN>,
}

impl NmeaParser {
    /// Create a new parser
    #[must_use]
    pub const fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Feed a byte to the parser
    /// Returns a sentence when a complete, checksum-valid one is assembled
    pub fn feed(&mut self, byte: u8) -> Option<Sentence> {
        match byte {
            // Start of sentence resynchronizes unconditionally
            b'$' => {
                self.buffer.clear();
                let _ = self.buffer.push(byte);
                None
            }
            b'\r' | b'\n' => {
                let sentence = self.parse_buffer();
                self.buffer.clear();
                sentence
            }
            _ => {
                if self.buffer.push(byte).is_err() {
                    // Oversized garbage, drop and resync on the next '$'
                    self.buffer.clear();
                }
                None
            }
        }
    }

    /// Clear any partially assembled sentence
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Parse the current buffer as a complete sentence
    fn parse_buffer(&self) -> Option<Sentence> {
        let raw = core::str::from_utf8(&self.buffer).ok()?;
        let raw = raw.strip_prefix('$')?;

        // Split off and verify the checksum
        let (body, given) = raw.split_once('*')?;
        let given = u8::from_str_radix(given, 16).ok()?;
        if checksum(body.as_bytes()) != given {
            return None;
        }

        let mut fields = body.split(',');
        let id = fields.next()?;
        if id.len() < 5 || !id.is_ascii() {
            return None;
        }

        // Talker prefix varies (GP, GN, BD, ...); dispatch on the type suffix
        match &id[id.len() - 3..] {
            "GGA" => Self::parse_gga(fields),
            "ZDA" => Self::parse_zda(fields),
            "TXT" => Self::parse_txt(fields),
            _ => Some(Sentence::Unsupported),
        }
    }

    fn parse_gga<'a>(mut fields: impl Iterator<Item = &'a str>) -> Option<Sentence> {
        let time = HmsTime::parse(fields.next()?);
        let lat_field = fields.next()?;
        let lat_hemi = fields.next()?;
        let lon_field = fields.next()?;
        let lon_hemi = fields.next()?;
        let quality: u8 = fields.next()?.parse().unwrap_or(0);
        let satellites: u8 = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0);
        let hdop = fields.next().and_then(|f| f.parse().ok());
        let altitude_m = fields.next().and_then(|f| f.parse().ok());

        Some(Sentence::Gga(Gga {
            time,
            latitude: parse_coordinate(lat_field, lat_hemi, 2),
            longitude: parse_coordinate(lon_field, lon_hemi, 3),
            quality,
            satellites,
            hdop,
            altitude_m,
        }))
    }

    fn parse_zda<'a>(mut fields: impl Iterator<Item = &'a str>) -> Option<Sentence> {
        let time = HmsTime::parse(fields.next()?);
        let day: u8 = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0);
        let month: u8 = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0);
        let year: u16 = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0);

        Some(Sentence::Zda(Zda {
            time,
            day,
            month,
            year,
        }))
    }

    fn parse_txt<'a>(mut fields: impl Iterator<Item = &'a str>) -> Option<Sentence> {
        // Fields: total messages, message number, message id, then the text
        let _total = fields.next()?;
        let _num = fields.next()?;
        let _id = fields.next()?;
        let text = fields.next()?;

        let mut message = String::new();
        for c in text.chars().take(MAX_TXT_LEN) {
            let _ = message.push(c);
        }
        Some(Sentence::Txt(Txt { message }))
    }
}

impl Default for NmeaParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a `ddmm.mmmm` (or `dddmm.mmmm`) field plus hemisphere letter to
/// signed decimal degrees
#[must_use]
pub fn parse_coordinate(field: &str, hemisphere: &str, degree_digits: usize) -> Option<f64> {
    if field.len() < degree_digits + 2 || !field.is_ascii() {
        return None;
    }
    let degrees: f64 = field[..degree_digits].parse().ok()?;
    let minutes: f64 = field[degree_digits..].parse().ok()?;
    let value = degrees + minutes / 60.0;

    match hemisphere {
        "N" | "E" => Some(value),
        "S" | "W" => Some(-value),
        _ => None,
    }
}
