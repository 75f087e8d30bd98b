//! Shared types used across the weather station firmware
//!
//! This module defines domain-specific types for sensor readings and the
//! display page model. Values are only meaningful after a non-erroring read;
//! nothing here is persisted between polls.

#[cfg(feature = "embedded")]
use micromath::F32Ext;

/// One BME680 environmental reading
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvReading {
    /// Temperature in degrees Celsius
    pub temperature_c: f32,
    /// Relative humidity in percent
    pub humidity_pct: f32,
    /// Barometric pressure in hPa
    pub pressure_hpa: f32,
    /// Gas sensor resistance in ohms (0 when the heater was unstable)
    pub gas_ohms: u32,
}

impl EnvReading {
    /// Altitude in meters derived from pressure via the barometric formula
    #[must_use]
    pub fn altitude_m(&self, sea_level_hpa: f32) -> f32 {
        44_330.0 * (1.0 - (self.pressure_hpa / sea_level_hpa).powf(0.1903))
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for EnvReading {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{} mC, {} m%, {} Pa, {} ohm",
            (self.temperature_c * 1000.0) as i32,
            (self.humidity_pct * 1000.0) as i32,
            (self.pressure_hpa * 100.0) as i32,
            self.gas_ohms
        );
    }
}

/// One HM3301 particulate reading, all fields in ug/m3
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DustReading {
    /// PM1.0 standard particulate concentration
    pub pm1_0_std: u16,
    /// PM2.5 standard particulate concentration
    pub pm2_5_std: u16,
    /// PM10 standard particulate concentration
    pub pm10_std: u16,
    /// PM1.0 atmospheric environment concentration
    pub pm1_0_atm: u16,
    /// PM2.5 atmospheric environment concentration
    pub pm2_5_atm: u16,
    /// PM10 atmospheric environment concentration
    pub pm10_atm: u16,
}

#[cfg(feature = "embedded")]
impl defmt::Format for DustReading {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "PM1.0 {} PM2.5 {} PM10 {} ug/m3",
            self.pm1_0_std,
            self.pm2_5_std,
            self.pm10_std
        );
    }
}

/// GPS position fix
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GpsFix {
    /// Latitude in decimal degrees, north positive
    pub latitude: f64,
    /// Longitude in decimal degrees, east positive
    pub longitude: f64,
    /// Antenna altitude above mean sea level in meters
    pub altitude_m: f32,
}

/// UTC calendar date and time as reported by a ZDA sentence
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UtcDateTime {
    /// Four-digit year (0 when the receiver has no date yet)
    pub year: u16,
    /// Month 1-12
    pub month: u8,
    /// Day of month 1-31
    pub day: u8,
    /// Hour 0-23
    pub hour: u8,
    /// Minute 0-59
    pub minute: u8,
    /// Second 0-59
    pub second: u8,
}

impl UtcDateTime {
    /// Whether the receiver has produced a real date yet
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.year != 0
    }

    /// Three-letter English month abbreviation
    #[must_use]
    pub const fn month_abbrev(&self) -> &'static str {
        match self.month {
            1 => "Jan",
            2 => "Feb",
            3 => "Mar",
            4 => "Apr",
            5 => "May",
            6 => "Jun",
            7 => "Jul",
            8 => "Aug",
            9 => "Sep",
            10 => "Oct",
            11 => "Nov",
            12 => "Dec",
            _ => "???",
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for UtcDateTime {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}Z",
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second
        );
    }
}

/// GPS antenna status as reported by TXT sentences
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AntennaStatus {
    /// No TXT sentence seen yet
    #[default]
    Unknown,
    /// Antenna reported OK
    Connected,
    /// Antenna reported open (check the connection)
    Open,
}

#[cfg(feature = "embedded")]
impl defmt::Format for AntennaStatus {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Unknown => defmt::write!(f, "unknown"),
            Self::Connected => defmt::write!(f, "connected"),
            Self::Open => defmt::write!(f, "open"),
        }
    }
}

/// Aggregated GPS receiver snapshot
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GpsData {
    /// Position fix, if the receiver has one
    pub fix: Option<GpsFix>,
    /// UTC date and time, if a ZDA sentence has been seen
    pub datetime: Option<UtcDateTime>,
    /// Antenna status
    pub antenna: AntennaStatus,
}

impl GpsData {
    /// Create an empty snapshot (no fix, no date, antenna unknown)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fix: None,
            datetime: None,
            antenna: AntennaStatus::Unknown,
        }
    }

    /// Whether a position fix is available
    #[must_use]
    pub const fn has_fix(&self) -> bool {
        self.fix.is_some()
    }
}

/// Display page selected by the rotary encoder
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Page {
    /// UTC date and time from the GPS
    #[default]
    DateTime,
    /// GPS latitude and longitude
    Coordinates,
    /// Ambient temperature
    Temperature,
    /// Relative humidity
    Humidity,
    /// Barometric pressure
    Pressure,
    /// Particulate matter concentrations
    Particulates,
}

impl Page {
    /// Number of pages
    pub const COUNT: usize = 6;

    /// Page at a given ordinal index (wraps out-of-range to `DateTime`)
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        match index {
            1 => Self::Coordinates,
            2 => Self::Temperature,
            3 => Self::Humidity,
            4 => Self::Pressure,
            5 => Self::Particulates,
            _ => Self::DateTime,
        }
    }

    /// Ordinal index of this page
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::DateTime => 0,
            Self::Coordinates => 1,
            Self::Temperature => 2,
            Self::Humidity => 3,
            Self::Pressure => 4,
            Self::Particulates => 5,
        }
    }

    /// Label shown on the primary OLED for this page
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DateTime => "UTC\nDate & Time",
            Self::Coordinates => "GPS\nCoordinates",
            Self::Temperature => "Ambient\nTemperature",
            Self::Humidity => "Ambient\nHumidity",
            Self::Pressure => "Ambient\nAir Pressure",
            Self::Particulates => "Ambient\nPM Values",
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Page {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::DateTime => defmt::write!(f, "DateTime"),
            Self::Coordinates => defmt::write!(f, "Coordinates"),
            Self::Temperature => defmt::write!(f, "Temperature"),
            Self::Humidity => defmt::write!(f, "Humidity"),
            Self::Pressure => defmt::write!(f, "Pressure"),
            Self::Particulates => defmt::write!(f, "Particulates"),
        }
    }
}
