//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the weather station
//! hardware. All pin mappings, bus addresses, timing windows, and refresh
//! rates are centralized here; there are no CLI flags or config files.

/// I2C bus frequency shared by sensors and displays
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// BME680 environmental sensor I2C address
pub const BME680_I2C_ADDR: u8 = 0x76;

/// HM3301 particulate sensor I2C address
pub const HM3301_I2C_ADDR: u8 = 0x40;

/// Primary SSD1306 OLED I2C address (page labels)
pub const OLED_PRIMARY_I2C_ADDR: u8 = 0x3C;

/// Secondary SSD1306 OLED I2C address (sensor values)
pub const OLED_SECONDARY_I2C_ADDR: u8 = 0x3D;

/// Display width in pixels
pub const DISPLAY_WIDTH: u32 = 128;

/// Display height in pixels
pub const DISPLAY_HEIGHT: u32 = 64;

/// GPS UART baud rate (Air530 default)
pub const GPS_BAUD_RATE: u32 = 9600;

/// Encoder CLK/DT bounce-time window in milliseconds
pub const ENCODER_BOUNCE_MS: u32 = 100;

/// Encoder switch bounce-time window in milliseconds
pub const SWITCH_BOUNCE_MS: u32 = 200;

/// Minimum interval between sensor acquisitions in milliseconds
pub const READ_INTERVAL_MS: u32 = 50;

/// Maximum HM3301 readings per second; faster reads return the cached frame
pub const HM3301_REFRESH_RATE_HZ: u32 = 10;

/// Sea-level reference pressure in hPa for altitude conversion
pub const SEA_LEVEL_PRESSURE_HPA: f32 = 1013.25;

/// BME680 heater set point in degrees Celsius
pub const BME680_HEATER_TEMP_C: u16 = 320;

/// BME680 heater dwell time in milliseconds
pub const BME680_HEATER_DURATION_MS: u16 = 150;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the board wiring

    /// Status LED (directly on MCU)
    pub const LED_STATUS: &str = "PA5";

    /// I2C1 SCL (BME680, HM3301, both OLEDs)
    pub const I2C1_SCL: &str = "PB8";

    /// I2C1 SDA (BME680, HM3301, both OLEDs)
    pub const I2C1_SDA: &str = "PB9";

    /// Encoder CLK input
    pub const ENCODER_CLK: &str = "PA0";

    /// Encoder DT input
    pub const ENCODER_DT: &str = "PA1";

    /// Encoder push switch
    pub const ENCODER_SW: &str = "PA4";

    /// GPS UART TX (to Air530 RX)
    pub const GPS_TX: &str = "PA2";

    /// GPS UART RX (from Air530 TX)
    pub const GPS_RX: &str = "PA3";
}
