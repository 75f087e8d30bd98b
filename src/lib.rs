//! Weather Station Firmware Library
//!
//! This library provides the core functionality for an STM32G474-based
//! environmental weather station. A rotary encoder, a BME680 environmental
//! sensor, an HM3301 particulate sensor, an Air530 GPS receiver, and two
//! SSD1306 OLED panels hang off the board; the firmware polls the sensors
//! and fans the readings out across the displays, with the encoder cycling
//! the shown value.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │  Station State  │  UI Rendering  │  Page Cycling             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     DECODE LAYER                             │
//! │  NMEA Sentences  │  PM Frames  │  Quadrature Edges           │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / DRIVER LAYER                         │
//! │  I2C  │  UART  │  EXTI  │  BME680  │  HM3301  │  SSD1306     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Owned state, no globals**: edge flags and page cursors live in small
//!   state objects handed to the task that mutates them
//! - **Pure decode, thin I/O**: frame and sentence decoding is plain data
//!   manipulation, testable on the host without hardware
//! - **Explicit error handling**: all fallible operations return `Result`;
//!   read failures degrade to placeholder display strings
//! - **No unsafe in application code**

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Safe abstractions over STM32G474 peripherals.
#[cfg(feature = "embedded")]
pub mod hal;

/// Peripheral Drivers
///
/// Drivers for the attached sensors and displays. The decode logic in each
/// driver is hardware-independent; the bus-facing device structs are gated
/// behind the `embedded` feature.
pub mod drivers;

/// NMEA 0183 Sentence Parsing
///
/// Byte-fed parser for the GGA, ZDA, and TXT sentences the Air530 emits.
pub mod nmea;

/// Station State
///
/// Page cycling, acquisition throttling, and reading-to-text formatting.
pub mod station;

/// User Interface
///
/// Text layout and rendering onto the OLED bitmaps.
pub mod ui;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    // Common traits
    pub use embedded_hal::digital::OutputPin;
    pub use embedded_hal_async::i2c::I2c;

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // Error handling
    pub use core::result::Result;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
