//! Hardware Abstraction Layer
//!
//! Safe abstractions over the STM32 peripherals the weather station uses.
//! This module isolates hardware-specific code and provides async
//! interfaces for the bus operations.

pub mod gpio;
pub mod i2c;
