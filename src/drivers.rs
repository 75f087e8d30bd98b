//! Peripheral Drivers
//!
//! Drivers for the attached sensors and displays. Decode logic (frames,
//! sentences, quadrature edges) is hardware-independent and host-testable;
//! the structs that talk to a bus are gated behind the `embedded` feature.

pub mod bme680;
pub mod display;
pub mod encoder;
pub mod gps;
pub mod hm3301;
