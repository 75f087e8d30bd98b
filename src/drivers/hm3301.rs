//! HM3301 Particulate Sensor Driver
//!
//! The Seeed HM3301 laser dust sensor streams a fixed 29-byte frame over
//! I2C. The last byte is the 8-bit truncated sum of the preceding 28; six
//! big-endian 16-bit fields at bytes 4-15 carry the standard and atmospheric
//! PM1.0/2.5/10 concentrations. A checksum mismatch is reported but the
//! frame is decoded anyway; the device does not retransmit.

use crate::types::DustReading;

#[cfg(feature = "embedded")]
use crate::config::HM3301_REFRESH_RATE_HZ;
#[cfg(feature = "embedded")]
use crate::hal::i2c::{I2cAddress, I2cBus};

/// Frame length in bytes, checksum included
pub const FRAME_LEN: usize = 29;

/// Chip ID carried in frame bytes 2-3
pub const CHIP_ID: u16 = 0x001C;

/// Command byte selecting I2C mode, written once at init
pub const CMD_SELECT_I2C: u8 = 0x88;

/// Verify the frame checksum: byte 28 must equal the truncated 8-bit sum
/// of bytes 0-27
#[must_use]
pub fn checksum_ok(frame: &[u8; FRAME_LEN]) -> bool {
    let sum: u32 = frame[..FRAME_LEN - 1].iter().map(|&b| u32::from(b)).sum();
    (sum & 0xFF) as u8 == frame[FRAME_LEN - 1]
}

/// Chip ID from frame bytes 2-3
#[must_use]
pub fn chip_id(frame: &[u8; FRAME_LEN]) -> u16 {
    u16::from_be_bytes([frame[2], frame[3]])
}

/// Decode the six concentration fields at byte offsets 4-15
///
/// Decodes unconditionally; pair with [`checksum_ok`] to learn whether the
/// frame arrived intact.
#[must_use]
pub fn decode(frame: &[u8; FRAME_LEN]) -> DustReading {
    let field = |offset: usize| u16::from_be_bytes([frame[offset], frame[offset + 1]]);

    DustReading {
        pm1_0_std: field(4),
        pm2_5_std: field(6),
        pm10_std: field(8),
        pm1_0_atm: field(10),
        pm2_5_atm: field(12),
        pm10_atm: field(14),
    }
}

/// HM3301 driver errors
#[cfg(feature = "embedded")]
#[derive(Debug)]
pub enum Hm3301Error {
    /// I2C transfer failed
    Bus(embassy_stm32::i2c::Error),
    /// Device answered with an unexpected chip ID
    BadChipId(u16),
}

#[cfg(feature = "embedded")]
impl From<embassy_stm32::i2c::Error> for Hm3301Error {
    fn from(err: embassy_stm32::i2c::Error) -> Self {
        Self::Bus(err)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Hm3301Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Bus(_) => defmt::write!(f, "I2C bus error"),
            Self::BadChipId(id) => defmt::write!(f, "bad chip id 0x{:04X}", id),
        }
    }
}

/// HM3301 particulate sensor over I2C
#[cfg(feature = "embedded")]
pub struct Hm3301 {
    cached: DustReading,
    last_read_ms: Option<u32>,
    min_refresh_ms: u32,
}

#[cfg(feature = "embedded")]
impl Hm3301 {
    /// Probe the sensor: switch it to I2C mode and verify the chip ID
    pub async fn init(bus: &mut I2cBus<'_>) -> Result<Self, Hm3301Error> {
        bus.write(I2cAddress::HM3301, &[CMD_SELECT_I2C]).await?;

        let mut frame = [0u8; FRAME_LEN];
        bus.read(I2cAddress::HM3301, &mut frame).await?;

        let id = chip_id(&frame);
        if id != CHIP_ID {
            return Err(Hm3301Error::BadChipId(id));
        }

        Ok(Self {
            cached: DustReading::default(),
            last_read_ms: None,
            min_refresh_ms: 1000 / HM3301_REFRESH_RATE_HZ,
        })
    }

    /// Read the current concentrations
    ///
    /// Reads faster than the refresh rate return the previous frame. A
    /// checksum mismatch is logged and the frame is used regardless.
    pub async fn read(
        &mut self,
        bus: &mut I2cBus<'_>,
        now_ms: u32,
    ) -> Result<DustReading, Hm3301Error> {
        if let Some(last) = self.last_read_ms {
            if now_ms.wrapping_sub(last) < self.min_refresh_ms {
                return Ok(self.cached);
            }
        }

        let mut frame = [0u8; FRAME_LEN];
        bus.read(I2cAddress::HM3301, &mut frame).await?;

        if !checksum_ok(&frame) {
            defmt::warn!("HM3301 checksum mismatch, using frame anyway");
        }

        self.cached = decode(&frame);
        self.last_read_ms = Some(now_ms);
        Ok(self.cached)
    }
}
