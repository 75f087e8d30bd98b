//! I2C Bus Abstractions
//!
//! Async I2C communication for the sensors and displays sharing one bus.
//! Uses the embassy-stm32 async I2C driver with DMA. The bus is owned by
//! the main loop and lent to each driver per transaction.

use embassy_stm32::i2c::{Error as I2cError, I2c};
use embassy_stm32::mode::Async;

/// I2C operation result
pub type I2cResult<T> = Result<T, I2cError>;

/// I2C device address wrapper
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct I2cAddress(u8);

impl I2cAddress {
    /// BME680 environmental sensor address
    pub const BME680: Self = Self(0x76);

    /// HM3301 particulate sensor address
    pub const HM3301: Self = Self(0x40);

    /// Primary SSD1306 OLED address (page labels)
    pub const OLED_PRIMARY: Self = Self(0x3C);

    /// Secondary SSD1306 OLED address (page values)
    pub const OLED_SECONDARY: Self = Self(0x3D);

    /// Create from 7-bit address
    #[must_use]
    pub const fn new(addr: u8) -> Self {
        Self(addr & 0x7F)
    }

    /// Get the 7-bit address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self.0
    }
}

impl defmt::Format for I2cAddress {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "0x{:02X}", self.0);
    }
}

/// I2C bus wrapper for shared access
pub struct I2cBus<'d> {
    i2c: I2c<'d, Async>,
}

impl<'d> I2cBus<'d> {
    /// Create a new I2C bus wrapper
    #[must_use]
    pub fn new(i2c: I2c<'d, Async>) -> Self {
        Self { i2c }
    }

    /// Write bytes to a device
    pub async fn write(&mut self, addr: I2cAddress, data: &[u8]) -> I2cResult<()> {
        self.i2c.write(addr.addr(), data).await
    }

    /// Read bytes from a device
    pub async fn read(&mut self, addr: I2cAddress, buffer: &mut [u8]) -> I2cResult<()> {
        self.i2c.read(addr.addr(), buffer).await
    }

    /// Write then read (combined transaction)
    pub async fn write_read(
        &mut self,
        addr: I2cAddress,
        write: &[u8],
        read: &mut [u8],
    ) -> I2cResult<()> {
        self.i2c.write_read(addr.addr(), write, read).await
    }

    /// Write a single register
    pub async fn write_reg(&mut self, addr: I2cAddress, reg: u8, value: u8) -> I2cResult<()> {
        self.i2c.write(addr.addr(), &[reg, value]).await
    }

    /// Read a single register
    pub async fn read_reg(&mut self, addr: I2cAddress, reg: u8) -> I2cResult<u8> {
        let mut buf = [0u8];
        self.i2c.write_read(addr.addr(), &[reg], &mut buf).await?;
        Ok(buf[0])
    }

    /// Read multiple registers starting at base address
    pub async fn read_regs(
        &mut self,
        addr: I2cAddress,
        base_reg: u8,
        buffer: &mut [u8],
    ) -> I2cResult<()> {
        self.i2c.write_read(addr.addr(), &[base_reg], buffer).await
    }
}
