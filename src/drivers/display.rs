//! SSD1306 OLED Display Driver
//!
//! 128x64 monochrome OLED over I2C. Rendering happens into an in-memory
//! [`DisplayBuffer`] that implements the `embedded-graphics` `DrawTarget`
//! trait; [`Oled::flush`] then pushes the whole buffer to the panel in one
//! horizontal-addressing sweep. Two panels share the bus at different
//! addresses, so the driver is handed the bus per call rather than owning it.

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::{Dimensions, DrawTarget, OriginDimensions, Pixel, Size},
};

use crate::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

#[cfg(feature = "embedded")]
use crate::hal::i2c::{I2cAddress, I2cBus};

/// Framebuffer size in bytes (one bit per pixel, page-major)
pub const BUFFER_LEN: usize = (DISPLAY_WIDTH * DISPLAY_HEIGHT / 8) as usize;

/// In-memory framebuffer in the SSD1306 page layout
///
/// Byte `page * 128 + x` holds the column of eight pixels at
/// `(x, page*8)..(x, page*8+8)`, least significant bit on top.
pub struct DisplayBuffer {
    data: [u8; BUFFER_LEN],
}

impl DisplayBuffer {
    /// Create a cleared framebuffer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            data: [0; BUFFER_LEN],
        }
    }

    /// Clear every pixel
    pub fn clear_all(&mut self) {
        self.data = [0; BUFFER_LEN];
    }

    /// Set or clear a single pixel; out-of-range coordinates are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return;
        }
        let index = (y / 8 * DISPLAY_WIDTH + x) as usize;
        let mask = 1 << (y % 8);
        if on {
            self.data[index] |= mask;
        } else {
            self.data[index] &= !mask;
        }
    }

    /// Whether the pixel at (x, y) is lit; out-of-range reads as unlit
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return false;
        }
        let index = (y / 8 * DISPLAY_WIDTH + x) as usize;
        self.data[index] & (1 << (y % 8)) != 0
    }

    /// Raw page-major bytes, as sent to the panel
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; BUFFER_LEN] {
        &self.data
    }

    /// Count of lit pixels, for tests and diagnostics
    #[must_use]
    pub fn lit_pixels(&self) -> u32 {
        self.data.iter().map(|b| u32::from(b.count_ones())).sum::<u32>()
    }
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for DisplayBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

impl DrawTarget for DisplayBuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if bounds.contains(point) {
                #[allow(clippy::cast_sign_loss)]
                self.set_pixel(point.x as u32, point.y as u32, color.is_on());
            }
        }
        Ok(())
    }
}

/// SSD1306 command bytes
#[cfg(feature = "embedded")]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_MULTIPLEX: u8 = 0xA8;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_START_LINE: u8 = 0x40;
    pub const CHARGE_PUMP: u8 = 0x8D;
    pub const SET_ADDR_MODE: u8 = 0x20;
    pub const SEG_REMAP: u8 = 0xA1;
    pub const COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_VCOM_DESELECT: u8 = 0xDB;
    pub const RESUME_FROM_RAM: u8 = 0xA4;
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    pub const SET_COLUMN_RANGE: u8 = 0x21;
    pub const SET_PAGE_RANGE: u8 = 0x22;
}

/// Control byte prefixes for the I2C protocol
#[cfg(feature = "embedded")]
const CONTROL_COMMAND: u8 = 0x00;
#[cfg(feature = "embedded")]
const CONTROL_DATA: u8 = 0x40;

/// Framebuffer data bytes per I2C transfer
#[cfg(feature = "embedded")]
const FLUSH_CHUNK: usize = 32;

/// One SSD1306 panel at a fixed I2C address
#[cfg(feature = "embedded")]
pub struct Oled {
    address: I2cAddress,
    /// Framebuffer drawn into between flushes
    pub buffer: DisplayBuffer,
}

#[cfg(feature = "embedded")]
impl Oled {
    /// Initialize the panel and leave it on with a cleared screen
    pub async fn init(
        bus: &mut I2cBus<'_>,
        address: I2cAddress,
    ) -> Result<Self, embassy_stm32::i2c::Error> {
        let mut display = Self {
            address,
            buffer: DisplayBuffer::new(),
        };

        let init_sequence: &[u8] = &[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80,
            cmd::SET_MULTIPLEX,
            0x3F,
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::CHARGE_PUMP,
            0x14,
            cmd::SET_ADDR_MODE,
            0x00,
            cmd::SEG_REMAP,
            cmd::COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            0x12,
            cmd::SET_CONTRAST,
            0xCF,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DESELECT,
            0x40,
            cmd::RESUME_FROM_RAM,
            cmd::NORMAL_DISPLAY,
            cmd::DISPLAY_ON,
        ];
        for &byte in init_sequence {
            display.command(bus, byte).await?;
        }

        display.flush(bus).await?;
        Ok(display)
    }

    /// Send one command byte
    async fn command(
        &mut self,
        bus: &mut I2cBus<'_>,
        byte: u8,
    ) -> Result<(), embassy_stm32::i2c::Error> {
        bus.write(self.address, &[CONTROL_COMMAND, byte]).await
    }

    /// Set panel contrast (0x00 dimmest, 0xFF brightest)
    pub async fn set_contrast(
        &mut self,
        bus: &mut I2cBus<'_>,
        level: u8,
    ) -> Result<(), embassy_stm32::i2c::Error> {
        self.command(bus, cmd::SET_CONTRAST).await?;
        self.command(bus, level).await
    }

    /// Push the framebuffer to the panel
    pub async fn flush(
        &mut self,
        bus: &mut I2cBus<'_>,
    ) -> Result<(), embassy_stm32::i2c::Error> {
        // Reset the addressing window to the full panel
        for &byte in &[
            cmd::SET_COLUMN_RANGE,
            0,
            (DISPLAY_WIDTH - 1) as u8,
            cmd::SET_PAGE_RANGE,
            0,
            (DISPLAY_HEIGHT / 8 - 1) as u8,
        ] {
            self.command(bus, byte).await?;
        }

        let mut transfer = [CONTROL_DATA; FLUSH_CHUNK + 1];
        for chunk in self.buffer.as_bytes().chunks(FLUSH_CHUNK) {
            transfer[1..=chunk.len()].copy_from_slice(chunk);
            bus.write(self.address, &transfer[..=chunk.len()]).await?;
        }
        Ok(())
    }
}
