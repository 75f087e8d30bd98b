//! BME680 Environmental Sensor Driver
//!
//! Temperature, humidity, pressure, and gas resistance over I2C using
//! forced-mode one-shot measurements. Raw ADC words are corrected with the
//! per-device calibration coefficients using the datasheet floating-point
//! compensation formulas.
//!
//! The gas sensor needs a heated plate; the heater set point is recomputed
//! from ambient temperature when it drifts more than 2 degrees, since
//! reprogramming it every cycle causes thermal oscillation in the readings.

#[cfg(feature = "embedded")]
use micromath::F32Ext;

use crate::types::EnvReading;

#[cfg(feature = "embedded")]
use crate::config::{BME680_HEATER_DURATION_MS, BME680_HEATER_TEMP_C};
#[cfg(feature = "embedded")]
use crate::hal::i2c::{I2cAddress, I2cBus};
#[cfg(feature = "embedded")]
use embassy_time::Timer;

/// BME680 register addresses
mod reg {
    pub const MEAS_STATUS_0: u8 = 0x1D;
    pub const RES_HEAT_0: u8 = 0x5A;
    pub const GAS_WAIT_0: u8 = 0x64;
    pub const CTRL_GAS_1: u8 = 0x71;
    pub const CTRL_HUM: u8 = 0x72;
    pub const CTRL_MEAS: u8 = 0x74;
    pub const CONFIG: u8 = 0x75;
    pub const COEFF_BLOCK_1: u8 = 0x89;
    pub const CHIP_ID: u8 = 0xD0;
    pub const RESET: u8 = 0xE0;
    pub const COEFF_BLOCK_2: u8 = 0xE1;
    pub const RES_HEAT_VAL: u8 = 0x00;
    pub const RES_HEAT_RANGE: u8 = 0x02;
    pub const RANGE_SW_ERR: u8 = 0x04;
}

/// Fixed chip ID reported by every BME680
pub const CHIP_ID: u8 = 0x61;

/// Soft-reset command word
const RESET_CMD: u8 = 0xB6;

/// Length of the first calibration coefficient block (0x89..)
pub const COEFF_BLOCK_1_LEN: usize = 25;

/// Length of the second calibration coefficient block (0xE1..)
pub const COEFF_BLOCK_2_LEN: usize = 16;

/// Measurement oversampling setting
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Oversampling {
    /// Measurement skipped, output fixed at 0x8000
    Skipped,
    /// 1x oversampling
    X1,
    /// 2x oversampling
    #[default]
    X2,
    /// 4x oversampling
    X4,
    /// 8x oversampling
    X8,
    /// 16x oversampling
    X16,
}

impl Oversampling {
    /// Three-bit register encoding
    #[must_use]
    pub const fn as_bits(self) -> u8 {
        match self {
            Self::Skipped => 0b000,
            Self::X1 => 0b001,
            Self::X2 => 0b010,
            Self::X4 => 0b011,
            Self::X8 => 0b100,
            Self::X16 => 0b101,
        }
    }
}

/// Encode a heater dwell time in milliseconds into the `gas_wait_0` format:
/// a 6-bit base with a 2-bit x1/x4/x16/x64 multiplier
#[must_use]
pub fn encode_gas_wait(duration_ms: u16) -> u8 {
    let mut value = duration_ms.min(0xFC0);
    let mut factor: u8 = 0;

    while value > 0x3F {
        value /= 4;
        factor += 1;
    }

    (factor << 6) | (value as u8)
}

/// Per-device calibration coefficients
///
/// Read once at init from the two coefficient blocks plus three scattered
/// heater registers. Field names follow the datasheet (`par_t1` etc.).
#[derive(Clone, Copy, Debug, Default)]
#[allow(missing_docs)]
pub struct Calibration {
    pub par_t1: u16,
    pub par_t2: i16,
    pub par_t3: i8,
    pub par_p1: u16,
    pub par_p2: i16,
    pub par_p3: i8,
    pub par_p4: i16,
    pub par_p5: i16,
    pub par_p6: i8,
    pub par_p7: i8,
    pub par_p8: i16,
    pub par_p9: i16,
    pub par_p10: u8,
    pub par_h1: u16,
    pub par_h2: u16,
    pub par_h3: i8,
    pub par_h4: i8,
    pub par_h5: i8,
    pub par_h6: u8,
    pub par_h7: i8,
    pub par_gh1: i8,
    pub par_gh2: i16,
    pub par_gh3: i8,
    pub res_heat_range: u8,
    pub res_heat_val: i8,
    pub range_sw_err: i8,
}

impl Calibration {
    /// Decode the coefficient blocks and heater registers
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn from_registers(
        coeff1: &[u8; COEFF_BLOCK_1_LEN],
        coeff2: &[u8; COEFF_BLOCK_2_LEN],
        heat_range: u8,
        heat_val: u8,
        sw_err: u8,
    ) -> Self {
        let le16 = |lsb: u8, msb: u8| u16::from_le_bytes([lsb, msb]);

        Self {
            par_t1: le16(coeff2[8], coeff2[9]),
            par_t2: le16(coeff1[1], coeff1[2]) as i16,
            par_t3: coeff1[3] as i8,
            par_p1: le16(coeff1[5], coeff1[6]),
            par_p2: le16(coeff1[7], coeff1[8]) as i16,
            par_p3: coeff1[9] as i8,
            par_p4: le16(coeff1[11], coeff1[12]) as i16,
            par_p5: le16(coeff1[13], coeff1[14]) as i16,
            par_p6: coeff1[16] as i8,
            par_p7: coeff1[15] as i8,
            par_p8: le16(coeff1[19], coeff1[20]) as i16,
            par_p9: le16(coeff1[21], coeff1[22]) as i16,
            par_p10: coeff1[23],
            // H1 and H2 are 12-bit values sharing the nibble at 0xE2
            par_h1: (u16::from(coeff2[2]) << 4) | u16::from(coeff2[1] & 0x0F),
            par_h2: (u16::from(coeff2[0]) << 4) | u16::from(coeff2[1] >> 4),
            par_h3: coeff2[3] as i8,
            par_h4: coeff2[4] as i8,
            par_h5: coeff2[5] as i8,
            par_h6: coeff2[6],
            par_h7: coeff2[7] as i8,
            par_gh2: le16(coeff2[10], coeff2[11]) as i16,
            par_gh1: coeff2[12] as i8,
            par_gh3: coeff2[13] as i8,
            res_heat_range: (heat_range >> 4) & 0x03,
            res_heat_val: heat_val as i8,
            range_sw_err: range_sw_err(sw_err),
        }
    }

    /// Temperature in degrees Celsius plus the `t_fine` carry used by the
    /// pressure and humidity formulas
    #[must_use]
    pub fn compensate_temperature(&self, adc: u32) -> (f32, f32) {
        let adc = adc as f32;
        let par_t1 = f32::from(self.par_t1);

        let var1 = (adc / 16384.0 - par_t1 / 1024.0) * f32::from(self.par_t2);
        let partial = adc / 131_072.0 - par_t1 / 8192.0;
        let var2 = partial * partial * f32::from(self.par_t3) * 16.0;

        let t_fine = var1 + var2;
        (t_fine / 5120.0, t_fine)
    }

    /// Pressure in Pascal
    #[must_use]
    pub fn compensate_pressure(&self, adc: u32, t_fine: f32) -> f32 {
        let mut var1 = t_fine / 2.0 - 64000.0;
        let mut var2 = var1 * var1 * (f32::from(self.par_p6) / 131_072.0);
        var2 += var1 * f32::from(self.par_p5) * 2.0;
        var2 = var2 / 4.0 + f32::from(self.par_p4) * 65536.0;
        var1 = (f32::from(self.par_p3) * var1 * var1 / 16384.0
            + f32::from(self.par_p2) * var1)
            / 524_288.0;
        var1 = (1.0 + var1 / 32768.0) * f32::from(self.par_p1);

        if var1 == 0.0 {
            return 0.0;
        }

        let mut pressure = 1_048_576.0 - adc as f32;
        pressure = (pressure - var2 / 4096.0) * 6250.0 / var1;
        let var1 = f32::from(self.par_p9) * pressure * pressure / 2_147_483_648.0;
        let var2 = pressure * (f32::from(self.par_p8) / 32768.0);
        let partial = pressure / 256.0;
        let var3 = partial * partial * partial * (f32::from(self.par_p10) / 131_072.0);

        pressure + (var1 + var2 + var3 + f32::from(self.par_p7) * 128.0) / 16.0
    }

    /// Relative humidity in percent, clamped to 0..100
    #[must_use]
    pub fn compensate_humidity(&self, adc: u16, temp_c: f32) -> f32 {
        let adc = f32::from(adc);

        let var1 = adc
            - (f32::from(self.par_h1) * 16.0 + (f32::from(self.par_h3) / 2.0) * temp_c);
        let var2 = var1
            * (f32::from(self.par_h2) / 262_144.0
                * (1.0
                    + (f32::from(self.par_h4) / 16384.0) * temp_c
                    + (f32::from(self.par_h5) / 1_048_576.0) * temp_c * temp_c));
        let var3 = f32::from(self.par_h6) / 16384.0;
        let var4 = f32::from(self.par_h7) / 2_097_152.0;

        let humidity = var2 + (var3 + var4 * temp_c) * var2 * var2;
        humidity.clamp(0.0, 100.0)
    }

    /// Gas sensor resistance in ohms for a raw ADC word and range index
    #[must_use]
    pub fn gas_resistance(&self, adc: u16, range: u8) -> f32 {
        // Range-dependent correction tables from the datasheet
        const K1: [f32; 16] = [
            0.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, -0.8, 0.0, 0.0, -0.2, -0.5, 0.0, -1.0, 0.0,
            0.0,
        ];
        const K2: [f32; 16] = [
            0.0, 0.0, 0.0, 0.0, 0.1, 0.7, 0.0, -0.8, -0.1, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        ];

        let range = usize::from(range & 0x0F);
        let var1 = 1340.0 + 5.0 * f32::from(self.range_sw_err);
        let var2 = var1 * (1.0 + K1[range] / 100.0);
        let var3 = 1.0 + K2[range] / 100.0;

        1.0 / (var3
            * 0.000_000_125
            * f32::from(1u16 << range)
            * ((f32::from(adc) - 512.0) / var2 + 1.0))
    }

    /// Heater resistance register value for a target plate temperature
    #[must_use]
    pub fn res_heat(&self, target_c: u16, ambient_c: f32) -> u8 {
        // Targets beyond 400C are out of the device's range
        let target = f32::from(target_c.min(400));

        let var1 = f32::from(self.par_gh1) / 16.0 + 49.0;
        let var2 = f32::from(self.par_gh2) / 32768.0 * 0.0005 + 0.00235;
        let var3 = f32::from(self.par_gh3) / 1024.0;
        let var4 = var1 * (1.0 + var2 * target);
        let var5 = var4 + var3 * ambient_c;

        let res_heat = 3.4
            * (var5 * (4.0 / (4.0 + f32::from(self.res_heat_range)))
                * (1.0 / (1.0 + f32::from(self.res_heat_val) * 0.002))
                - 25.0);

        res_heat.clamp(0.0, 255.0) as u8
    }
}

/// Sign-extend the 4-bit range switching error from register 0x04
#[allow(clippy::cast_possible_wrap)]
const fn range_sw_err(byte: u8) -> i8 {
    (byte & 0xF0) as i8 >> 4
}

/// Raw ADC words from one measurement field
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawField {
    /// 20-bit pressure word
    pub pressure: u32,
    /// 20-bit temperature word
    pub temperature: u32,
    /// 16-bit humidity word
    pub humidity: u16,
    /// 10-bit gas resistance word
    pub gas: u16,
    /// Gas ADC range index
    pub gas_range: u8,
    /// Heater reached its set point for this conversion
    pub heater_stable: bool,
}

/// Length of the measurement field block starting at 0x1D
pub const FIELD_LEN: usize = 15;

/// Decode the field block read from `MEAS_STATUS_0`
#[must_use]
pub fn decode_field(data: &[u8; FIELD_LEN]) -> RawField {
    let word20 = |msb: u8, lsb: u8, xlsb: u8| {
        (u32::from(msb) << 12) | (u32::from(lsb) << 4) | (u32::from(xlsb) >> 4)
    };

    RawField {
        pressure: word20(data[2], data[3], data[4]),
        temperature: word20(data[5], data[6], data[7]),
        humidity: u16::from_be_bytes([data[8], data[9]]),
        gas: (u16::from(data[13]) << 2) | (u16::from(data[14]) >> 6),
        gas_range: data[14] & 0x0F,
        heater_stable: data[14] & 0x10 != 0,
    }
}

/// Whether the field block carries fresh data
#[must_use]
pub const fn field_ready(status: u8) -> bool {
    status & 0x80 != 0
}

/// BME680 driver errors
#[cfg(feature = "embedded")]
#[derive(Debug)]
pub enum Bme680Error {
    /// I2C transfer failed
    Bus(embassy_stm32::i2c::Error),
    /// Device answered with an unexpected chip ID
    BadChipId(u8),
    /// Measurement never signalled completion
    Timeout,
}

#[cfg(feature = "embedded")]
impl From<embassy_stm32::i2c::Error> for Bme680Error {
    fn from(err: embassy_stm32::i2c::Error) -> Self {
        Self::Bus(err)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Bme680Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Bus(_) => defmt::write!(f, "I2C bus error"),
            Self::BadChipId(id) => defmt::write!(f, "bad chip id 0x{:02X}", id),
            Self::Timeout => defmt::write!(f, "measurement timeout"),
        }
    }
}

/// BME680 environmental sensor over I2C, forced mode
#[cfg(feature = "embedded")]
pub struct Bme680 {
    calib: Calibration,
    temp_osr: Oversampling,
    hum_osr: Oversampling,
    pres_osr: Oversampling,
    /// Ambient temperature the current heater set point was computed for
    ambient_c: f32,
}

#[cfg(feature = "embedded")]
impl Bme680 {
    /// Polling attempts before a measurement counts as timed out
    const MEAS_POLL_ATTEMPTS: u32 = 50;

    /// Reset the sensor, load calibration, and program the gas heater
    pub async fn init(bus: &mut I2cBus<'_>) -> Result<Self, Bme680Error> {
        let id = bus.read_reg(I2cAddress::BME680, reg::CHIP_ID).await?;
        if id != CHIP_ID {
            return Err(Bme680Error::BadChipId(id));
        }

        bus.write_reg(I2cAddress::BME680, reg::RESET, RESET_CMD)
            .await?;
        Timer::after_millis(10).await;

        let mut coeff1 = [0u8; COEFF_BLOCK_1_LEN];
        let mut coeff2 = [0u8; COEFF_BLOCK_2_LEN];
        bus.read_regs(I2cAddress::BME680, reg::COEFF_BLOCK_1, &mut coeff1)
            .await?;
        bus.read_regs(I2cAddress::BME680, reg::COEFF_BLOCK_2, &mut coeff2)
            .await?;

        let heat_range = bus
            .read_reg(I2cAddress::BME680, reg::RES_HEAT_RANGE)
            .await?;
        let heat_val = bus.read_reg(I2cAddress::BME680, reg::RES_HEAT_VAL).await?;
        let sw_err = bus.read_reg(I2cAddress::BME680, reg::RANGE_SW_ERR).await?;

        let calib = Calibration::from_registers(&coeff1, &coeff2, heat_range, heat_val, sw_err);

        let mut sensor = Self {
            calib,
            temp_osr: Oversampling::X8,
            hum_osr: Oversampling::X2,
            pres_osr: Oversampling::X4,
            ambient_c: 25.0,
        };

        // IIR filter coefficient 3 for the temperature/pressure path
        bus.write_reg(I2cAddress::BME680, reg::CONFIG, 0b010 << 2)
            .await?;

        sensor.program_heater(bus).await?;
        Ok(sensor)
    }

    /// Program heater set point and dwell time for profile 0
    async fn program_heater(&mut self, bus: &mut I2cBus<'_>) -> Result<(), Bme680Error> {
        let res_heat = self.calib.res_heat(BME680_HEATER_TEMP_C, self.ambient_c);
        bus.write_reg(I2cAddress::BME680, reg::RES_HEAT_0, res_heat)
            .await?;
        bus.write_reg(
            I2cAddress::BME680,
            reg::GAS_WAIT_0,
            encode_gas_wait(BME680_HEATER_DURATION_MS),
        )
        .await?;
        Ok(())
    }

    /// Run one forced-mode measurement and return the compensated reading
    pub async fn read(&mut self, bus: &mut I2cBus<'_>) -> Result<EnvReading, Bme680Error> {
        // Humidity oversampling, gas profile 0 with run_gas, then the
        // temperature/pressure oversampling write also kicks off the cycle
        bus.write_reg(I2cAddress::BME680, reg::CTRL_HUM, self.hum_osr.as_bits())
            .await?;
        bus.write_reg(I2cAddress::BME680, reg::CTRL_GAS_1, 0x10)
            .await?;

        let ctrl_meas =
            (self.temp_osr.as_bits() << 5) | (self.pres_osr.as_bits() << 2) | 0b01;
        bus.write_reg(I2cAddress::BME680, reg::CTRL_MEAS, ctrl_meas)
            .await?;

        let mut field = [0u8; FIELD_LEN];
        let mut attempts = 0;
        loop {
            Timer::after_millis(10).await;
            bus.read_regs(I2cAddress::BME680, reg::MEAS_STATUS_0, &mut field)
                .await?;
            if field_ready(field[0]) {
                break;
            }
            attempts += 1;
            if attempts >= Self::MEAS_POLL_ATTEMPTS {
                return Err(Bme680Error::Timeout);
            }
        }

        let raw = decode_field(&field);
        let (temperature_c, t_fine) = self.calib.compensate_temperature(raw.temperature);
        let pressure_hpa = self.calib.compensate_pressure(raw.pressure, t_fine) / 100.0;
        let humidity_pct = self.calib.compensate_humidity(raw.humidity, temperature_c);
        let gas_ohms = if raw.heater_stable {
            self.calib.gas_resistance(raw.gas, raw.gas_range) as u32
        } else {
            0
        };

        // Re-derive the heater set point only on real ambient drift
        if (temperature_c - self.ambient_c).abs() >= 2.0 {
            self.ambient_c = temperature_c;
            self.program_heater(bus).await?;
        }

        Ok(EnvReading {
            temperature_c,
            humidity_pct,
            pressure_hpa,
            gas_ohms,
        })
    }
}
