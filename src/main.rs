//! Weather Station Main Application
//!
//! Entry point for the STM32G474-based weather station firmware.
//! Initializes hardware, spawns the input tasks, and runs the poll/render
//! loop that keeps the two OLED panels current.

#![no_std]
#![no_main]

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_futures::select::{select3, Either3};
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Level, Output, Pull, Speed};
use embassy_stm32::i2c::I2c;
use embassy_stm32::mode::Async;
use embassy_stm32::time::Hertz;
use embassy_stm32::usart::{self, UartRx};
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use {defmt_rtt as _, panic_probe as _};

use weather_firmware::drivers::bme680::Bme680;
use weather_firmware::drivers::display::Oled;
use weather_firmware::drivers::encoder::{Debounce, EdgeTracker, EncoderEvent};
use weather_firmware::drivers::gps::GpsReceiver;
use weather_firmware::drivers::hm3301::Hm3301;
use weather_firmware::hal::gpio::StatusLed;
use weather_firmware::hal::i2c::{I2cAddress, I2cBus};
use weather_firmware::prelude::*;
use weather_firmware::station::Station;
use weather_firmware::ui;

// Bind interrupt handlers
bind_interrupts!(struct Irqs {
    I2C1_EV => embassy_stm32::i2c::EventInterruptHandler<peripherals::I2C1>;
    I2C1_ER => embassy_stm32::i2c::ErrorInterruptHandler<peripherals::I2C1>;
    USART2 => usart::InterruptHandler<peripherals::USART2>;
});

/// Encoder events from the input task to the main loop
static ENCODER_EVENTS: Channel<CriticalSectionRawMutex, EncoderEvent, 8> = Channel::new();

/// Latest GPS snapshot, written by the GPS task
static GPS_DATA: Mutex<CriticalSectionRawMutex, GpsData> = Mutex::new(GpsData::new());

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Weather Station Firmware v{}", env!("CARGO_PKG_VERSION"));

    let config = embassy_stm32::Config::default();
    let p = embassy_stm32::init(config);

    info!("Peripherals initialized");

    let led = StatusLed::new(Output::new(p.PA5, Level::Low, Speed::Low));

    // All four I2C devices share I2C1 (PB8 = SCL, PB9 = SDA)
    let i2c = I2c::new(
        p.I2C1,
        p.PB8,
        p.PB9,
        Irqs,
        p.DMA1_CH1,
        p.DMA1_CH2,
        Hertz(I2C_FREQUENCY_HZ),
        Default::default(),
    );
    let mut bus = I2cBus::new(i2c);

    info!("I2C1 initialized at {} Hz", I2C_FREQUENCY_HZ);

    // GPS receive-only UART (PA3 = RX)
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = GPS_BAUD_RATE;
    let gps_rx = match UartRx::new(p.USART2, Irqs, p.PA3, p.DMA1_CH3, uart_config) {
        Ok(rx) => rx,
        Err(e) => {
            defmt::panic!("USART2 config rejected: {}", defmt::Debug2Format(&e));
        }
    };

    // Encoder inputs, falling-edge interrupts with internal pull-ups
    let clk = ExtiInput::new(p.PA0, p.EXTI0, Pull::Up);
    let dt = ExtiInput::new(p.PA1, p.EXTI1, Pull::Up);
    let sw = ExtiInput::new(p.PA4, p.EXTI4, Pull::Up);

    spawner.spawn(heartbeat_task(led)).unwrap();
    spawner.spawn(encoder_task(clk, dt, sw)).unwrap();
    spawner.spawn(gps_task(gps_rx)).unwrap();

    // Panels: primary shows the page label, secondary the value
    let mut primary = match Oled::init(&mut bus, I2cAddress::OLED_PRIMARY).await {
        Ok(display) => display,
        Err(_) => defmt::panic!("primary OLED init failed"),
    };
    let mut secondary = match Oled::init(&mut bus, I2cAddress::OLED_SECONDARY).await {
        Ok(display) => display,
        Err(_) => defmt::panic!("secondary OLED init failed"),
    };

    let mut bme680 = match Bme680::init(&mut bus).await {
        Ok(sensor) => Some(sensor),
        Err(e) => {
            warn!("BME680 init failed: {}", e);
            None
        }
    };
    let mut hm3301 = match Hm3301::init(&mut bus).await {
        Ok(sensor) => Some(sensor),
        Err(e) => {
            warn!("HM3301 init failed: {}", e);
            None
        }
    };

    let mut station = Station::new();
    let mut dirty = true;

    info!("Tasks spawned, entering poll loop");

    loop {
        while let Ok(event) = ENCODER_EVENTS.try_receive() {
            info!("encoder event: {}", event);
            station.handle_event(event);
            dirty = true;
        }

        let now_ms = Instant::now().as_millis() as u32;
        if station.acquire_due(now_ms) {
            let gps = *GPS_DATA.lock().await;

            let env = match &mut bme680 {
                Some(sensor) => match sensor.read(&mut bus).await {
                    Ok(reading) => Some(reading),
                    Err(e) => {
                        warn!("BME680 read failed: {}", e);
                        None
                    }
                },
                None => None,
            };

            let dust = match &mut hm3301 {
                Some(sensor) => match sensor.read(&mut bus, now_ms).await {
                    Ok(reading) => Some(reading),
                    Err(e) => {
                        warn!("HM3301 read failed: {}", e);
                        None
                    }
                },
                None => None,
            };

            station.update(&gps, env.as_ref(), dust.as_ref());
            dirty = true;
        }

        if dirty {
            ui::render_label(&mut primary.buffer, station.label());
            ui::render_value(&mut secondary.buffer, station.value());

            if let Err(_e) = primary.flush(&mut bus).await {
                warn!("primary OLED flush failed");
            }
            if let Err(_e) = secondary.flush(&mut bus).await {
                warn!("secondary OLED flush failed");
            }
            dirty = false;
        }

        Timer::after(Duration::from_millis(20)).await;
    }
}

/// Heartbeat task, blinks the status LED to show the system is running
#[embassy_executor::task]
async fn heartbeat_task(mut led: StatusLed<'static>) {
    loop {
        led.on();
        Timer::after(Duration::from_millis(100)).await;
        led.off();
        Timer::after(Duration::from_millis(900)).await;
    }
}

/// Encoder input task
///
/// Awaits falling edges on all three encoder lines, debounces each line
/// independently, and resolves rotation through the edge tracker. Resolved
/// events go to the main loop over the channel; a full channel drops the
/// event rather than stalling input handling.
#[embassy_executor::task]
async fn encoder_task(
    mut clk: ExtiInput<'static>,
    mut dt: ExtiInput<'static>,
    mut sw: ExtiInput<'static>,
) {
    let mut tracker = EdgeTracker::new();
    let mut clk_bounce = Debounce::new(ENCODER_BOUNCE_MS);
    let mut dt_bounce = Debounce::new(ENCODER_BOUNCE_MS);
    let mut sw_bounce = Debounce::new(SWITCH_BOUNCE_MS);

    loop {
        let edge = select3(
            clk.wait_for_falling_edge(),
            dt.wait_for_falling_edge(),
            sw.wait_for_falling_edge(),
        )
        .await;

        let now_ms = Instant::now().as_millis() as u32;
        let event = match edge {
            Either3::First(()) => clk_bounce
                .accept(now_ms)
                .then(|| tracker.clk_edge())
                .flatten()
                .map(EncoderEvent::Rotate),
            Either3::Second(()) => dt_bounce
                .accept(now_ms)
                .then(|| tracker.dt_edge())
                .flatten()
                .map(EncoderEvent::Rotate),
            Either3::Third(()) => sw_bounce
                .accept(now_ms)
                .then_some(EncoderEvent::SwitchPress),
        };

        if let Some(event) = event {
            if ENCODER_EVENTS.try_send(event).is_err() {
                warn!("encoder event dropped");
            }
        }
    }
}

/// GPS receive task
///
/// Reads UART chunks bounded by line idle, feeds them through the NMEA
/// parser, and publishes the folded snapshot whenever it changes.
#[embassy_executor::task]
async fn gps_task(mut rx: UartRx<'static, Async>) {
    let mut receiver = GpsReceiver::new();
    let mut buf = [0u8; 128];
    let mut last_antenna = AntennaStatus::Unknown;

    loop {
        match rx.read_until_idle(&mut buf).await {
            Ok(len) => {
                let mut changed = false;
                for &byte in &buf[..len] {
                    changed |= receiver.feed(byte);
                }
                if changed {
                    let snapshot = *receiver.data();
                    if snapshot.antenna != last_antenna {
                        info!("GPS antenna: {}", snapshot.antenna);
                        last_antenna = snapshot.antenna;
                    }
                    *GPS_DATA.lock().await = snapshot;
                }
            }
            Err(e) => {
                warn!("GPS UART error: {}", defmt::Debug2Format(&e));
            }
        }
    }
}
