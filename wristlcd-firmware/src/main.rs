//! wristlcd Firmware
//!
//! Display firmware for the snowy board (STM32F439). Brings up the FPGA
//! panel controller on SPI6 and serves frames from the render task.
//!
//! Executors:
//! - UART4 (unused on snowy) drives the high-priority executor that owns
//!   the panel: display task and DMA task
//! - Thread mode runs render, vibration and watchdog tasks

#![no_std]
#![no_main]

mod board;
mod channels;
mod tasks;

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_stm32::spi::Spi;
use embassy_stm32::wdg::IndependentWatchdog;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use wristlcd_core::bus::{BusTransport, ChipSelect};
use wristlcd_core::config::{DisplayConfig, PinConfig, PinMap};
use wristlcd_core::traits::PanelIo;
use wristlcd_hal::spi::SpiConfig;
use wristlcd_hal_stm32f4::spi::embassy_config;
use wristlcd_hal_stm32f4::{
    ExtiLine, FrameDma, IwdgReload, PanelInput, PanelOutput, RawOutput, Spi6Bus,
};
use wristlcd_protocol::FRAME_BUFFER_SIZE;

use crate::board::Snowy;
use crate::channels::{DISPLAY, DMA_JOBS};
use crate::tasks::QueuedVibration;

/// Panel controller image, staged by build.rs
static PANEL_IMAGE: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/panel.bin"));

/// Executor for the panel-owning tasks
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

/// Pins taken from `Peripherals` below
///
/// Embassy pins are distinct types, so they cannot follow the config at
/// run time. Keep this in step with the `p.PGx` fields used in `main`;
/// boot stops if the config disagrees.
const WIRED: PinMap = PinMap {
    chip_select: PinConfig::inverted('G', 8),
    reset: PinConfig::new('G', 15),
    reset_done: PinConfig::new('G', 9),
    ready: PinConfig::inverted('G', 10),
    sck: PinConfig::new('G', 13),
    miso: PinConfig::new('G', 12),
    mosi: PinConfig::new('G', 14),
};

/// EXTI line of the controller's ready output
const READY_EXTI_LINE: u8 = WIRED.ready.pin;

/// Watchdog timeout in microseconds
///
/// Covers one bring-up attempt at the full poll limit.
const WATCHDOG_TIMEOUT_US: u32 = 2_000_000;

#[interrupt]
unsafe fn UART4() {
    EXECUTOR_HIGH.on_interrupt()
}

#[interrupt]
fn EXTI15_10() {
    let mut line = ExtiLine::new(READY_EXTI_LINE, interrupt::EXTI15_10);
    DISPLAY.bridge.on_ready_edge(&mut line);
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("wristlcd firmware starting...");

    let p = embassy_stm32::init(Default::default());

    let config = DisplayConfig::snowy();
    if let Err(e) = config.validate(FRAME_BUFFER_SIZE) {
        defmt::panic!("Invalid display config: {}", e);
    }
    let pins = config.pins;
    if pins != WIRED {
        defmt::panic!("Pin map {} does not match the wired pins {}", pins, WIRED);
    }

    // Control lines; chip-select idles high (deselected)
    let cs = PanelOutput(Output::new(p.PG8, Level::High, Speed::VeryHigh));
    let reset = PanelOutput(Output::new(p.PG15, Level::Low, Speed::Low));
    let reset_done = PanelInput(Input::new(p.PG9, Pull::None));
    let ready = PanelInput(Input::new(p.PG10, Pull::Up));

    // Second handle on chip-select for the DMA completion path
    let Some(isr_cs) = RawOutput::new(pins.chip_select.port_index(), pins.chip_select.pin) else {
        defmt::panic!("Chip-select pin out of range");
    };

    let spi_config = SpiConfig::default();
    let spi = Spi::new_blocking(p.SPI6, p.PG13, p.PG14, p.PG12, embassy_config(&spi_config));
    info!("SPI6 initialized ({}, {} Hz)", spi_config.mode(), spi_config.frequency);

    let ready_irq = ExtiLine::configure(
        pins.ready.port_index(),
        READY_EXTI_LINE,
        interrupt::EXTI15_10,
        Priority::P5,
    );

    let io = PanelIo::<Snowy> {
        bus: BusTransport::new(Spi6Bus::new(spi, &DMA_JOBS), cs, reset),
        reset_done,
        ready,
        ready_irq,
        delay: Delay,
        watchdog: IwdgReload,
        alert: QueuedVibration,
    };

    let wdg = IndependentWatchdog::new(p.IWDG, WATCHDOG_TIMEOUT_US);
    let motor = Output::new(p.PF4, Level::Low, Speed::Low);

    // Panel tasks preempt everything in thread mode
    interrupt::UART4.set_priority(Priority::P6);
    let high = EXECUTOR_HIGH.start(interrupt::UART4);

    let dma = FrameDma::new(p.DMA2_CH5);
    high.spawn(tasks::dma_task(dma, ChipSelect::new(isr_cs))).unwrap();
    high.spawn(tasks::display_task(io, config, PANEL_IMAGE)).unwrap();

    spawner.spawn(tasks::watchdog_task(wdg)).unwrap();
    spawner.spawn(tasks::vibrate_task(motor)).unwrap();
    spawner.spawn(tasks::render_task(config.geometry)).unwrap();

    info!("All tasks spawned, firmware running");
}
