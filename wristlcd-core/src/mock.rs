//! Recording mocks for the panel link
//!
//! Every mock shares one [`Wire`] that records what reached the pins and
//! decides what the controller answers.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use wristlcd_hal::{DmaCompletion, EdgeInterrupt, InputPin, OutputPin, SpiBus, Watchdog};
use wristlcd_protocol::ControllerCommand;

use crate::bridge::InterruptBridge;
use crate::bus::BusTransport;
use crate::state::DisplayState;
use crate::traits::{Alert, PanelBoard, PanelIo};

/// Shared record of the simulated link
#[derive(Default)]
pub struct Wire {
    // Outputs
    pub cs_high: Cell<bool>,
    window: RefCell<Option<Vec<u8>>>,
    /// Bytes clocked out per chip-select window (empty windows dropped)
    pub windows: RefCell<Vec<Vec<u8>>>,
    reset_high: Cell<bool>,
    pub reset_pulses: Cell<u32>,
    /// Chip-select asserted at each rising reset edge
    pub cs_at_reset_edge: RefCell<Vec<bool>>,
    /// Windows that decoded as controller commands, in order
    pub commands: RefCell<Vec<ControllerCommand>>,

    // Controller behavior
    pub reset_done: Cell<bool>,
    pub reset_done_polls: Cell<u32>,
    /// Ready asserts from this scene-select attempt on
    pub ready_on_attempt: Cell<Option<u32>>,
    pub scene_selects: Cell<u32>,
    pub ready_polls: Cell<u32>,
    /// Byte the controller shifts back on every exchange
    pub miso: Cell<u8>,

    // DMA
    pub dma_lengths: RefCell<Vec<usize>>,
    pub dma_pending: Cell<bool>,
    pub dma_aborts: Cell<u32>,
    pub busy_polls: Cell<u32>,
    /// Bridge to sample when DMA starts
    pub observe: Cell<Option<&'static InterruptBridge>>,
    pub dma_states: RefCell<Vec<DisplayState>>,

    // Collaborators
    pub delays_ns: RefCell<Vec<u32>>,
    pub reloads: Cell<u32>,
    pub vibrations: Cell<u32>,
    pub ready_irq_enabled: Cell<bool>,
}

impl Wire {
    /// Number of delays of exactly `us` microseconds
    pub fn count_delays(&self, us: u32) -> usize {
        self.delays_ns
            .borrow()
            .iter()
            .filter(|&&ns| ns == us * 1000)
            .count()
    }

    /// Chip-select currently asserted
    pub fn selected(&self) -> bool {
        !self.cs_high.get()
    }

    fn open_window(&self) {
        let mut window = self.window.borrow_mut();
        if window.is_none() {
            *window = Some(Vec::new());
        }
    }

    fn close_window(&self) {
        let Some(bytes) = self.window.borrow_mut().take() else {
            return;
        };
        if let Ok(command) = ControllerCommand::decode(&bytes) {
            if matches!(command, ControllerCommand::SelectScene(_)) {
                self.scene_selects.set(self.scene_selects.get() + 1);
            }
            self.commands.borrow_mut().push(command);
        }
        if !bytes.is_empty() {
            self.windows.borrow_mut().push(bytes);
        }
    }
}

#[derive(Clone, Copy)]
enum OutputRole {
    ChipSelect,
    Reset,
}

pub struct MockOutput {
    wire: Rc<Wire>,
    role: OutputRole,
}

impl MockOutput {
    pub fn chip_select(wire: &Rc<Wire>) -> Self {
        Self {
            wire: Rc::clone(wire),
            role: OutputRole::ChipSelect,
        }
    }

    pub fn reset(wire: &Rc<Wire>) -> Self {
        Self {
            wire: Rc::clone(wire),
            role: OutputRole::Reset,
        }
    }
}

impl OutputPin for MockOutput {
    fn set_high(&mut self) {
        match self.role {
            OutputRole::ChipSelect => {
                self.wire.cs_high.set(true);
                self.wire.close_window();
            }
            OutputRole::Reset => {
                if !self.wire.reset_high.get() {
                    self.wire.reset_pulses.set(self.wire.reset_pulses.get() + 1);
                    self.wire
                        .cs_at_reset_edge
                        .borrow_mut()
                        .push(self.wire.selected());
                }
                self.wire.reset_high.set(true);
            }
        }
    }

    fn set_low(&mut self) {
        match self.role {
            OutputRole::ChipSelect => {
                self.wire.cs_high.set(false);
                self.wire.open_window();
            }
            OutputRole::Reset => self.wire.reset_high.set(false),
        }
    }

    fn is_set_high(&self) -> bool {
        match self.role {
            OutputRole::ChipSelect => self.wire.cs_high.get(),
            OutputRole::Reset => self.wire.reset_high.get(),
        }
    }
}

#[derive(Clone, Copy)]
enum InputRole {
    ResetDone,
    Ready,
}

pub struct MockInput {
    wire: Rc<Wire>,
    role: InputRole,
}

impl InputPin for MockInput {
    fn is_high(&self) -> bool {
        let wire = &self.wire;
        match self.role {
            InputRole::ResetDone => {
                wire.reset_done_polls.set(wire.reset_done_polls.get() + 1);
                wire.reset_done.get()
            }
            InputRole::Ready => {
                wire.ready_polls.set(wire.ready_polls.get() + 1);
                let asserted = wire
                    .ready_on_attempt
                    .get()
                    .is_some_and(|n| wire.scene_selects.get() >= n);
                // Active-low
                !asserted
            }
        }
    }
}

pub struct MockSpi {
    wire: Rc<Wire>,
}

impl MockSpi {
    pub fn new(wire: &Rc<Wire>) -> Self {
        Self {
            wire: Rc::clone(wire),
        }
    }
}

impl SpiBus for MockSpi {
    fn transfer_byte(&mut self, byte: u8) -> u8 {
        if let Some(window) = self.wire.window.borrow_mut().as_mut() {
            window.push(byte);
        }
        self.wire.miso.get()
    }

    fn start_dma(&mut self, data: &[u8]) {
        self.wire.dma_lengths.borrow_mut().push(data.len());
        if let Some(bridge) = self.wire.observe.get() {
            self.wire.dma_states.borrow_mut().push(bridge.state());
        }
        self.wire.dma_pending.set(true);
    }

    fn abort_dma(&mut self) {
        if self.wire.dma_pending.replace(false) {
            self.wire.dma_aborts.set(self.wire.dma_aborts.get() + 1);
        }
    }
}

/// Interrupt-side DMA status
pub struct MockDma {
    wire: Rc<Wire>,
}

impl MockDma {
    pub fn new(wire: &Rc<Wire>) -> Self {
        Self {
            wire: Rc::clone(wire),
        }
    }
}

impl DmaCompletion for MockDma {
    fn take_transfer_complete(&mut self) -> bool {
        self.wire.dma_pending.replace(false)
    }

    fn tx_empty(&self) -> bool {
        true
    }

    fn busy(&self) -> bool {
        let left = self.wire.busy_polls.get();
        if left > 0 {
            self.wire.busy_polls.set(left - 1);
        }
        left > 0
    }
}

pub struct MockEdge {
    wire: Rc<Wire>,
}

impl EdgeInterrupt for MockEdge {
    fn is_pending(&self) -> bool {
        false
    }

    fn clear_pending(&mut self) {}

    fn enable(&mut self) {
        self.wire.ready_irq_enabled.set(true);
    }
}

pub struct MockDelay {
    wire: Rc<Wire>,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.wire.delays_ns.borrow_mut().push(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.delay_ns(us * 1000);
    }
}

pub struct MockWatchdog {
    wire: Rc<Wire>,
}

impl Watchdog for MockWatchdog {
    fn reload(&mut self) {
        self.wire.reloads.set(self.wire.reloads.get() + 1);
    }
}

pub struct MockAlert {
    wire: Rc<Wire>,
}

impl Alert for MockAlert {
    fn vibrate(&mut self) {
        self.wire.vibrations.set(self.wire.vibrations.get() + 1);
    }
}

pub struct MockBoard;

impl PanelBoard for MockBoard {
    type Spi = MockSpi;
    type Output = MockOutput;
    type Input = MockInput;
    type ReadyIrq = MockEdge;
    type Delay = MockDelay;
    type Watchdog = MockWatchdog;
    type Alert = MockAlert;
}

/// Peripherals for one mock panel
pub fn mock_io(wire: &Rc<Wire>) -> PanelIo<MockBoard> {
    let input = |role| MockInput {
        wire: Rc::clone(wire),
        role,
    };

    PanelIo {
        bus: BusTransport::new(
            MockSpi::new(wire),
            MockOutput::chip_select(wire),
            MockOutput::reset(wire),
        ),
        reset_done: input(InputRole::ResetDone),
        ready: input(InputRole::Ready),
        ready_irq: MockEdge {
            wire: Rc::clone(wire),
        },
        delay: MockDelay {
            wire: Rc::clone(wire),
        },
        watchdog: MockWatchdog {
            wire: Rc::clone(wire),
        },
        alert: MockAlert {
            wire: Rc::clone(wire),
        },
    }
}
