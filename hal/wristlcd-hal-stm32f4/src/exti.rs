//! External interrupt line for the ready edge
//!
//! embassy-stm32 is built without its `exti` feature, so the firmware owns
//! the EXTI vectors and this handle does the register work.

use embassy_stm32::interrupt::{Interrupt, InterruptExt, Priority};
use embassy_stm32::pac;

/// One EXTI line routed to a GPIO pin, falling edge
#[derive(Clone, Copy)]
pub struct ExtiLine {
    line: usize,
    irq: Interrupt,
}

impl ExtiLine {
    /// Handle for an already configured line
    pub const fn new(line: u8, irq: Interrupt) -> Self {
        Self {
            line: line as usize,
            irq,
        }
    }

    /// Route `port` pin `line` to the EXTI line and arm the falling edge
    ///
    /// The line stays masked until [`enable`](wristlcd_hal::EdgeInterrupt::enable).
    pub fn configure(port: u8, line: u8, irq: Interrupt, priority: Priority) -> Self {
        let n = line as usize;

        pac::RCC.apb2enr().modify(|w| w.set_syscfgen(true));
        pac::SYSCFG.exticr(n / 4).modify(|w| w.set_exti(n % 4, port));
        pac::EXTI.rtsr(0).modify(|w| w.set_line(n, false));
        pac::EXTI.ftsr(0).modify(|w| w.set_line(n, true));
        pac::EXTI.pr(0).write(|w| w.set_line(n, true));

        irq.set_priority(priority);
        Self::new(line, irq)
    }
}

impl wristlcd_hal::EdgeInterrupt for ExtiLine {
    fn is_pending(&self) -> bool {
        pac::EXTI.pr(0).read().line(self.line)
    }

    fn clear_pending(&mut self) {
        pac::EXTI.pr(0).write(|w| w.set_line(self.line, true));
    }

    fn enable(&mut self) {
        pac::EXTI.imr(0).modify(|w| w.set_line(self.line, true));
        self.irq.unpend();
        // SAFETY: the firmware defines the vector before calling this
        unsafe { self.irq.enable() };
    }
}
