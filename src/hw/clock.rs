//! High frequency clock control based on the CLOCK peripheral available in nRF MCUs
//!
//! The RADIO requires the crystal oscillator (HFXO). The internal RC oscillator running after reset
//! is not accurate enough for Bluetooth Low Energy.

use crate::error::Error;
use crate::utils::poll::poll_until;
use core::ops::Deref;

// Same pattern as RadioPeriphWrapper in src/radio.rs
use nrf52840_hal::pac::clock;
type ClockRegisterBlock = clock::RegisterBlock;

struct ClockPeriphWrapper {
    ptr: *const ClockRegisterBlock,
}
impl ClockPeriphWrapper {
    pub fn new(clock: &ClockRegisterBlock) -> Self {
        ClockPeriphWrapper { ptr: clock }
    }
}
impl Deref for ClockPeriphWrapper {
    type Target = ClockRegisterBlock;
    fn deref(&self) -> &Self::Target {
        unsafe { &*self.ptr }
    }
}
unsafe impl Send for ClockPeriphWrapper {} // Single CLOCK instance, accessed only under a critical
                                           // section or before the radio IRQ is enabled

/// Crystal oscillator control
pub struct HfClock {
    clock: ClockPeriphWrapper,
}

impl HfClock {
    /// Create a new [`HfClock`] using passed hardware CLOCK instance
    ///
    /// # Example
    ///
    /// ```no_run
    /// # #[macro_use] extern crate nrf_ble_radio;
    /// # missing_test_fns!();
    /// # fn main() {
    /// use nrf_ble_radio::hw::clock::HfClock;
    /// use nrf52840_hal::pac::Peripherals;
    ///
    /// let peripherals = Peripherals::take().unwrap();
    ///
    /// let hfclk = HfClock::new(&peripherals.CLOCK);
    /// # }
    /// ```
    pub fn new(clock: &ClockRegisterBlock) -> Self {
        Self {
            clock: ClockPeriphWrapper::new(clock),
        }
    }

    /// Check if the crystal oscillator is running
    pub fn is_running(&self) -> bool {
        if self
            .clock
            .events_hfclkstarted
            .read()
            .events_hfclkstarted()
            .bit_is_set()
        {
            return true;
        }

        let stat = self.clock.hfclkstat.read();
        stat.state().is_running() && stat.src().is_xtal()
    }

    /// Start the crystal oscillator and wait until it is stable
    ///
    /// Returns [`Err(Error::ClockTimeout)`](Error::ClockTimeout) if the oscillator did not report
    /// start within `retries` polls. The start request stays active in such case.
    pub fn start_blocking(&self, retries: u32) -> Result<(), Error> {
        self.start_polling(retries, || ())
    }

    // `on_poll` runs before every check of the started event
    fn start_polling<F: FnMut()>(&self, retries: u32, mut on_poll: F) -> Result<(), Error> {
        if self.is_running() {
            return Ok(());
        }

        log_info!("High frequency clock is not running. Starting...");

        self.clock
            .events_hfclkstarted
            .write(|w| w.events_hfclkstarted().clear_bit());
        self.clock
            .tasks_hfclkstart
            .write(|w| w.tasks_hfclkstart().set_bit());

        let started = poll_until(retries, || {
            on_poll();
            self.clock
                .events_hfclkstarted
                .read()
                .events_hfclkstarted()
                .bit_is_set()
        });

        if started {
            log_info!("High frequency clock started");
            Ok(())
        } else {
            log_warn!("High frequency clock did not start");
            Err(Error::ClockTimeout)
        }
    }
}
