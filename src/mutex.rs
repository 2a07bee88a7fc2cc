//! Mutex guarding data shared between the RADIO interrupt handler and thread mode.
//!
//! Access requires the [`CriticalSection`] token handed out by [`locked`](crate::crit_sect::locked),
//! so the data can never be touched while the radio IRQ is able to preempt.

use crate::crit_sect::CriticalSection;
use core::cell::{Ref, RefCell, RefMut};

/// Wraps a variable which is accessible from the radio IRQ
pub struct Mutex<T>(RefCell<T>);

impl<T> Mutex<T> {
    /// Creates new wrapper for a variable accessible from the radio IRQ
    ///
    /// # Example
    ///
    /// ```
    /// use nrf_ble_radio::mutex::Mutex;
    ///
    /// static END_EVENTS: Mutex<u32> = Mutex::new(0);
    /// ```
    pub const fn new(value: T) -> Mutex<T> {
        Self(RefCell::new(value))
    }

    /// Borrows the wrapped variable for reading
    ///
    /// # Example
    ///
    /// ```no_run
    /// # #[macro_use] extern crate nrf_ble_radio;
    /// # missing_test_fns!();
    /// # fn main() {
    /// use nrf_ble_radio::crit_sect;
    /// use nrf_ble_radio::mutex::Mutex;
    ///
    /// static LAST_CHANNEL: Mutex<u8> = Mutex::new(37);
    ///
    /// crit_sect::locked(|cs_token| {
    ///   assert_eq!(*LAST_CHANNEL.borrow(cs_token), 37);
    /// });
    /// # }
    /// ```
    pub fn borrow<'cs>(&'cs self, _cs: &'cs CriticalSection) -> Ref<'cs, T> {
        self.0.borrow()
    }

    /// Borrows the wrapped variable for writing
    ///
    /// # Example
    ///
    /// ```no_run
    /// # #[macro_use] extern crate nrf_ble_radio;
    /// # missing_test_fns!();
    /// # fn main() {
    /// use nrf_ble_radio::crit_sect;
    /// use nrf_ble_radio::mutex::Mutex;
    ///
    /// static END_EVENTS: Mutex<u32> = Mutex::new(0);
    ///
    /// crit_sect::locked(|cs_token| {
    ///   *END_EVENTS.borrow_mut(cs_token) += 1;
    /// });
    /// # }
    /// ```
    pub fn borrow_mut<'cs>(&'cs self, _cs: &'cs CriticalSection) -> RefMut<'cs, T> {
        self.0.borrow_mut()
    }
}

// Safety: Mutex is Sync assuming the contained type is Send and the CriticalSection token prevents
// concurrent access from thread mode and the radio IRQ. The RefCell verifies it at run time.
unsafe impl<T> Sync for Mutex<T> where T: Send {}
