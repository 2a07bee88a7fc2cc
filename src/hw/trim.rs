//! Factory calibration of the RADIO analog front end
//!
//! Some chips are shipped with override values for the RADIO trim registers which must be applied
//! before the RADIO is used in Bluetooth Low Energy 1 Mbit mode. The values are provided by a
//! [`TrimStore`], so that chips without such values (like nRF52840) can skip this step.

use nrf52840_hal::pac::radio;

#[cfg(test)]
use mockall::*;

/// Number of trim override words
pub const OVERRIDE_WORDS: usize = 5;

/// Offset of the first OVERRIDE register within RADIO register block
pub(crate) const OVERRIDE_OFFSET: usize = 0x724;

/// Bit in the last OVERRIDE word enabling the override
pub(crate) const OVERRIDE_ENABLE: u32 = 0x8000_0000;

/// Read-only source of factory trim values
#[cfg_attr(test, automock)]
pub trait TrimStore {
    /// Override words for Bluetooth Low Energy 1 Mbit mode, if the factory provided them
    fn ble_1mbit_overrides(&self) -> Option<[u32; OVERRIDE_WORDS]>;
}

/// Trim store of chips that need no RADIO overrides
pub struct NoFactoryTrim;

impl TrimStore for NoFactoryTrim {
    fn ble_1mbit_overrides(&self) -> Option<[u32; OVERRIDE_WORDS]> {
        None
    }
}

/// Trim store holding values copied out of the factory information by the application
pub struct StaticTrim(pub [u32; OVERRIDE_WORDS]);

impl TrimStore for StaticTrim {
    fn ble_1mbit_overrides(&self) -> Option<[u32; OVERRIDE_WORDS]> {
        Some(self.0)
    }
}

/// Writes `words` verbatim to the RADIO OVERRIDE registers and enables the override
///
/// The OVERRIDE registers are not described by the PAC, so they are written by offset.
pub(crate) fn apply_overrides(radio: &radio::RegisterBlock, words: &[u32; OVERRIDE_WORDS]) {
    let base = radio as *const radio::RegisterBlock as *mut u8;

    for (i, word) in words.iter().enumerate() {
        let value = if i == OVERRIDE_WORDS - 1 {
            word | OVERRIDE_ENABLE
        } else {
            *word
        };

        // Safety: OVERRIDE registers are within the RADIO register block and are word aligned
        unsafe {
            let reg = base.add(OVERRIDE_OFFSET + i * 4) as *mut u32;
            core::ptr::write_volatile(reg, value);
        }
    }
}
