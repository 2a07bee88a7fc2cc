//! Interrupt controller access for the RADIO interrupt line

#[cfg(feature = "nrf52840")]
pub(crate) fn enable_radio_irq() {
    use nrf52840_hal::pac::{Interrupt, NVIC};

    NVIC::unpend(Interrupt::RADIO);
    // Safety: the RADIO handler accesses only data guarded by the engine's mutex
    unsafe { NVIC::unmask(Interrupt::RADIO) };
}

#[cfg(all(feature = "mocked_platform", not(feature = "nrf52840")))]
static RADIO_IRQ_ENABLED: core::sync::atomic::AtomicBool =
    core::sync::atomic::AtomicBool::new(false);

#[cfg(all(feature = "mocked_platform", not(feature = "nrf52840")))]
pub(crate) fn enable_radio_irq() {
    RADIO_IRQ_ENABLED.store(true, core::sync::atomic::Ordering::SeqCst);
}

/// Check if the RADIO interrupt line was unmasked
///
/// Available only on the mocked platform, where there is no interrupt controller.
#[cfg(all(feature = "mocked_platform", not(feature = "nrf52840")))]
pub fn radio_irq_enabled() -> bool {
    RADIO_IRQ_ENABLED.load(core::sync::atomic::Ordering::SeqCst)
}
