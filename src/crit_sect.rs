//! Scoped masking of the interrupts sharing data with the radio engine.
//!
//! The only interrupt touching engine data is RADIO, but the mask currently covers all IRQs.

// TODO: Mask only the RADIO line in NVIC instead of relying on cortex_m blocking all IRQs

/// Proof that the radio IRQ cannot preempt the current context
pub struct CriticalSection<'a> {
    _internal_cs: &'a cortex_m::interrupt::CriticalSection,
}

impl<'a> CriticalSection<'a> {
    fn new(internal_cs: &'a cortex_m::interrupt::CriticalSection) -> Self {
        Self {
            _internal_cs: internal_cs,
        }
    }
}

/// Runs `f` with interrupts masked
///
/// The mask is lifted when `f` returns, on every exit path of `f`.
pub fn locked<F, R>(f: F) -> R
where
    F: FnOnce(&CriticalSection) -> R,
{
    cortex_m::interrupt::free(|cs| f(&CriticalSection::new(cs)))
}
