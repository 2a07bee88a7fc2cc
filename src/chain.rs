//! Requests to start an operation in the opposite direction as soon as the current one ends

/// Operation to be armed automatically when the requested one completes
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "nrf52840", derive(defmt::Format))]
pub enum ChainFlags {
    /// Return to idle after the operation
    None,
    /// Enable the receiver when the operation ends
    ReceiveNext,
    /// Transmit the outbound buffer when the operation ends
    TransmitNext,
}

/// Chain requests waiting to be consumed by the RADIO IRQ handler
///
/// Requests accumulate: at most one request per direction is remembered, a repeated request is
/// merged with the pending one.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub(crate) struct PendingChain {
    rx_next: bool,
    tx_next: bool,
}

impl PendingChain {
    pub(crate) fn add(&mut self, flags: ChainFlags) {
        match flags {
            ChainFlags::None => (),
            ChainFlags::ReceiveNext => self.rx_next = true,
            ChainFlags::TransmitNext => self.tx_next = true,
        }
    }

    pub(crate) fn rx_next(&self) -> bool {
        self.rx_next
    }

    pub(crate) fn tx_next(&self) -> bool {
        self.tx_next
    }

    /// Consumes the receive request, returns if it was pending
    pub(crate) fn take_rx_next(&mut self) -> bool {
        core::mem::replace(&mut self.rx_next, false)
    }

    /// Consumes the transmit request, returns if it was pending
    pub(crate) fn take_tx_next(&mut self) -> bool {
        core::mem::replace(&mut self.tx_next, false)
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_accumulate() {
        let mut pending = PendingChain::default();
        pending.add(ChainFlags::ReceiveNext);
        pending.add(ChainFlags::None);
        pending.add(ChainFlags::TransmitNext);
        pending.add(ChainFlags::TransmitNext);

        assert!(pending.rx_next());
        assert!(pending.tx_next());
    }

    #[test]
    fn test_take_consumes_only_one_direction() {
        let mut pending = PendingChain::default();
        pending.add(ChainFlags::ReceiveNext);
        pending.add(ChainFlags::TransmitNext);

        assert!(pending.take_tx_next());
        assert!(!pending.take_tx_next());
        assert!(pending.rx_next());
    }

    #[test]
    fn test_clear() {
        let mut pending = PendingChain::default();
        pending.add(ChainFlags::ReceiveNext);
        pending.clear();

        assert_eq!(pending, PendingChain::default());
    }
}
