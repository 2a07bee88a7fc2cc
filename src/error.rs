/// Errors reported by radio software
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "nrf52840", derive(defmt::Format))]
pub enum Error {
    /// The radio was not configured with [`Engine::init`](crate::radio::Engine::init) yet
    NotInitialized,
    /// The radio is busy with an ongoing transmission or reception
    Busy,
    /// The channel number is out of range (0-39)
    InvalidChannel,
    /// The passed buffer cannot contain the PDU announced by its own header
    TooSmallBuffer,
    /// A transmission chained after reception was requested without an outbound buffer
    MissingOutBuffer,
    /// The high frequency clock did not report it started within the polling budget
    ClockTimeout,
    /// The radio did not acknowledge the disable task within the polling budget
    DisableTimeout,
}
