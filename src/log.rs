//! Logging macros
//!
//! On the hardware build messages go to `defmt`. The mocked platform has no global logger, so the
//! macros only borrow their arguments there.

macro_rules! log_info {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "nrf52840")]
        defmt::info!($fmt $(, $arg)*);
        $(
            #[cfg(not(feature = "nrf52840"))]
            let _ = &$arg;
        )*
    }};
}

macro_rules! log_warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "nrf52840")]
        defmt::warn!($fmt $(, $arg)*);
        $(
            #[cfg(not(feature = "nrf52840"))]
            let _ = &$arg;
        )*
    }};
}

macro_rules! log_debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "nrf52840")]
        defmt::debug!($fmt $(, $arg)*);
        $(
            #[cfg(not(feature = "nrf52840"))]
            let _ = &$arg;
        )*
    }};
}
