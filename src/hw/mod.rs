//! Porting layer for the peripherals the radio engine depends on
//!
//! * [`clock`] starts the high frequency crystal oscillator required by the RADIO
//! * [`irq`] routes the RADIO interrupt line through the interrupt controller
//! * [`trim`] provides factory calibration of the RADIO analog front end

pub mod clock;
pub mod irq;
pub mod trim;
