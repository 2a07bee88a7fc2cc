#![cfg_attr(not(any(test, doctest)), no_std)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

//! Bluetooth Low Energy 1 Mbit radio frame engine for Nordic nRF SoCs.
//!
//! The engine configures the RADIO peripheral once, then transmits and receives single PDUs on
//! request, optionally chaining an operation in the opposite direction T_IFS after the first one.
//! It is the layer on which a link layer can be built; it does not implement one.
//!
//! Currently only nRF52840 is supported, but porting to other SoCs should be straightforward.

#[cfg(not(any(feature = "mocked_platform", feature = "nrf52840")))]
compile_error!("One platform must be enabled as a build feature");

#[cfg(all(feature = "mocked_platform", feature = "nrf52840"))]
compile_error!("Cannot enable multiple platforms simultaneously (mocked and nrf52840)");

#[cfg(all(test, not(feature = "mocked_platform")))]
compile_error!("For tests \"mocked_platform\" feature shall be selected");

#[macro_use]
mod log;

pub mod chain;
pub mod channel;
pub mod config;
pub mod crit_sect;
pub mod hw;
pub mod mutex;
pub mod pdu;
pub mod utils;

/// Defines errors reported by this crate
pub mod error;

/// Radio frame engine for Nordic nRF SoCs.
///
/// To use this module create an instance of [`Engine`](radio::Engine), call
/// [`init`](radio::Engine::init) once and use methods of the created instance.
pub mod radio;
