//! Mapping of Bluetooth Low Energy channel indices to RADIO frequency offsets.
//!
//! The RADIO peripheral is tuned with the offset from 2400 MHz. The three advertising channels are
//! spread over the band, while the 37 data channels fill the gaps between them.

use crate::error::Error;

/// Advertising channel indices in the order they are usually visited
pub const ADVERTISING_CHANNELS: [u8; 3] = [37, 38, 39];

/// Highest valid channel index
pub const MAX_CHANNEL: u8 = 39;

/// Converts channel index into the value of the FREQUENCY register
///
/// On air frequency = 2400 MHz + returned value MHz.
///
/// # Examples
///
/// ```
/// use nrf_ble_radio::channel::channel_to_frequency;
/// use nrf_ble_radio::error::Error;
///
/// assert_eq!(channel_to_frequency(37), Ok(2));
/// assert_eq!(channel_to_frequency(0), Ok(4));
/// assert_eq!(channel_to_frequency(40), Err(Error::InvalidChannel));
/// ```
pub fn channel_to_frequency(channel: u8) -> Result<u8, Error> {
    match channel {
        37 => Ok(2),
        38 => Ok(26),
        39 => Ok(80),
        0..=10 => Ok(4 + 2 * channel),
        11..=36 => Ok(6 + 2 * channel),
        _ => Err(Error::InvalidChannel),
    }
}

/// Initial value of the data whitening LFSR for given channel
pub(crate) fn whitening_iv(channel: u8) -> u8 {
    channel & 0x3F
}
