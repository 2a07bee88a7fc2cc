//! Layout of PDUs as seen by the RADIO DMA
//!
//! With the packet configuration applied by the engine the RAM image of a PDU is:
//!
//! | S0 (1 byte) | LENGTH (1 byte) | payload (LENGTH bytes) |

use crate::config::{MAX_PAYLOAD_LEN, PDU_MIN};
use crate::error::Error;

const LENGTH_OFFSET: usize = 1;

/// Number of bytes the RADIO reads from `buffer` to transmit the PDU stored in it
///
/// Payloads longer than the configured maximum are truncated by the RADIO, so they do not require
/// more RAM than the maximum.
///
/// # Examples
///
/// ```
/// use nrf_ble_radio::pdu::required_len;
/// use nrf_ble_radio::error::Error;
///
/// assert_eq!(required_len(&[0x42, 0x03, 1, 2, 3]), Ok(5));
/// assert_eq!(required_len(&[0x42, 0x03, 1]), Err(Error::TooSmallBuffer));
/// ```
pub fn required_len(buffer: &[u8]) -> Result<usize, Error> {
    let length = *buffer.get(LENGTH_OFFSET).ok_or(Error::TooSmallBuffer)?;
    let required = PDU_MIN + length.min(MAX_PAYLOAD_LEN) as usize;

    if buffer.len() < required {
        Err(Error::TooSmallBuffer)
    } else {
        Ok(required)
    }
}
