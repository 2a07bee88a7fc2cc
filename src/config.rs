//! Engine tunables and Bluetooth Low Energy 1 Mbit physical layer constants

/// Inter frame spacing (T_IFS) in microseconds
pub const TIFS_US: u16 = 150;

/// Largest PDU handled by the engine, header included
pub const PDU_MAX: usize = 39;

/// Size of the PDU header (S0 and LENGTH fields)
pub const PDU_MIN: usize = 2;

/// Largest payload following the PDU header
pub const MAX_PAYLOAD_LEN: u8 = (PDU_MAX - PDU_MIN) as u8;

/// Length of the access address base in bytes (the prefix adds one more byte)
pub const ACCESS_ADDRESS_BASE_LEN: u8 = 3;

/// CRC polynomial x^24 + x^10 + x^9 + x^6 + x^4 + x^3 + x + 1, x^24 implicit
pub const CRC_POLY: u32 = 0x0000_065B;

/// Bit length of the LENGTH header field
pub const LENGTH_FIELD_BITS: u8 = 8;

/// Byte length of the S0 header field
pub const S0_FIELD_BYTES: u8 = 1;

/// Bit length of the S1 header field
pub const S1_FIELD_BITS: u8 = 0;

/// Access address used on the advertising channels
pub const ADVERTISING_ACCESS_ADDRESS: u32 = 0x8E89_BED6;

/// CRC initial value used on the advertising channels
pub const ADVERTISING_CRC_INIT: u32 = 0x0055_5555;

/// Transmit power levels available on all supported chips
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "nrf52840", derive(defmt::Format))]
pub enum TxPower {
    /// +4 dBm
    Pos4dBm,
    /// 0 dBm
    ZerodBm,
    /// -4 dBm
    Neg4dBm,
    /// -8 dBm
    Neg8dBm,
    /// -12 dBm
    Neg12dBm,
    /// -16 dBm
    Neg16dBm,
    /// -20 dBm
    Neg20dBm,
}

impl TxPower {
    /// Value of the TXPOWER register (two's complement dBm)
    pub fn bits(self) -> u32 {
        let dbm: i8 = match self {
            TxPower::Pos4dBm => 4,
            TxPower::ZerodBm => 0,
            TxPower::Neg4dBm => -4,
            TxPower::Neg8dBm => -8,
            TxPower::Neg12dBm => -12,
            TxPower::Neg16dBm => -16,
            TxPower::Neg20dBm => -20,
        };
        dbm as u8 as u32
    }
}

/// Configuration applied by [`Engine::init`](crate::radio::Engine::init)
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Config {
    /// Output power used for all transmissions
    pub tx_power: TxPower,
    /// How many times `EVENTS_HFCLKSTARTED` is polled before giving up
    pub clock_start_retries: u32,
    /// How many times `EVENTS_DISABLED` is polled by [`Engine::stop`](crate::radio::Engine::stop)
    pub disable_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tx_power: TxPower::ZerodBm,
            clock_start_retries: 100_000,
            disable_retries: 10_000,
        }
    }
}
