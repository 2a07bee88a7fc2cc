use crate::chain::{ChainFlags, PendingChain};
use crate::channel::{channel_to_frequency, whitening_iv};
use crate::config::{
    Config, ACCESS_ADDRESS_BASE_LEN, CRC_POLY, LENGTH_FIELD_BITS, MAX_PAYLOAD_LEN, PDU_MAX,
    S0_FIELD_BYTES, S1_FIELD_BITS, TIFS_US,
};
use crate::error::Error;
use crate::hw::clock::HfClock;
use crate::hw::irq;
use crate::hw::trim::{self, TrimStore};
use crate::mutex::Mutex;
use crate::pdu;
use crate::utils::poll::poll_until;
use core::ops::Deref;

// Port to nRF52840
use nrf52840_hal::pac::{clock, radio};
type RadioRegisterBlock = radio::RegisterBlock;

//// Radio Periph Wrapper
//// It is a structure allowing testability of the Engine structure. It allows overriding
//// RADIO peripheral memory space with arbitrary selected memory space (like an array)
//// in unit tests running on a host PC.
unsafe impl Send for RadioPeriphWrapper {} // Is this really safe considering it's just pointer
                                           // dereference?
struct RadioPeriphWrapper {
    ptr: *const RadioRegisterBlock,
}
impl RadioPeriphWrapper {
    pub fn new(radio: &RadioRegisterBlock) -> Self {
        RadioPeriphWrapper { ptr: radio }
    }
}
impl Deref for RadioPeriphWrapper {
    type Target = RadioRegisterBlock;
    fn deref(&self) -> &Self::Target {
        unsafe { &*self.ptr }
    }
}

/// Result of a completed reception passed to [`RxCallback`]
#[derive(Debug, PartialEq)]
pub struct RxDone<'a> {
    /// Received PDU: header followed by the payload announced in the LENGTH field
    pub pdu: &'a [u8],
    /// `true` if the hardware reported a valid CRC
    pub crc_ok: bool,
    /// `true` if a chained transmission was armed, so the radio is still busy
    pub active: bool,
}

/// Result of a completed transmission passed to [`TxCallback`]
#[derive(Debug, PartialEq)]
pub struct TxDone {
    /// `true` if a chained reception was armed, so the radio is still busy
    pub active: bool,
}

/// Type of the callback function called from the RADIO IRQ when a reception is completed
///
/// The callback must not block. If it needs to reconfigure the radio while `active` is set, it
/// must call [`Engine::stop`] first.
pub type RxCallback = fn(RxDone<'_>);

/// Type of the callback function called from the RADIO IRQ when a transmission is completed
pub type TxCallback = fn(TxDone);

/// State of the radio engine as seen by the caller
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "nrf52840", derive(defmt::Format))]
pub enum EngineState {
    /// [`Engine::init`] was not called yet
    Uninitialized,
    /// Configured, no operation in progress
    Idle,
    /// Receiver is enabled
    Receiving,
    /// Transmitter is enabled
    Transmitting,
}

/// Status bits shared with the RADIO IRQ
///
/// Both direction bits are set only within the IRQ handler, never outside a critical section.
#[derive(Debug, Default, Clone, Copy)]
struct Status {
    initialized: bool,
    rx: bool,
    tx: bool,
}

impl Status {
    fn is_busy(&self) -> bool {
        self.rx || self.tx
    }

    fn engine_state(&self) -> EngineState {
        if !self.initialized {
            EngineState::Uninitialized
        } else if self.rx {
            EngineState::Receiving
        } else if self.tx {
            EngineState::Transmitting
        } else {
            EngineState::Idle
        }
    }

    fn check_idle(&self) -> Result<(), Error> {
        if !self.initialized {
            Err(Error::NotInitialized)
        } else if self.is_busy() {
            Err(Error::Busy)
        } else {
            Ok(())
        }
    }
}

/// Data accessible by an ISR
struct IsrData {
    radio: RadioPeriphWrapper,
    status: Status,
    chain: PendingChain,
    // RADIO DMA target for all receptions. Stays in place for the lifetime of the engine.
    rx_buffer: [u8; PDU_MAX],
    out_buffer: Option<&'static [u8]>,
    rx_callback: Option<RxCallback>,
    tx_callback: Option<TxCallback>,
}

// There is only one ISR_DATA instance, because there is only one RADIO peripheral and one ISR
// handler.
static ISR_DATA: Mutex<Option<IsrData>> = Mutex::new(None);

/// Macro used to build tests on a host
///
/// It is used for unit tests and doctest targets
#[doc(hidden)]
#[macro_export]
macro_rules! missing_test_fns {
    () => {
        #[no_mangle]
        pub extern "C" fn __primask_r() -> u32 {
            0
        }

        #[no_mangle]
        pub extern "C" fn __cpsie() {}

        #[no_mangle]
        pub extern "C" fn __cpsid() {}
    };
}

/// Bluetooth Low Energy 1 Mbit radio frame engine
///
/// The engine owns the RADIO peripheral. It transmits and receives single PDUs, optionally
/// chaining a reception after a transmission (or the other way round) T_IFS after the first
/// operation ended. Completion is reported from the RADIO IRQ through callbacks registered with
/// [`set_callbacks`](Engine::set_callbacks).
///
/// # Examples
///
/// ```no_run
/// # #[macro_use] extern crate nrf_ble_radio;
/// # missing_test_fns!();
/// # fn main() {
///   use nrf52840_hal::pac::Peripherals;
///   use nrf_ble_radio::chain::ChainFlags;
///   use nrf_ble_radio::config::{Config, ADVERTISING_ACCESS_ADDRESS, ADVERTISING_CRC_INIT};
///   use nrf_ble_radio::hw::trim::NoFactoryTrim;
///   use nrf_ble_radio::radio::Engine;
///
///   static ADV_NONCONN_IND: [u8; 8] = [0x42, 0x06, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF];
///
///   let peripherals = Peripherals::take().unwrap();
///   let mut engine = Engine::new(&peripherals.RADIO, &peripherals.CLOCK);
///   engine.init(&Config::default(), &NoFactoryTrim).unwrap();
///   engine.prepare(37, ADVERTISING_ACCESS_ADDRESS, ADVERTISING_CRC_INIT).unwrap();
///   engine.send(&ADV_NONCONN_IND, ChainFlags::None).unwrap();
/// # }
/// ```
pub struct Engine {
    isr_data: &'static Mutex<Option<IsrData>>,
    hfclk: HfClock,
    config: Config,
}

impl Engine {
    /// Reset module
    ///
    /// This function is intended to be used between unit tests
    #[doc(hidden)]
    pub fn reset() {
        crate::crit_sect::locked(|cs| {
            ISR_DATA.borrow_mut(cs).take();
        });
    }

    /// Create the radio engine
    ///
    /// The engine is a singleton. Creating a second instance panics.
    pub fn new(radio: &RadioRegisterBlock, clock: &clock::RegisterBlock) -> Self {
        let isr_data = IsrData {
            radio: RadioPeriphWrapper::new(radio),
            status: Status::default(),
            chain: PendingChain::default(),
            rx_buffer: [0; PDU_MAX],
            out_buffer: None,
            rx_callback: None,
            tx_callback: None,
        };

        crate::crit_sect::locked(|cs| {
            let mut slot = ISR_DATA.borrow_mut(cs);
            assert!(slot.is_none());
            *slot = Some(isr_data);
        });

        Self {
            isr_data: &ISR_DATA,
            hfclk: HfClock::new(clock),
            config: Config::default(),
        }
    }

    /// Helper function to get access to data accessible from ISR
    fn use_isr_data<F, R>(&self, func: F) -> R
    where
        F: FnOnce(&mut IsrData) -> R,
    {
        crate::crit_sect::locked(|cs| {
            let mut isr_data_option = self.isr_data.borrow_mut(cs);
            let isr_data = isr_data_option
                .as_mut()
                .expect("radio engine data removed while the engine exists");
            func(isr_data)
        })
    }

    /// Current state of the engine
    pub fn state(&self) -> EngineState {
        self.use_isr_data(|i| i.status.engine_state())
    }

    /// Configure the radio for Bluetooth Low Energy 1 Mbit
    ///
    /// Starts the crystal oscillator (the only blocking step, bounded by
    /// [`Config::clock_start_retries`]), applies factory trims from `trim`, configures packet
    /// format, CRC, addresses and the END interrupt.
    ///
    /// Calling it again re-applies the whole configuration.
    ///
    /// Returns:
    /// * [`Ok(())`](core::result::Result::Ok) if the engine is ready for [`prepare`](Engine::prepare)
    /// * [`Err(Error::Busy)`](Error::Busy) if an operation is in progress
    /// * [`Err(Error::ClockTimeout)`](Error::ClockTimeout) if the crystal oscillator did not start
    pub fn init<T: TrimStore>(&mut self, config: &Config, trim: &T) -> Result<(), Error> {
        if self.use_isr_data(|i| i.status.is_busy()) {
            log_warn!("init() failed: radio is busy");
            return Err(Error::Busy);
        }

        self.hfclk.start_blocking(config.clock_start_retries)?;
        self.config = *config;

        let overrides = trim.ble_1mbit_overrides();
        if overrides.is_some() {
            log_info!("Factory overrides detected");
        }

        self.use_isr_data(|i| {
            if let Some(words) = &overrides {
                trim::apply_overrides(&i.radio, words);
            }

            i.radio
                .mode
                .write(|w| w.mode().variant(radio::mode::MODE_A::BLE_1MBIT));
            i.radio.tifs.write(|w| w.tifs().variant(TIFS_US));

            i.radio.pcnf1.write(|w| {
                w.maxlen()
                    .variant(MAX_PAYLOAD_LEN)
                    .statlen()
                    .variant(0)
                    .balen()
                    .variant(ACCESS_ADDRESS_BASE_LEN)
                    .endian()
                    .little()
                    .whiteen()
                    .enabled()
            });

            // Logical address 0 (BASE0 + PREFIX0.AP0) for both directions
            i.radio.txaddress.write(|w| w.txaddress().variant(0));
            i.radio.rxaddresses.write(|w| w.addr0().enabled());

            i.radio.crccnf.write(|w| {
                w.len()
                    .variant(radio::crccnf::LEN_A::THREE)
                    .skipaddr()
                    .variant(radio::crccnf::SKIPADDR_A::SKIP)
            });
            i.radio.crcpoly.write(|w| w.crcpoly().variant(CRC_POLY));

            i.radio.pcnf0.write(|w| {
                w.lflen()
                    .variant(LENGTH_FIELD_BITS)
                    .s0len()
                    .bit(S0_FIELD_BYTES == 1)
                    .s1len()
                    .variant(S1_FIELD_BITS)
                    .plen()
                    .variant(radio::pcnf0::PLEN_A::_8BIT)
            });

            i.radio.shorts.reset();

            i.radio
                .intenclr
                .write(|w| unsafe { w.bits(0xFFFF_FFFF) });
            i.radio.intenset.write(|w| w.end().set_bit());
            irq::enable_radio_irq();

            i.radio
                .txpower
                .write(|w| unsafe { w.bits(config.tx_power.bits()) });

            i.rx_buffer.fill(0);
            Engine::set_packetptr(&i.radio, &i.rx_buffer);

            i.chain.clear();
            i.status.initialized = true;
        });

        log_info!("Radio initialized");
        Ok(())
    }

    /// Register the buffer transmitted by a transmission chained after reception
    ///
    /// Returns [`Err(Error::TooSmallBuffer)`](Error::TooSmallBuffer) if `buffer` is shorter than
    /// the PDU announced in its header.
    pub fn set_out_buffer(&mut self, buffer: &'static [u8]) -> Result<(), Error> {
        pdu::required_len(buffer)?;
        self.use_isr_data(|i| i.out_buffer = Some(buffer));
        Ok(())
    }

    /// Register functions called from the RADIO IRQ when operations complete
    pub fn set_callbacks(&mut self, on_receive: Option<RxCallback>, on_send: Option<TxCallback>) {
        self.use_isr_data(|i| {
            i.rx_callback = on_receive;
            i.tx_callback = on_send;
        });
    }

    /// Sets channel, access address and CRC initial value for the following operations
    ///
    /// `address` is split into a 3 byte base (lower 24 bits) and a 1 byte prefix (upper 8 bits).
    /// Only the lower 24 bits of `crc_seed` are used.
    ///
    /// Returns:
    /// * [`Ok(())`](core::result::Result::Ok) if the parameters are latched in the radio
    /// * [`Err(Error::NotInitialized)`](Error::NotInitialized) if [`init`](Engine::init) was not
    /// called
    /// * [`Err(Error::Busy)`](Error::Busy) if the transceiver is enabled
    /// * [`Err(Error::InvalidChannel)`](Error::InvalidChannel) if `channel` is above 39
    pub fn prepare(&mut self, channel: u8, address: u32, crc_seed: u32) -> Result<(), Error> {
        let result = self.use_isr_data(|i| {
            i.status.check_idle()?;
            let frequency = channel_to_frequency(channel)?;

            i.radio
                .datawhiteiv
                .write(|w| w.datawhiteiv().variant(whitening_iv(channel)));
            i.radio
                .frequency
                .write(|w| w.frequency().variant(frequency));

            i.radio.base0.write(|w| w.base0().variant(address << 8));
            i.radio
                .prefix0
                .write(|w| w.ap0().variant((address >> 24) as u8));
            i.radio
                .crcinit
                .write(|w| w.crcinit().variant(crc_seed & 0x00FF_FFFF));
            Ok(())
        });

        if let Err(error) = result {
            log_warn!("prepare() failed: {}", error);
        }
        result
    }

    /// Helper function to set PACKETPTR register to point to passed buffer
    fn set_packetptr(radio: &RadioPeriphWrapper, buffer: &[u8]) {
        radio
            .packetptr
            .write(|w| w.packetptr().variant(buffer.as_ptr() as u32));
    }

    /// Helper function clearing events which might be left by the previous operation
    fn clear_events(radio: &RadioPeriphWrapper) {
        radio.events_ready.write(|w| w.events_ready().clear_bit());
        radio.events_address.write(|w| w.events_address().clear_bit());
        radio.events_payload.write(|w| w.events_payload().clear_bit());
        radio.events_end.write(|w| w.events_end().clear_bit());
        radio
            .events_disabled
            .write(|w| w.events_disabled().clear_bit());
    }

    /// Helper function enabling only the END interrupt
    fn enable_end_irq(radio: &RadioPeriphWrapper) {
        radio.intenclr.write(|w| unsafe { w.bits(0xFFFF_FFFF) });
        radio.intenset.write(|w| w.end().set_bit());
    }

    /// FSM procedure on entering TX state
    fn enter_tx(frame: &[u8], i: &mut IsrData) {
        let rx_next = i.chain.rx_next();

        i.radio.shorts.write(|w| {
            w.ready_start()
                .set_bit()
                .end_disable()
                .set_bit()
                .disabled_rxen()
                .bit(rx_next)
        });
        Engine::clear_events(&i.radio);
        Engine::enable_end_irq(&i.radio);
        Engine::set_packetptr(&i.radio, frame);
        i.radio.tasks_txen.write(|w| w.tasks_txen().set_bit());
    }

    /// FSM procedure on entering RX state
    fn enter_rx(i: &mut IsrData) {
        let tx_next = i.chain.tx_next() && i.out_buffer.is_some();

        i.radio.shorts.write(|w| {
            w.ready_start()
                .set_bit()
                .end_disable()
                .set_bit()
                .disabled_txen()
                .bit(tx_next)
        });
        Engine::clear_events(&i.radio);
        Engine::enable_end_irq(&i.radio);
        i.rx_buffer.fill(0);
        Engine::set_packetptr(&i.radio, &i.rx_buffer);
        i.radio.tasks_rxen.write(|w| w.tasks_rxen().set_bit());
    }

    /// Transmits a PDU
    ///
    /// `buffer` holds the PDU header followed by the payload. The radio reads it by DMA until the
    /// transmission ends, so it must stay valid and unchanged for the whole operation.
    ///
    /// With [`ChainFlags::ReceiveNext`] the receiver is enabled automatically T_IFS after the
    /// transmission. Chain requests accumulate until consumed by a completed operation.
    ///
    /// The function does not block. Completion is reported through the registered
    /// [`TxCallback`].
    ///
    /// Returns:
    /// * [`Ok(())`](core::result::Result::Ok) if the transmission was started
    /// * [`Err(Error::TooSmallBuffer)`](Error::TooSmallBuffer) if `buffer` is shorter than its
    /// header announces
    /// * [`Err(Error::NotInitialized)`](Error::NotInitialized) if [`init`](Engine::init) was not
    /// called
    /// * [`Err(Error::Busy)`](Error::Busy) if the transceiver is enabled
    /// * [`Err(Error::MissingOutBuffer)`](Error::MissingOutBuffer) if `chain` is
    /// [`ChainFlags::TransmitNext`], but no outbound buffer is registered
    pub fn send(&mut self, buffer: &'static [u8], chain: ChainFlags) -> Result<(), Error> {
        let result = pdu::required_len(buffer).and_then(|_| {
            self.use_isr_data(|i| {
                i.status.check_idle()?;
                if chain == ChainFlags::TransmitNext && i.out_buffer.is_none() {
                    return Err(Error::MissingOutBuffer);
                }
                i.chain.add(chain);
                i.status.tx = true;
                Engine::enter_tx(buffer, i);
                Ok(())
            })
        });

        if let Err(error) = result {
            log_warn!("send() failed: {}", error);
        }
        result
    }

    /// Enables receiver until a PDU is received
    ///
    /// With [`ChainFlags::TransmitNext`] the buffer registered with
    /// [`set_out_buffer`](Engine::set_out_buffer) is transmitted automatically T_IFS after the
    /// reception.
    ///
    /// The function does not block. There is no reception timeout: the receiver stays enabled
    /// until a PDU arrives or [`stop`](Engine::stop) is called.
    ///
    /// Returns:
    /// * [`Ok(())`](core::result::Result::Ok) if the receiver was enabled
    /// * [`Err(Error::NotInitialized)`](Error::NotInitialized) if [`init`](Engine::init) was not
    /// called
    /// * [`Err(Error::Busy)`](Error::Busy) if the transceiver is enabled
    /// * [`Err(Error::MissingOutBuffer)`](Error::MissingOutBuffer) if `chain` is
    /// [`ChainFlags::TransmitNext`], but no outbound buffer is registered
    pub fn recv(&mut self, chain: ChainFlags) -> Result<(), Error> {
        let result = self.use_isr_data(|i| {
            i.status.check_idle()?;
            if chain == ChainFlags::TransmitNext && i.out_buffer.is_none() {
                return Err(Error::MissingOutBuffer);
            }

            i.chain.add(chain);
            i.status.rx = true;
            Engine::enter_rx(i);
            Ok(())
        });

        if let Err(error) = result {
            log_warn!("recv() failed: {}", error);
        }
        result
    }

    /// Aborts the ongoing operation and any pending chain request
    ///
    /// On an idle engine only the pending chain requests are discarded.
    ///
    /// Blocks until the radio confirms it is disabled, bounded by [`Config::disable_retries`].
    ///
    /// Returns:
    /// * [`Ok(false)`](core::result::Result::Ok) if there was nothing to stop
    /// * [`Ok(true)`](core::result::Result::Ok) if the radio was stopped
    /// * [`Err(Error::DisableTimeout)`](Error::DisableTimeout) if the radio did not confirm it is
    /// disabled. The engine is idle anyway.
    pub fn stop(&mut self) -> Result<bool, Error> {
        let retries = self.config.disable_retries;

        self.use_isr_data(|i| {
            i.chain.clear();
            if !i.status.is_busy() {
                return Ok(false);
            }

            i.radio.shorts.modify(|_, w| {
                w.end_disable()
                    .set_bit()
                    .disabled_txen()
                    .clear_bit()
                    .disabled_rxen()
                    .clear_bit()
            });
            i.radio
                .events_disabled
                .write(|w| w.events_disabled().clear_bit());
            i.radio.tasks_disable.write(|w| w.tasks_disable().set_bit());

            let disabled = poll_until(retries, || {
                i.radio
                    .events_disabled
                    .read()
                    .events_disabled()
                    .bit_is_set()
                    || i.radio.state.read().state().is_disabled()
            });

            i.radio
                .events_disabled
                .write(|w| w.events_disabled().clear_bit());
            // An END raised before the disable must not be reported after stop
            i.radio.events_end.write(|w| w.events_end().clear_bit());
            i.status.rx = false;
            i.status.tx = false;

            if disabled {
                Ok(true)
            } else {
                Err(Error::DisableTimeout)
            }
        })
    }

    #[cfg(test)]
    fn rx_buffer_addr(&self) -> u32 {
        self.use_isr_data(|i| i.rx_buffer.as_ptr() as u32)
    }

    #[cfg(test)]
    fn rx_buffer(&self) -> [u8; PDU_MAX] {
        self.use_isr_data(|i| i.rx_buffer)
    }

    // Emulates RADIO DMA writing a received PDU
    #[cfg(test)]
    fn dma_write_rx_buffer(&self, data: &[u8]) {
        self.use_isr_data(|i| i.rx_buffer[..data.len()].copy_from_slice(data));
    }
}

#[cfg(feature = "nrf52840")]
use nrf52840_hal::pac::interrupt;
#[cfg(feature = "nrf52840")]
#[interrupt]
fn RADIO() {
    irq_handler();
}

fn irq_handler() {
    enum Callback {
        None,
        Tx(TxCallback, bool),
        Rx(RxCallback, [u8; PDU_MAX], bool, bool),
    }

    let callback = crate::crit_sect::locked(|cs| {
        let mut isr_data_option = ISR_DATA.borrow_mut(cs);
        let i = match isr_data_option.as_mut() {
            Some(i) => i,
            None => return Callback::None,
        };

        if i.radio.events_end.read().events_end().bit_is_clear() {
            return Callback::None;
        }
        i.radio.events_end.write(|w| w.events_end().clear_bit());

        let old_status = i.status;
        i.status.rx = false;
        i.status.tx = false;

        if old_status.rx {
            let mut active = false;

            if i.chain.take_tx_next() {
                match i.out_buffer {
                    Some(out_buffer) => {
                        let rx_next = i.chain.rx_next();
                        i.status.tx = true;
                        active = true;
                        Engine::set_packetptr(&i.radio, out_buffer);
                        i.radio.shorts.modify(|_, w| {
                            w.disabled_txen().clear_bit().disabled_rxen().bit(rx_next)
                        });
                    }
                    None => {
                        i.radio
                            .shorts
                            .modify(|_, w| w.disabled_txen().clear_bit());
                    }
                }
            }

            let crc_ok = i.radio.crcstatus.read().crcstatus().is_crcok();
            match i.rx_callback {
                Some(callback) => Callback::Rx(callback, i.rx_buffer, crc_ok, active),
                None => Callback::None,
            }
        } else if old_status.tx {
            let mut active = false;

            if i.chain.take_rx_next() {
                let tx_next = i.chain.tx_next() && i.out_buffer.is_some();
                i.status.rx = true;
                active = true;
                i.rx_buffer.fill(0);
                Engine::set_packetptr(&i.radio, &i.rx_buffer);
                i.radio.shorts.modify(|_, w| {
                    w.disabled_rxen().clear_bit().disabled_txen().bit(tx_next)
                });
            }

            match i.tx_callback {
                Some(callback) => Callback::Tx(callback, active),
                None => Callback::None,
            }
        } else {
            // END left over from an operation aborted by stop()
            Callback::None
        }
    });

    match callback {
        Callback::None => (),
        Callback::Rx(callback, buffer, crc_ok, active) => {
            let len = pdu::required_len(&buffer).unwrap_or(PDU_MAX);
            log_debug!("rx {=[u8]:x} crc_ok={}", &buffer[..len], crc_ok);
            callback(RxDone {
                pdu: &buffer[..len],
                crc_ok,
                active,
            });
        }
        Callback::Tx(callback, active) => callback(TxDone { active }),
    };
}

#[cfg(test)]
missing_test_fns!();
