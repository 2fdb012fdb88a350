//! Simulated board: the bridge chip, its five supplies, the reset GPIO and
//! the LVDS panel, all sharing one [`BoardState`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::rc::Rc;
use std::time::Duration;

use tc358764_core::codec;
use tc358764_core::registers::SYS_ID;
use tc358764_core::{ProtocolError, SUPPLY_NAMES};
use tc358764_hal::{
    ConnectorId, DisplayMode, DsiHost, DsiMessage, ModeList, PacketKind, Panel, Regulator,
};

/// Value of `SYS_ID` on a TC358764 (revision 0).
pub const DEFAULT_CHIP_ID: u32 = 0x6500;

/// A register access seen by the simulated chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipEvent {
    Read { addr: u16, value: u32 },
    Write { addr: u16, value: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("chip not responding: {0}")]
    NotResponding(&'static str),

    #[error("{kind:?} packet on channel {channel}, chip listens on {expected}")]
    WrongChannel {
        kind: PacketKind,
        channel: u8,
        expected: u8,
    },

    #[error(transparent)]
    Malformed(#[from] ProtocolError),

    #[error("response buffer too small: {0} bytes")]
    ShortBuffer(usize),

    #[error("no acknowledge for register {0:#06x}")]
    Nak(u16),

    #[error("supply {0} refused to switch")]
    Rail(&'static str),

    #[error("panel {0}")]
    Panel(&'static str),
}

/// State shared by every simulated component.
#[derive(Debug)]
pub struct BoardState {
    pub chip_id: u32,
    pub channel: u8,
    pub rails: BTreeMap<&'static str, bool>,
    pub reset_high: bool,
    pub reset_pulses: usize,
    pub registers: BTreeMap<u16, u32>,
    pub trace: Vec<ChipEvent>,
    /// Writes to this register are not acknowledged.
    pub fail_register: Option<u16>,
    /// This supply refuses to switch.
    pub fail_rail: Option<String>,
    pub panel_not_ready: bool,
}

impl BoardState {
    fn powered(&self) -> bool {
        self.rails.values().all(|on| *on)
    }

    fn reset_chip(&mut self) {
        self.registers.clear();
        self.registers.insert(SYS_ID, self.chip_id);
    }
}

/// Handle to the board for inspection after a run.
#[derive(Clone)]
pub struct Board {
    state: Rc<RefCell<BoardState>>,
}

impl Board {
    pub fn new(chip_id: u32, channel: u8) -> Self {
        let mut state = BoardState {
            chip_id,
            channel,
            rails: SUPPLY_NAMES.iter().map(|n| (*n, false)).collect(),
            reset_high: false,
            reset_pulses: 0,
            registers: BTreeMap::new(),
            trace: Vec::new(),
            fail_register: None,
            fail_rail: None,
            panel_not_ready: false,
        };
        state.reset_chip();
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn fail_register(&self, addr: Option<u16>) {
        self.state.borrow_mut().fail_register = addr;
    }

    pub fn fail_rail(&self, rail: Option<&str>) {
        self.state.borrow_mut().fail_rail = rail.map(str::to_owned);
    }

    pub fn set_panel_not_ready(&self, not_ready: bool) {
        self.state.borrow_mut().panel_not_ready = not_ready;
    }

    pub fn trace(&self) -> Vec<ChipEvent> {
        self.state.borrow().trace.clone()
    }

    pub fn clear_trace(&self) {
        self.state.borrow_mut().trace.clear();
    }

    pub fn register(&self, addr: u16) -> Option<u32> {
        self.state.borrow().registers.get(&addr).copied()
    }

    pub fn powered(&self) -> bool {
        self.state.borrow().powered()
    }

    pub fn rail(&self, name: &str) -> Option<bool> {
        self.state.borrow().rails.get(name).copied()
    }

    pub fn reset_high(&self) -> bool {
        self.state.borrow().reset_high
    }

    pub fn reset_pulses(&self) -> usize {
        self.state.borrow().reset_pulses
    }

    pub fn chip(&self) -> SimChip {
        SimChip {
            state: self.state.clone(),
        }
    }

    pub fn regulators(&self) -> [SimRegulator; 5] {
        SUPPLY_NAMES.map(|name| SimRegulator {
            name,
            state: self.state.clone(),
        })
    }

    pub fn reset_pin(&self) -> SimResetPin {
        SimResetPin {
            state: self.state.clone(),
        }
    }

    pub fn panel(&self) -> SimPanel {
        SimPanel {
            state: self.state.clone(),
            connector: None,
            enabled: false,
        }
    }
}

/// The bridge's DSI slave side.
pub struct SimChip {
    state: Rc<RefCell<BoardState>>,
}

impl DsiHost for SimChip {
    type Error = SimError;

    fn transfer(&mut self, msg: &DsiMessage<'_>, rx: &mut [u8]) -> Result<usize, SimError> {
        let mut st = self.state.borrow_mut();
        if !st.powered() {
            return Err(SimError::NotResponding("unpowered"));
        }
        if !st.reset_high {
            return Err(SimError::NotResponding("held in reset"));
        }
        if msg.channel != st.channel {
            return Err(SimError::WrongChannel {
                kind: msg.kind,
                channel: msg.channel,
                expected: st.channel,
            });
        }

        match msg.kind {
            PacketKind::GenericReadRequest2Param => {
                let addr = codec::decode_read_request(msg.tx)?;
                let value = st.registers.get(&addr).copied().unwrap_or(0);
                if rx.len() < codec::READ_RESPONSE_LEN {
                    return Err(SimError::ShortBuffer(rx.len()));
                }
                rx[..codec::READ_RESPONSE_LEN].copy_from_slice(&value.to_le_bytes());
                st.trace.push(ChipEvent::Read { addr, value });
                Ok(codec::READ_RESPONSE_LEN)
            }
            PacketKind::GenericLongWrite => {
                let (addr, value) = codec::decode_write(msg.tx)?;
                if st.fail_register == Some(addr) {
                    return Err(SimError::Nak(addr));
                }
                st.registers.insert(addr, value);
                st.trace.push(ChipEvent::Write { addr, value });
                Ok(0)
            }
        }
    }
}

/// One supply rail.
pub struct SimRegulator {
    name: &'static str,
    state: Rc<RefCell<BoardState>>,
}

impl SimRegulator {
    fn switch(&mut self, on: bool) -> Result<(), SimError> {
        let mut st = self.state.borrow_mut();
        if st.fail_rail.as_deref() == Some(self.name) {
            return Err(SimError::Rail(self.name));
        }
        st.rails.insert(self.name, on);
        Ok(())
    }
}

impl Regulator for SimRegulator {
    type Error = SimError;

    fn enable(&mut self) -> Result<(), SimError> {
        self.switch(true)
    }

    fn disable(&mut self) -> Result<(), SimError> {
        self.switch(false)
    }
}

/// Active-low reset GPIO. Driving it low clears the chip's registers.
pub struct SimResetPin {
    state: Rc<RefCell<BoardState>>,
}

impl embedded_hal::digital::ErrorType for SimResetPin {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for SimResetPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        let mut st = self.state.borrow_mut();
        st.reset_high = false;
        st.reset_chip();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        let mut st = self.state.borrow_mut();
        if !st.reset_high {
            st.reset_pulses += 1;
        }
        st.reset_high = true;
        Ok(())
    }
}

/// Blocking delay on the host clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl embedded_hal::delay::DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(ns as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
}

/// 10.1" 1280x800 LVDS panel.
pub const PANEL_MODE: DisplayMode = DisplayMode {
    clock_khz: 71_000,
    hactive: 1280,
    hfront_porch: 48,
    hsync_len: 32,
    hback_porch: 80,
    vactive: 800,
    vfront_porch: 3,
    vsync_len: 6,
    vback_porch: 14,
    preferred: true,
};

pub struct SimPanel {
    state: Rc<RefCell<BoardState>>,
    connector: Option<ConnectorId>,
    enabled: bool,
}

impl SimPanel {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn connector(&self) -> Option<ConnectorId> {
        self.connector
    }
}

impl Panel for SimPanel {
    type Error = SimError;

    fn enable(&mut self) -> Result<(), SimError> {
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) -> Result<(), SimError> {
        self.enabled = false;
        Ok(())
    }

    fn attach(&mut self, connector: ConnectorId) -> Result<(), SimError> {
        if self.state.borrow().panel_not_ready {
            return Err(SimError::Panel("not registered yet"));
        }
        self.connector = Some(connector);
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.connector.is_some()
    }

    fn get_modes(&mut self) -> Result<ModeList, SimError> {
        let mut modes = ModeList::new();
        modes
            .push(PANEL_MODE)
            .map_err(|_| SimError::Panel("mode list full"))?;
        Ok(modes)
    }
}
