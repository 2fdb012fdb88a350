//! Lifecycle controller: power sequencing plus register init, one instance
//! per physical bridge.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use tc358764_hal::{ConnectorId, ModeList, Panel, SupplyRails};

use crate::config::BridgeConfig;
use crate::error::{AttachError, BridgeError};
use crate::init;
use crate::power::Sequencer;
use crate::transport::RegisterAccess;

/// Lifecycle stage of the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    /// Constructed; rail and reset state unknown.
    Uninitialized,
    PoweredOff,
    /// Enable power sequence in progress.
    Resetting,
    /// Powered and out of reset, register program not yet run.
    PoweredOn,
    Initialized,
    /// Disable power sequence in progress.
    Disabling,
    /// Enable aborted. Only `disable()` leaves this state.
    Failed,
}

impl BridgeState {
    /// States in which registers may be touched, provided the chip was reset
    /// on the way in. `Failed` covers both a power abort before the reset
    /// pulse and an init abort after it.
    pub fn allows_register_access(self) -> bool {
        !matches!(self, Self::Uninitialized | Self::PoweredOff)
    }
}

/// Hardware owned by a [`Bridge`].
pub struct BridgeParts<T, S, L, D, P> {
    pub regs: T,
    pub rails: S,
    pub reset: L,
    pub delay: D,
    /// Downstream LVDS panel.
    pub panel: P,
}

/// TC358764 DSI-to-LVDS bridge.
///
/// `enable` and `disable` take `&mut self`; concurrent callers must wrap the
/// bridge in their own lock.
pub struct Bridge<T, S, L, D, P> {
    regs: T,
    rails: S,
    reset: L,
    delay: D,
    panel: P,
    config: BridgeConfig,
    state: BridgeState,
    connector: Option<ConnectorId>,
    chip_id: Option<u32>,
    /// Set once an enable sequence has completed its reset pulse.
    reset_done: bool,
}

impl<T, S, L, D, P> Bridge<T, S, L, D, P>
where
    T: RegisterAccess,
    S: SupplyRails,
    L: OutputPin,
    D: DelayNs,
    P: Panel,
{
    pub fn new(parts: BridgeParts<T, S, L, D, P>, config: BridgeConfig) -> Self {
        let BridgeParts {
            regs,
            rails,
            reset,
            delay,
            panel,
        } = parts;
        Self {
            regs,
            rails,
            reset,
            delay,
            panel,
            config,
            state: BridgeState::Uninitialized,
            connector: None,
            chip_id: None,
            reset_done: false,
        }
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Chip ID read during the last successful enable, if the read worked.
    pub fn chip_id(&self) -> Option<u32> {
        self.chip_id
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn connector(&self) -> Option<ConnectorId> {
        self.connector
    }

    /// Power up, reset and program the bridge.
    ///
    /// Valid from `Uninitialized` or `PoweredOff`. On failure the bridge is
    /// left `Failed` and must be disabled before another attempt.
    pub fn enable(&mut self) -> Result<(), BridgeError> {
        match self.state {
            BridgeState::Uninitialized | BridgeState::PoweredOff => {}
            state => return Err(BridgeError::InvalidState { op: "enable", state }),
        }

        log::info!("bridge: enabling");
        self.state = BridgeState::Resetting;
        let mut seq = Sequencer {
            rails: &mut self.rails,
            reset: &mut self.reset,
            delay: &mut self.delay,
            timing: self.config.timing,
            policy: self.config.power_policy,
        };
        if let Err(e) = seq.enable_sequence(&mut self.panel) {
            self.state = BridgeState::Failed;
            return Err(e.into());
        }
        self.reset_done = true;
        self.state = BridgeState::PoweredOn;

        match init::initialize(&mut self.regs) {
            Ok(id) => {
                self.chip_id = id;
                self.state = BridgeState::Initialized;
                log::info!("bridge: initialized");
                Ok(())
            }
            Err(e) => {
                self.state = BridgeState::Failed;
                Err(e.into())
            }
        }
    }

    /// Reset, switch off the panel and drop the rails.
    ///
    /// Runs from any state, including a failed or never-enabled bridge.
    /// Failures along the way are logged, never returned.
    pub fn disable(&mut self) {
        log::info!("bridge: disabling from {:?}", self.state);
        self.state = BridgeState::Disabling;
        let mut seq = Sequencer {
            rails: &mut self.rails,
            reset: &mut self.reset,
            delay: &mut self.delay,
            timing: self.config.timing,
            policy: self.config.power_policy,
        };
        // Already logged by the sequencer.
        let _ = seq.disable_sequence(&mut self.panel);
        self.chip_id = None;
        self.reset_done = false;
        self.state = BridgeState::PoweredOff;
    }

    /// Bind the bridge to the display pipeline connector it feeds.
    pub fn attach(&mut self, connector: ConnectorId) {
        self.connector = Some(connector);
    }

    /// Modes of the downstream panel, attaching it to the bridge's connector
    /// first if needed.
    pub fn get_modes(&mut self) -> Result<ModeList, BridgeError> {
        if !self.panel.is_attached() {
            let connector = self.connector.ok_or(AttachError::NoConnector)?;
            self.panel
                .attach(connector)
                .map_err(|e| AttachError::PanelNotReady {
                    detail: format!("{e:?}"),
                })?;
        }
        self.panel.get_modes().map_err(|e| BridgeError::Panel {
            detail: format!("{e:?}"),
        })
    }

    pub fn read_register(&mut self, addr: u16) -> Result<u32, BridgeError> {
        self.check_access("read register")?;
        Ok(self.regs.read(addr)?)
    }

    pub fn write_register(&mut self, addr: u16, value: u32) -> Result<(), BridgeError> {
        self.check_access("write register")?;
        Ok(self.regs.write(addr, value)?)
    }

    /// Disable the bridge and hand back its hardware.
    pub fn release(mut self) -> BridgeParts<T, S, L, D, P> {
        self.disable();
        BridgeParts {
            regs: self.regs,
            rails: self.rails,
            reset: self.reset,
            delay: self.delay,
            panel: self.panel,
        }
    }

    /// Registers are reachable only after the enable sequence reset the chip.
    fn check_access(&self, op: &'static str) -> Result<(), BridgeError> {
        if self.reset_done && self.state.allows_register_access() {
            Ok(())
        } else {
            Err(BridgeError::InvalidState {
                op,
                state: self.state,
            })
        }
    }
}

/// The bridge is itself a display-pipeline element in front of its panel.
impl<T, S, L, D, P> Panel for Bridge<T, S, L, D, P>
where
    T: RegisterAccess,
    S: SupplyRails,
    L: OutputPin,
    D: DelayNs,
    P: Panel,
{
    type Error = BridgeError;

    fn enable(&mut self) -> Result<(), BridgeError> {
        Bridge::enable(self)
    }

    fn disable(&mut self) -> Result<(), BridgeError> {
        Bridge::disable(self);
        Ok(())
    }

    fn attach(&mut self, connector: ConnectorId) -> Result<(), BridgeError> {
        Bridge::attach(self, connector);
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.connector.is_some()
    }

    fn get_modes(&mut self) -> Result<ModeList, BridgeError> {
        Bridge::get_modes(self)
    }
}
