//! Platform-agnostic driver for the Toshiba TC358764 MIPI-DSI to LVDS bridge.
//!
//! Generic over the DSI host, supply rails, reset GPIO, delay provider and
//! downstream panel, so the same code runs on target hardware and against
//! the host-side simulator.

pub mod bridge;
pub mod codec;
pub mod config;
pub mod error;
pub mod init;
pub mod power;
pub mod registers;
pub mod transport;

pub use bridge::{Bridge, BridgeParts, BridgeState};
pub use config::{BridgeConfig, DsiDeviceConfig, PowerPolicy, ResetTiming};
pub use error::{AttachError, BridgeError, InitError, PowerError, ProtocolError, TransportError};
pub use init::InitStep;
pub use power::{SupplySet, SUPPLY_NAMES};
pub use transport::{DsiRegisters, RegisterAccess};
