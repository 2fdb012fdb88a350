#![no_std]

/// Upper bound on the number of modes a panel may report.
pub const MAX_MODES: usize = 8;

/// Mode list returned by [`Panel::get_modes`].
pub type ModeList = heapless::Vec<DisplayMode, MAX_MODES>;

/// DSI data type of a command packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketKind {
    /// Generic read request carrying two parameter bytes (0x24).
    GenericReadRequest2Param = 0x24,
    /// Generic long write (0x29).
    GenericLongWrite = 0x29,
}

/// Transfer flags attached to a DSI message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageFlags {
    /// Send in low-power mode.
    pub low_power: bool,
    /// Request an acknowledge from the peripheral.
    pub request_ack: bool,
}

/// One command packet handed to a [`DsiHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DsiMessage<'a> {
    pub kind: PacketKind,
    /// Virtual channel of the peripheral (0..=3).
    pub channel: u8,
    pub flags: MessageFlags,
    /// Outbound payload.
    pub tx: &'a [u8],
}

/// Abstracts the DSI host controller's command transfer primitive.
///
/// The driver never builds raw DSI packet headers; the host does that from
/// the message kind, channel and payload.
pub trait DsiHost {
    type Error: core::fmt::Debug;

    /// Send `msg` and, for read requests, place the response payload in `rx`.
    ///
    /// Returns the number of bytes received (0 for writes).
    fn transfer(&mut self, msg: &DsiMessage<'_>, rx: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Error from a bulk rail operation: the first rail that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RailFault<E> {
    pub rail: &'static str,
    pub cause: E,
}

/// A single switchable voltage regulator.
pub trait Regulator {
    type Error: core::fmt::Debug;

    fn enable(&mut self) -> Result<(), Self::Error>;
    fn disable(&mut self) -> Result<(), Self::Error>;
}

/// Abstracts a named set of supply rails switched as a unit.
///
/// Implementations MUST leave the set unchanged when a bulk operation fails:
/// either every rail switched or none did.
pub trait SupplyRails {
    type Error: core::fmt::Debug;

    fn bulk_enable(&mut self) -> Result<(), RailFault<Self::Error>>;
    fn bulk_disable(&mut self) -> Result<(), RailFault<Self::Error>>;
}

/// Identifier of the display-pipeline connector a panel is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectorId(pub u32);

/// A display timing as reported by a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayMode {
    /// Pixel clock in kHz.
    pub clock_khz: u32,
    pub hactive: u16,
    pub hfront_porch: u16,
    pub hsync_len: u16,
    pub hback_porch: u16,
    pub vactive: u16,
    pub vfront_porch: u16,
    pub vsync_len: u16,
    pub vback_porch: u16,
    pub preferred: bool,
}

impl DisplayMode {
    /// Total line length in pixel clocks.
    pub fn htotal(&self) -> u32 {
        self.hactive as u32 + self.hfront_porch as u32 + self.hsync_len as u32 + self.hback_porch as u32
    }

    /// Total frame height in lines.
    pub fn vtotal(&self) -> u32 {
        self.vactive as u32 + self.vfront_porch as u32 + self.vsync_len as u32 + self.vback_porch as u32
    }
}

/// Abstracts a display-pipeline element: the downstream LVDS panel, or the
/// bridge itself when seen from the DSI host side.
pub trait Panel {
    type Error: core::fmt::Debug;

    fn enable(&mut self) -> Result<(), Self::Error>;
    fn disable(&mut self) -> Result<(), Self::Error>;

    /// Bind the panel to a pipeline connector.
    fn attach(&mut self, connector: ConnectorId) -> Result<(), Self::Error>;

    /// Returns true once [`Panel::attach`] has succeeded.
    fn is_attached(&self) -> bool;

    fn get_modes(&mut self) -> Result<ModeList, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_totals() {
        let mode = DisplayMode {
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
        assert_eq!(mode.htotal(), 1440);
        assert_eq!(mode.vtotal(), 823);
    }

    #[test]
    fn packet_kind_codes() {
        assert_eq!(PacketKind::GenericReadRequest2Param as u8, 0x24);
        assert_eq!(PacketKind::GenericLongWrite as u8, 0x29);
    }
}
