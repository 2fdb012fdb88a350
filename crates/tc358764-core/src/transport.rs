//! Register access over DSI generic read/write packets.

use tc358764_hal::{DsiHost, DsiMessage, MessageFlags, PacketKind};

use crate::codec;
use crate::error::TransportError;

/// Register-level access to the bridge.
pub trait RegisterAccess {
    fn read(&mut self, addr: u16) -> Result<u32, TransportError>;
    fn write(&mut self, addr: u16, value: u32) -> Result<(), TransportError>;
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for &mut T {
    fn read(&mut self, addr: u16) -> Result<u32, TransportError> {
        (**self).read(addr)
    }

    fn write(&mut self, addr: u16, value: u32) -> Result<(), TransportError> {
        (**self).write(addr, value)
    }
}

/// [`RegisterAccess`] over a DSI host's command transfer.
///
/// The host is optional: a bridge whose DSI host exposes no transfer
/// capability still constructs, but every access fails with
/// [`TransportError::Unsupported`].
pub struct DsiRegisters<H: DsiHost> {
    host: Option<H>,
    channel: u8,
}

impl<H: DsiHost> DsiRegisters<H> {
    pub fn new(host: H, channel: u8) -> Self {
        Self {
            host: Some(host),
            channel,
        }
    }

    /// A transport with no host behind it.
    pub fn unwired(channel: u8) -> Self {
        Self {
            host: None,
            channel,
        }
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    pub fn into_host(self) -> Option<H> {
        self.host
    }

    fn host_mut(&mut self) -> Result<&mut H, TransportError> {
        self.host.as_mut().ok_or(TransportError::Unsupported)
    }
}

impl<H: DsiHost> RegisterAccess for DsiRegisters<H> {
    fn read(&mut self, addr: u16) -> Result<u32, TransportError> {
        let tx = codec::encode_read(addr);
        let msg = DsiMessage {
            kind: PacketKind::GenericReadRequest2Param,
            channel: self.channel,
            flags: MessageFlags {
                low_power: true,
                request_ack: false,
            },
            tx: &tx,
        };
        // One spare byte so an over-long reply is detected instead of clipped.
        let mut rx = [0u8; codec::READ_RESPONSE_LEN + 1];
        let len = self
            .host_mut()?
            .transfer(&msg, &mut rx)
            .map_err(|e| TransportError::Transfer {
                detail: format!("{e:?}"),
            })?;
        let value = codec::decode_read(&rx[..len.min(rx.len())])?;
        log::debug!("read  {addr:#06x} -> {value:#010x}");
        Ok(value)
    }

    fn write(&mut self, addr: u16, value: u32) -> Result<(), TransportError> {
        let tx = codec::encode_write(addr, value);
        let msg = DsiMessage {
            kind: PacketKind::GenericLongWrite,
            channel: self.channel,
            flags: MessageFlags {
                low_power: true,
                request_ack: true,
            },
            tx: &tx,
        };
        log::debug!("write {addr:#06x} <- {value:#010x}");
        self.host_mut()?
            .transfer(&msg, &mut [])
            .map_err(|e| TransportError::Transfer {
                detail: format!("{e:?}"),
            })?;
        Ok(())
    }
}
