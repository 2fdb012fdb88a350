//! Error types for bridge operations.
//!
//! Collaborator errors (DSI host, regulators, panel) are generic at the trait
//! seams; they are flattened to their `Debug` text when they cross into these
//! enums so the lifecycle state machine can stay non-generic over them.

use crate::init::InitStep;

/// Malformed response from the bridge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("unexpected payload length: expected {expected} bytes, got {actual}")]
    UnexpectedLength { expected: usize, actual: usize },
}

/// Failure of a single register read or write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// No DSI host transfer capability is wired up.
    #[error("register transport not available")]
    Unsupported,

    /// The DSI host reported a transfer failure.
    #[error("DSI transfer failed: {detail}")]
    Transfer { detail: String },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Supply rail switching failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PowerError {
    #[error("failed to enable supply {rail}: {detail}")]
    Enable { rail: &'static str, detail: String },

    #[error("failed to disable supply {rail}: {detail}")]
    Disable { rail: &'static str, detail: String },
}

impl PowerError {
    /// Name of the first rail that failed.
    pub fn rail(&self) -> &'static str {
        match self {
            Self::Enable { rail, .. } | Self::Disable { rail, .. } => rail,
        }
    }
}

/// The register program aborted at `step`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("bridge init failed at step {} ({:?}): {}", .step.number(), .step, .cause)]
pub struct InitError {
    pub step: InitStep,
    pub cause: TransportError,
}

/// Downstream panel not ready to report modes. Retry later.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttachError {
    #[error("bridge is not bound to a connector")]
    NoConnector,

    #[error("panel not ready: {detail}")]
    PanelNotReady { detail: String },
}

/// Error from a lifecycle controller operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("cannot {op} while bridge is {state:?}")]
    InvalidState {
        op: &'static str,
        state: crate::bridge::BridgeState,
    },

    #[error(transparent)]
    Power(#[from] PowerError),

    #[error(transparent)]
    Init(#[from] InitError),

    #[error(transparent)]
    Attach(#[from] AttachError),

    /// The downstream panel failed to report its modes.
    #[error("panel error: {detail}")]
    Panel { detail: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_error_names_step_number() {
        let err = InitError {
            step: InitStep::PhyReset,
            cause: TransportError::Unsupported,
        };
        assert_eq!(
            err.to_string(),
            "bridge init failed at step 6 (PhyReset): register transport not available"
        );
    }

    #[test]
    fn protocol_error_converts_into_transport_error() {
        let err: TransportError = ProtocolError::UnexpectedLength { expected: 4, actual: 2 }.into();
        assert_eq!(
            err.to_string(),
            "unexpected payload length: expected 4 bytes, got 2"
        );
    }

    #[test]
    fn power_error_reports_rail() {
        let err = PowerError::Enable {
            rail: "vddmipi",
            detail: "Timeout".into(),
        };
        assert_eq!(err.rail(), "vddmipi");
        assert_eq!(err.to_string(), "failed to enable supply vddmipi: Timeout");
    }
}
