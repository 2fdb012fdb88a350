//! Host-side simulation of a TC358764 board for exercising the driver
//! without hardware.

pub mod board;
pub mod trace;

pub use board::{Board, ChipEvent, SimChip, SimError, SimPanel, SimRegulator, SimResetPin, StdDelay};

use tc358764_core::{Bridge, BridgeConfig, BridgeParts, DsiRegisters, SupplySet};

/// Driver instance wired to a simulated board.
pub type SimBridge = Bridge<DsiRegisters<SimChip>, SupplySet<SimRegulator>, SimResetPin, StdDelay, SimPanel>;

/// Fault injection for a simulated run.
#[derive(Debug, Clone, Default)]
pub struct SimOptions {
    /// Register whose writes are not acknowledged.
    pub fail_register: Option<u16>,
    /// Supply that refuses to switch.
    pub fail_rail: Option<String>,
    /// Leave the DSI host without a transfer capability.
    pub unwired: bool,
    pub panel_not_ready: bool,
}

/// Build a board and a bridge driver connected to it.
pub fn build(options: &SimOptions, config: BridgeConfig) -> (SimBridge, Board) {
    let board = Board::new(board::DEFAULT_CHIP_ID, config.channel);
    board.fail_register(options.fail_register);
    board.fail_rail(options.fail_rail.as_deref());
    board.set_panel_not_ready(options.panel_not_ready);

    let regs = if options.unwired {
        DsiRegisters::unwired(config.channel)
    } else {
        DsiRegisters::new(board.chip(), config.channel)
    };
    let bridge = Bridge::new(
        BridgeParts {
            regs,
            rails: SupplySet::new(board.regulators()),
            reset: board.reset_pin(),
            delay: StdDelay,
            panel: board.panel(),
        },
        config,
    );
    (bridge, board)
}
