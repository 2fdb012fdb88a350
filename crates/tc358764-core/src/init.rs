//! Register program bringing the bridge from reset to LVDS passthrough.
//!
//! The program is a fixed, non-branching sequence. The first failed write
//! aborts it; nothing is rolled back here.

use crate::error::InitError;
use crate::registers::{self as regs, bit, lv_phy0, vp_ctrl, LVDS_MUX_TABLE};
use crate::transport::RegisterAccess;

/// Stage of the init program, numbered in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InitStep {
    /// Diagnostic read of the chip ID. Never fatal.
    ReadChipId = 1,
    /// BTA, LPTX and per-lane assertion timers.
    PpiTiming,
    LaneEnable,
    /// Start the PPI and DSI-RX state machines.
    Start,
    VideoPath,
    /// Assert then release the LVDS PHY reset.
    PhyReset,
    SystemReset,
    LvdsMux,
    LvdsConfig,
}

impl InitStep {
    pub const fn number(self) -> u8 {
        self as u8
    }
}

/// One entry of the init program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterWrite {
    pub step: InitStep,
    pub addr: u16,
    pub value: u32,
}

const fn w(step: InitStep, addr: u16, value: u32) -> RegisterWrite {
    RegisterWrite { step, addr, value }
}

/// BTA timing: TXTAGO 2, TXTASURE 3.
pub const PPI_TX_RX_TA_VALUE: u32 = 0x0002_0003;
pub const PPI_LPTXTIMECNT_VALUE: u32 = 2;
pub const PPI_CLRSIPOCOUNT_VALUE: u32 = 5;

/// VSYNC delay 15 lines, RGB888, event mode. Bits 17 and 19 are undocumented
/// but required by the chip.
pub const VP_CTRL_VALUE: u32 =
    vp_ctrl::vsdelay(15) | vp_ctrl::rgb888(1) | vp_ctrl::evtmode(1) | bit(17) | bit(19);

/// LVDS PHY interface speed and lane fields, shared by both PHY reset writes.
pub const LV_PHY0_BASE: u32 = bit(18) | lv_phy0::is(2) | lv_phy0::nd(6);
pub const LV_PHY0_RESET: u32 = LV_PHY0_BASE | lv_phy0::rst(1);

pub const SYS_RST_VALUE: u32 = bit(2);
pub const LV_CFG_VALUE: u32 = 0xD;

/// Number of writes in [`INIT_PROGRAM`].
pub const PROGRAM_LEN: usize = 22;

pub const INIT_PROGRAM: [RegisterWrite; PROGRAM_LEN] = {
    use InitStep::*;
    [
        w(PpiTiming, regs::PPI_TX_RX_TA, PPI_TX_RX_TA_VALUE),
        w(PpiTiming, regs::PPI_LPTXTIMECNT, PPI_LPTXTIMECNT_VALUE),
        w(PpiTiming, regs::PPI_D0S_CLRSIPOCOUNT, PPI_CLRSIPOCOUNT_VALUE),
        w(PpiTiming, regs::PPI_D1S_CLRSIPOCOUNT, PPI_CLRSIPOCOUNT_VALUE),
        w(PpiTiming, regs::PPI_D2S_CLRSIPOCOUNT, PPI_CLRSIPOCOUNT_VALUE),
        w(PpiTiming, regs::PPI_D3S_CLRSIPOCOUNT, PPI_CLRSIPOCOUNT_VALUE),
        w(LaneEnable, regs::PPI_LANEENABLE, regs::LANEENABLE_CLK_D0_D3),
        w(LaneEnable, regs::DSI_LANEENABLE, regs::LANEENABLE_CLK_D0_D3),
        w(Start, regs::PPI_STARTPPI, 1),
        w(Start, regs::DSI_STARTDSI, 1),
        w(VideoPath, regs::VP_CTRL, VP_CTRL_VALUE),
        w(PhyReset, regs::LV_PHY0, LV_PHY0_RESET),
        w(PhyReset, regs::LV_PHY0, LV_PHY0_BASE),
        w(SystemReset, regs::SYS_RST, SYS_RST_VALUE),
        w(LvdsMux, LVDS_MUX_TABLE[0].addr, LVDS_MUX_TABLE[0].value()),
        w(LvdsMux, LVDS_MUX_TABLE[1].addr, LVDS_MUX_TABLE[1].value()),
        w(LvdsMux, LVDS_MUX_TABLE[2].addr, LVDS_MUX_TABLE[2].value()),
        w(LvdsMux, LVDS_MUX_TABLE[3].addr, LVDS_MUX_TABLE[3].value()),
        w(LvdsMux, LVDS_MUX_TABLE[4].addr, LVDS_MUX_TABLE[4].value()),
        w(LvdsMux, LVDS_MUX_TABLE[5].addr, LVDS_MUX_TABLE[5].value()),
        w(LvdsMux, LVDS_MUX_TABLE[6].addr, LVDS_MUX_TABLE[6].value()),
        w(LvdsConfig, regs::LV_CFG, LV_CFG_VALUE),
    ]
};

/// Read the chip ID for the log. Returns `None` if the read failed.
pub fn read_chip_id<T: RegisterAccess + ?Sized>(bus: &mut T) -> Option<u32> {
    match bus.read(regs::SYS_ID) {
        Ok(id) => {
            log::info!("ID: {id:#x}");
            Some(id)
        }
        Err(e) => {
            log::warn!("chip ID read failed: {e}");
            None
        }
    }
}

/// Run the full init program. Returns the chip ID if the diagnostic read
/// succeeded.
pub fn initialize<T: RegisterAccess + ?Sized>(bus: &mut T) -> Result<Option<u32>, InitError> {
    let id = read_chip_id(bus);

    for op in &INIT_PROGRAM {
        bus.write(op.addr, op.value).map_err(|cause| {
            log::error!(
                "init step {} ({:?}) failed writing {:#06x}: {cause}",
                op.step.number(),
                op.step,
                op.addr
            );
            InitError {
                step: op.step,
                cause,
            }
        })?;
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_numbers() {
        assert_eq!(InitStep::ReadChipId.number(), 1);
        assert_eq!(InitStep::PhyReset.number(), 6);
        assert_eq!(InitStep::LvdsConfig.number(), 9);
    }

    #[test]
    fn golden_constants() {
        assert_eq!(VP_CTRL_VALUE, 0x00FA_0120);
        assert_eq!(LV_PHY0_RESET, 0x0044_8006);
        assert_eq!(LV_PHY0_BASE, 0x0004_8006);
        assert_eq!(SYS_RST_VALUE, 0x4);
    }

    #[test]
    fn program_steps_are_monotonic() {
        for pair in INIT_PROGRAM.windows(2) {
            assert!(pair[0].step <= pair[1].step);
        }
        assert_eq!(INIT_PROGRAM[0].step, InitStep::PpiTiming);
        assert_eq!(INIT_PROGRAM[PROGRAM_LEN - 1].step, InitStep::LvdsConfig);
    }

    #[test]
    fn every_write_step_is_present() {
        for step in [
            InitStep::PpiTiming,
            InitStep::LaneEnable,
            InitStep::Start,
            InitStep::VideoPath,
            InitStep::PhyReset,
            InitStep::SystemReset,
            InitStep::LvdsMux,
            InitStep::LvdsConfig,
        ] {
            assert!(INIT_PROGRAM.iter().any(|op| op.step == step), "{step:?} missing");
        }
        assert!(!INIT_PROGRAM.iter().any(|op| op.step == InitStep::ReadChipId));
    }

    #[test]
    fn phy_reset_pair_differs_only_in_reset_bit() {
        let phy: Vec<_> = INIT_PROGRAM.iter().filter(|op| op.addr == regs::LV_PHY0).collect();
        assert_eq!(phy.len(), 2);
        assert_eq!(phy[0].value ^ phy[1].value, lv_phy0::rst(1));
        assert_ne!(phy[0].value & lv_phy0::rst(1), 0);
    }
}
