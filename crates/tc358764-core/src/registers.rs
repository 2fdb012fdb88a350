//! TC358764 register addresses and bit-field constants.
//!
//! Field helpers follow the datasheet convention of naming a field by its
//! (high, low) bit range. Values wider than the field are truncated.

/// Mask covering bits `hi..=lo`.
pub const fn mask(hi: u32, lo: u32) -> u32 {
    let width = hi - lo + 1;
    if width >= 32 {
        u32::MAX
    } else {
        ((1u32 << width) - 1) << lo
    }
}

/// Place `value` into bits `hi..=lo`, discarding whatever does not fit.
pub const fn field(value: u32, hi: u32, lo: u32) -> u32 {
    (value << lo) & mask(hi, lo)
}

/// Extract bits `hi..=lo` of `reg`, shifted down to bit 0.
pub const fn get_field(reg: u32, hi: u32, lo: u32) -> u32 {
    (reg & mask(hi, lo)) >> lo
}

/// Single-bit mask for bit `n`.
pub const fn bit(n: u32) -> u32 {
    1 << n
}

// ---------------------------------------------------------------------------
// PPI layer
// ---------------------------------------------------------------------------

/// START control bit.
pub const PPI_STARTPPI: u16 = 0x0104;
/// LPTX timing signal.
pub const PPI_LPTXTIMECNT: u16 = 0x0114;
/// Per-lane enable.
pub const PPI_LANEENABLE: u16 = 0x0134;
/// BTA timing parameters.
pub const PPI_TX_RX_TA: u16 = 0x013C;
/// Assertion timer for data lane 0.
pub const PPI_D0S_CLRSIPOCOUNT: u16 = 0x0164;
/// Assertion timer for data lane 1.
pub const PPI_D1S_CLRSIPOCOUNT: u16 = 0x0168;
/// Assertion timer for data lane 2.
pub const PPI_D2S_CLRSIPOCOUNT: u16 = 0x016C;
/// Assertion timer for data lane 3.
pub const PPI_D3S_CLRSIPOCOUNT: u16 = 0x0170;

// ---------------------------------------------------------------------------
// DSI layer
// ---------------------------------------------------------------------------

/// START control bit of DSI-TX.
pub const DSI_STARTDSI: u16 = 0x0204;
/// DSI-RX lane enable.
pub const DSI_LANEENABLE: u16 = 0x0210;

/// Clock lane plus data lanes 0-3.
pub const LANEENABLE_CLK_D0_D3: u32 = 0x1F;

// ---------------------------------------------------------------------------
// Video path
// ---------------------------------------------------------------------------

/// Video path control.
pub const VP_CTRL: u16 = 0x0450;
/// Horizontal back porch and sync width.
pub const VP_HTIM1: u16 = 0x0454;
/// Horizontal front porch and active width.
pub const VP_HTIM2: u16 = 0x0458;
/// Vertical back porch and sync width.
pub const VP_VTIM1: u16 = 0x045C;
/// Vertical front porch and active height.
pub const VP_VTIM2: u16 = 0x0460;
/// Video frame timing update enable.
pub const VP_VFUEN: u16 = 0x0464;

pub mod vp_ctrl {
    use super::field;

    /// Magic square in RGB666.
    pub const fn msf(v: u32) -> u32 {
        field(v, 0, 0)
    }
    /// Use the chip clock for timing generation.
    pub const fn vtgen(v: u32) -> u32 {
        field(v, 4, 4)
    }
    /// Event mode video timing.
    pub const fn evtmode(v: u32) -> u32 {
        field(v, 5, 5)
    }
    /// 24-bit RGB input format.
    pub const fn rgb888(v: u32) -> u32 {
        field(v, 8, 8)
    }
    /// VSYNC delay in lines.
    pub const fn vsdelay(v: u32) -> u32 {
        field(v, 31, 20)
    }
}

pub mod vp_htim1 {
    use super::field;

    /// Horizontal back porch in pixels.
    pub const fn hbp(v: u32) -> u32 {
        field(v, 24, 16)
    }
    /// Horizontal sync width in pixels.
    pub const fn hsync(v: u32) -> u32 {
        field(v, 8, 0)
    }
}

pub mod vp_htim2 {
    use super::field;

    /// Horizontal front porch in pixels.
    pub const fn hfp(v: u32) -> u32 {
        field(v, 24, 16)
    }
    /// Active pixels per line.
    pub const fn hact(v: u32) -> u32 {
        field(v, 10, 0)
    }
}

pub mod vp_vtim1 {
    use super::field;

    /// Vertical back porch in lines.
    pub const fn vbp(v: u32) -> u32 {
        field(v, 23, 16)
    }
    /// Vertical sync width in lines.
    pub const fn vsync(v: u32) -> u32 {
        field(v, 7, 0)
    }
}

pub mod vp_vtim2 {
    use super::field;

    /// Vertical front porch in lines.
    pub const fn vfp(v: u32) -> u32 {
        field(v, 23, 16)
    }
    /// Active lines per frame.
    pub const fn vact(v: u32) -> u32 {
        field(v, 10, 0)
    }
}

// ---------------------------------------------------------------------------
// LVDS
// ---------------------------------------------------------------------------

/// Mux input for LVDS output bits 0 to 3.
pub const LV_MX0003: u16 = 0x0480;
/// Mux input for LVDS output bits 4 to 7.
pub const LV_MX0407: u16 = 0x0484;
/// Mux input for LVDS output bits 8 to 11.
pub const LV_MX0811: u16 = 0x0488;
/// Mux input for LVDS output bits 12 to 15.
pub const LV_MX1215: u16 = 0x048C;
/// Mux input for LVDS output bits 16 to 19.
pub const LV_MX1619: u16 = 0x0490;
/// Mux input for LVDS output bits 20 to 23.
pub const LV_MX2023: u16 = 0x0494;
/// Mux input for LVDS output bits 24 to 27.
pub const LV_MX2427: u16 = 0x0498;
/// LVDS configuration.
pub const LV_CFG: u16 = 0x049C;
/// LVDS PHY control.
pub const LV_PHY0: u16 = 0x04A0;

pub mod lv_phy0 {
    use super::field;

    /// PHY reset.
    pub const fn rst(v: u32) -> u32 {
        field(v, 22, 22)
    }
    /// Interface speed select.
    pub const fn is(v: u32) -> u32 {
        field(v, 15, 14)
    }
    /// Lane count divider.
    pub const fn nd(v: u32) -> u32 {
        field(v, 4, 0)
    }
}

/// Video signal bit feeding an LVDS output bit, as numbered by the mux
/// registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LaneInput {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    G0,
    G1,
    G2,
    G3,
    G4,
    G5,
    G6,
    G7,
    B0,
    B1,
    B2,
    B3,
    B4,
    B5,
    B6,
    B7,
    HSync,
    VSync,
    DataEnable,
    /// Spare input, tied low.
    L0,
}

impl LaneInput {
    pub const COUNT: usize = 28;

    pub const ALL: [LaneInput; Self::COUNT] = [
        Self::R0,
        Self::R1,
        Self::R2,
        Self::R3,
        Self::R4,
        Self::R5,
        Self::R6,
        Self::R7,
        Self::G0,
        Self::G1,
        Self::G2,
        Self::G3,
        Self::G4,
        Self::G5,
        Self::G6,
        Self::G7,
        Self::B0,
        Self::B1,
        Self::B2,
        Self::B3,
        Self::B4,
        Self::B5,
        Self::B6,
        Self::B7,
        Self::HSync,
        Self::VSync,
        Self::DataEnable,
        Self::L0,
    ];

    pub const fn code(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        const NAMES: [&str; LaneInput::COUNT] = [
            "R0", "R1", "R2", "R3", "R4", "R5", "R6", "R7", "G0", "G1", "G2", "G3", "G4", "G5",
            "G6", "G7", "B0", "B1", "B2", "B3", "B4", "B5", "B6", "B7", "HS", "VS", "DE", "L0",
        ];
        NAMES[self as usize]
    }
}

impl TryFrom<u8> for LaneInput {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, u8> {
        Self::ALL.get(code as usize).copied().ok_or(code)
    }
}

/// Pack four mux slots into one `LV_MXnnnn` value.
pub const fn lv_mx(b0: LaneInput, b1: LaneInput, b2: LaneInput, b3: LaneInput) -> u32 {
    field(b0.code(), 4, 0) | field(b1.code(), 12, 8) | field(b2.code(), 20, 16) | field(b3.code(), 28, 24)
}

/// Split an `LV_MXnnnn` value into its four 5-bit slot codes.
pub const fn lv_mx_slots(value: u32) -> [u8; 4] {
    [
        get_field(value, 4, 0) as u8,
        get_field(value, 12, 8) as u8,
        get_field(value, 20, 16) as u8,
        get_field(value, 28, 24) as u8,
    ]
}

/// One mux register and the inputs wired to its four output bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuxEntry {
    pub addr: u16,
    pub slots: [LaneInput; 4],
}

impl MuxEntry {
    pub const fn value(&self) -> u32 {
        lv_mx(self.slots[0], self.slots[1], self.slots[2], self.slots[3])
    }
}

/// RGB888 to LVDS wiring of the board, in register write order.
pub const LVDS_MUX_TABLE: [MuxEntry; 7] = {
    use LaneInput::*;
    [
        MuxEntry { addr: LV_MX0003, slots: [R0, R1, R2, R3] },
        MuxEntry { addr: LV_MX0407, slots: [R4, R7, R5, G0] },
        MuxEntry { addr: LV_MX0811, slots: [G1, G2, G6, G7] },
        MuxEntry { addr: LV_MX1215, slots: [G3, G4, G5, B0] },
        MuxEntry { addr: LV_MX1619, slots: [B6, B7, B1, B2] },
        MuxEntry { addr: LV_MX2023, slots: [B3, B4, B5, L0] },
        MuxEntry { addr: LV_MX2427, slots: [HSync, VSync, DataEnable, R6] },
    ]
};

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// System reset control.
pub const SYS_RST: u16 = 0x0504;
/// Chip and revision ID, read only.
pub const SYS_ID: u16 = 0x0580;

/// Register name for traces and logs, if the address is part of the map.
pub fn name(addr: u16) -> Option<&'static str> {
    let name = match addr {
        PPI_STARTPPI => "PPI_STARTPPI",
        PPI_LPTXTIMECNT => "PPI_LPTXTIMECNT",
        PPI_LANEENABLE => "PPI_LANEENABLE",
        PPI_TX_RX_TA => "PPI_TX_RX_TA",
        PPI_D0S_CLRSIPOCOUNT => "PPI_D0S_CLRSIPOCOUNT",
        PPI_D1S_CLRSIPOCOUNT => "PPI_D1S_CLRSIPOCOUNT",
        PPI_D2S_CLRSIPOCOUNT => "PPI_D2S_CLRSIPOCOUNT",
        PPI_D3S_CLRSIPOCOUNT => "PPI_D3S_CLRSIPOCOUNT",
        DSI_STARTDSI => "DSI_STARTDSI",
        DSI_LANEENABLE => "DSI_LANEENABLE",
        VP_CTRL => "VP_CTRL",
        VP_HTIM1 => "VP_HTIM1",
        VP_HTIM2 => "VP_HTIM2",
        VP_VTIM1 => "VP_VTIM1",
        VP_VTIM2 => "VP_VTIM2",
        VP_VFUEN => "VP_VFUEN",
        LV_MX0003 => "LV_MX0003",
        LV_MX0407 => "LV_MX0407",
        LV_MX0811 => "LV_MX0811",
        LV_MX1215 => "LV_MX1215",
        LV_MX1619 => "LV_MX1619",
        LV_MX2023 => "LV_MX2023",
        LV_MX2427 => "LV_MX2427",
        LV_CFG => "LV_CFG",
        LV_PHY0 => "LV_PHY0",
        SYS_RST => "SYS_RST",
        SYS_ID => "SYS_ID",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_masks_and_shifts() {
        assert_eq!(mask(0, 0), 0x1);
        assert_eq!(mask(31, 20), 0xFFF0_0000);
        assert_eq!(mask(31, 0), u32::MAX);
        assert_eq!(field(15, 31, 20), 0x00F0_0000);
    }

    #[test]
    fn field_truncates_oversized_values() {
        // 9-bit field: 0x3FF loses its top bit.
        assert_eq!(vp_htim1::hsync(0x3FF), 0x1FF);
        assert_eq!(lv_phy0::is(7), 0b11 << 14);
        assert_eq!(vp_ctrl::vsdelay(0x1FFF), 0xFFF0_0000);
    }

    #[test]
    fn get_field_inverts_field() {
        let v = vp_vtim2::vfp(3) | vp_vtim2::vact(800);
        assert_eq!(get_field(v, 23, 16), 3);
        assert_eq!(get_field(v, 10, 0), 800);
    }

    #[test]
    fn lane_input_codes() {
        assert_eq!(LaneInput::R0.code(), 0);
        assert_eq!(LaneInput::G0.code(), 8);
        assert_eq!(LaneInput::B0.code(), 16);
        assert_eq!(LaneInput::HSync.code(), 24);
        assert_eq!(LaneInput::L0.code(), 27);
        for (i, input) in LaneInput::ALL.iter().enumerate() {
            assert_eq!(input.code() as usize, i);
            assert_eq!(LaneInput::try_from(i as u8), Ok(*input));
        }
        assert_eq!(LaneInput::try_from(28), Err(28));
    }

    #[test]
    fn mux_golden_values() {
        let values: Vec<u32> = LVDS_MUX_TABLE.iter().map(MuxEntry::value).collect();
        assert_eq!(
            values,
            vec![
                0x0302_0100,
                0x0805_0704,
                0x0F0E_0A09,
                0x100D_0C0B,
                0x1211_1716,
                0x1B15_1413,
                0x061A_1918,
            ]
        );
    }

    #[test]
    fn mux_table_is_a_permutation() {
        let mut seen = [false; LaneInput::COUNT];
        for entry in &LVDS_MUX_TABLE {
            for slot in entry.slots {
                assert!(!seen[slot as usize], "{} wired twice", slot.name());
                seen[slot as usize] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn register_names() {
        assert_eq!(name(LV_PHY0), Some("LV_PHY0"));
        assert_eq!(name(SYS_ID), Some("SYS_ID"));
        assert_eq!(name(0x0000), None);
    }
}
