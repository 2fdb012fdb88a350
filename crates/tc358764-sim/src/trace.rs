//! Text rendering of register traces and the LVDS wiring table.

use std::fmt::Write as _;

use tc358764_core::registers::{self, LVDS_MUX_TABLE};

use crate::board::ChipEvent;

fn register_label(addr: u16) -> String {
    registers::name(addr)
        .map(str::to_owned)
        .unwrap_or_else(|| format!("{addr:#06x}"))
}

/// One line per access: direction, address, register name, value.
pub fn format_trace(events: &[ChipEvent]) -> String {
    let mut out = String::new();
    for (i, event) in events.iter().enumerate() {
        let (dir, addr, value) = match *event {
            ChipEvent::Read { addr, value } => ("R", addr, value),
            ChipEvent::Write { addr, value } => ("W", addr, value),
        };
        let _ = writeln!(
            out,
            "{i:3}  {dir}  {addr:#06x}  {:<22} {value:#010x}",
            register_label(addr)
        );
    }
    out
}

/// The mux table as LVDS output bit -> video input bit.
pub fn format_mux_table() -> String {
    let mut out = String::new();
    for (reg, entry) in LVDS_MUX_TABLE.iter().enumerate() {
        let slots: Vec<String> = entry
            .slots
            .iter()
            .enumerate()
            .map(|(slot, input)| format!("{:2}={:<2}", reg * 4 + slot, input.name()))
            .collect();
        let _ = writeln!(
            out,
            "{:<10} {:#010x}  {}",
            register_label(entry.addr),
            entry.value(),
            slots.join("  ")
        );
    }
    out
}
