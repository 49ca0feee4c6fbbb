pub mod reference;
pub mod emulator;

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// The 6502 processor status register, as it appears in the `P` column.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        const CARRY     = 0b0000_0001;
        const ZERO      = 0b0000_0010;
        const IRQ_DIS   = 0b0000_0100;
        const DECIMAL   = 0b0000_1000;
        const BREAK     = 0b0001_0000;
        const BREAK2    = 0b0010_0000;
        const OVERFLOW  = 0b0100_0000;
        const NEGATIVE  = 0b1000_0000;
    }
}

impl StatusFlags {
    /// Flag letters from bit 7 down to bit 0, `.` for a clear bit.
    /// 0x24 describes as `..U..I..`.
    pub fn describe(&self) -> String {
        const LETTERS: [(StatusFlags, char); 8] = [
            (StatusFlags::NEGATIVE, 'N'),
            (StatusFlags::OVERFLOW, 'V'),
            (StatusFlags::BREAK2, 'U'),
            (StatusFlags::BREAK, 'B'),
            (StatusFlags::DECIMAL, 'D'),
            (StatusFlags::IRQ_DIS, 'I'),
            (StatusFlags::ZERO, 'Z'),
            (StatusFlags::CARRY, 'C'),
        ];
        LETTERS
            .iter()
            .map(|&(flag, letter)| if self.contains(flag) { letter } else { '.' })
            .collect()
    }
}

/// One per-instruction CPU snapshot, independent of the format it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceLine {
    pub pc: u16,
    /// Three letters, or four when prefixed with the unofficial-opcode marker.
    pub mnemonic: String,
    pub opcode: u8,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub status: StatusFlags,
    pub sp: u8,
    pub cycles: u64,
}

/// Canonical rendering shared by both trace sources.
/// Format: "C000 JMP  4C  a: 00  x: 00  y: 00  sp: FD  p: 24  cyc:     7"
impl fmt::Display for TraceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04X} {:4} {:02X}  a: {:02X}  x: {:02X}  y: {:02X}  sp: {:02X}  p: {:02X}  cyc:{:6}",
            self.pc,
            self.mnemonic,
            self.opcode,
            self.a,
            self.x,
            self.y,
            self.sp,
            self.status.bits(),
            self.cycles,
        )
    }
}
