use std::fmt;

use crate::memory::TypeAddr;

/// An undecoded 16-bit instruction word with accessors for its operand fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstruction(pub u16);

impl RawInstruction {
    pub fn new(code: u16) -> Self {
        RawInstruction(code)
    }

    // n is the starting nibble counted from the left (1..=4), m is how many
    pub fn nibbles(&self, n: u8, m: u8) -> u16 {
        // 0110 1100 1111 0001
        //      ^^^^ ^^^^         n = 2, m = 2 -> shift by 4
        let shift_places = (4 - m - (n - 1)) * 4;
        let mask = (1u32 << (m * 4)) - 1;
        (self.0 >> shift_places) & mask as u16
    }

    /// Top nibble, selects the instruction family.
    pub fn family(&self) -> u8 {
        self.nibbles(1, 1) as u8
    }

    pub fn x(&self) -> u8 {
        self.nibbles(2, 1) as u8
    }

    pub fn y(&self) -> u8 {
        self.nibbles(3, 1) as u8
    }

    pub fn n(&self) -> u8 {
        self.nibbles(4, 1) as u8
    }

    pub fn nn(&self) -> u8 {
        self.nibbles(3, 2) as u8
    }

    pub fn nnn(&self) -> TypeAddr {
        self.nibbles(2, 3)
    }
}

impl PartialEq<u16> for RawInstruction {
    fn eq(&self, ins: &u16) -> bool {
        ins.eq(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    // 00E0
    ClearScreen,
    // 00EE
    Return,
    // 1NNN
    Jump(TypeAddr),
    // 2NNN
    Call(TypeAddr),

    // 3XNN
    SkipEqualConstant(u8, u8),
    // 4XNN
    SkipNotEqualConstant(u8, u8),
    // 5XY_
    SkipEqualRegister(u8, u8),
    // 9XY_
    SkipNotEqualRegister(u8, u8),

    // 6XNN
    SetRegister(u8, u8),
    // 7XNN, no carry
    AddToRegister(u8, u8),

    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    XOr(u8, u8),
    /// 8XY4: VF = carry
    Add(u8, u8),
    /// 8XY5: VX = VX - VY, VF = no borrow
    SubtractForward(u8, u8),
    /// 8XY6: VF = bit shifted out
    RightShift(u8, u8),
    /// 8XY7: VX = VY - VX, VF = no borrow
    SubtractBackward(u8, u8),
    /// 8XYE: VF = bit shifted out
    LeftShift(u8, u8),

    // ANNN
    SetIndexRegister(TypeAddr),
    // BNNN
    JumpWithOffset(TypeAddr),
    // CXNN
    Random(u8, u8),
    /// DXYN: draw an N row sprite from I at (VX, VY), VF = collision
    Display(u8, u8, u8),

    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),

    // FX07
    CopyDelayToRegister(u8),
    /// FX0A: blocks until a key is down
    GetKey(u8),
    // FX15
    CopyRegisterToDelay(u8),
    // FX18
    CopyRegisterToSound(u8),
    // FX1E
    AddToIndex(u8),
    // FX29
    PointChar(u8),
    // FX33
    ToDecimal(u8),
    // FX55
    StoreRegisterToMemory(u8),
    // FX65
    LoadRegisterFromMemory(u8),

    /// Anything else, kept so it can be reported.
    Unknown(u16),
}

impl OpCode {
    pub fn decode(ins: u16) -> Self {
        let raw = RawInstruction::new(ins);
        let (x, y) = (raw.x(), raw.y());

        match raw.family() {
            0x0 => match ins {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::Return,
                _ => Self::Unknown(ins),
            },
            0x1 => Self::Jump(raw.nnn()),
            0x2 => Self::Call(raw.nnn()),
            0x3 => Self::SkipEqualConstant(x, raw.nn()),
            0x4 => Self::SkipNotEqualConstant(x, raw.nn()),
            0x5 => Self::SkipEqualRegister(x, y),
            0x6 => Self::SetRegister(x, raw.nn()),
            0x7 => Self::AddToRegister(x, raw.nn()),
            0x8 => match raw.n() {
                0x0 => Self::CopyRegister(x, y),
                0x1 => Self::Or(x, y),
                0x2 => Self::And(x, y),
                0x3 => Self::XOr(x, y),
                0x4 => Self::Add(x, y),
                0x5 => Self::SubtractForward(x, y),
                0x6 => Self::RightShift(x, y),
                0x7 => Self::SubtractBackward(x, y),
                0xE => Self::LeftShift(x, y),
                _ => Self::Unknown(ins),
            },
            0x9 => Self::SkipNotEqualRegister(x, y),
            0xA => Self::SetIndexRegister(raw.nnn()),
            0xB => Self::JumpWithOffset(raw.nnn()),
            0xC => Self::Random(x, raw.nn()),
            0xD => Self::Display(x, y, raw.n()),
            0xE => match raw.nn() {
                0x9E => Self::SkipIfPressed(x),
                0xA1 => Self::SkipIfNotPressed(x),
                _ => Self::Unknown(ins),
            },
            0xF => match raw.nn() {
                0x07 => Self::CopyDelayToRegister(x),
                0x0A => Self::GetKey(x),
                0x15 => Self::CopyRegisterToDelay(x),
                0x18 => Self::CopyRegisterToSound(x),
                0x1E => Self::AddToIndex(x),
                0x29 => Self::PointChar(x),
                0x33 => Self::ToDecimal(x),
                0x55 => Self::StoreRegisterToMemory(x),
                0x65 => Self::LoadRegisterFromMemory(x),
                _ => Self::Unknown(ins),
            },
            _ => unreachable!("a nibble has sixteen values"),
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ClearScreen => write!(f, "CLS"),
            Self::Return => write!(f, "RET"),
            Self::Jump(addr) => write!(f, "JP {addr:#05x}"),
            Self::Call(addr) => write!(f, "CALL {addr:#05x}"),
            Self::SkipEqualConstant(x, nn) => write!(f, "SE V{x:X}, {nn:#04x}"),
            Self::SkipNotEqualConstant(x, nn) => write!(f, "SNE V{x:X}, {nn:#04x}"),
            Self::SkipEqualRegister(x, y) => write!(f, "SE V{x:X}, V{y:X}"),
            Self::SkipNotEqualRegister(x, y) => write!(f, "SNE V{x:X}, V{y:X}"),
            Self::SetRegister(x, nn) => write!(f, "LD V{x:X}, {nn:#04x}"),
            Self::AddToRegister(x, nn) => write!(f, "ADD V{x:X}, {nn:#04x}"),
            Self::CopyRegister(x, y) => write!(f, "LD V{x:X}, V{y:X}"),
            Self::Or(x, y) => write!(f, "OR V{x:X}, V{y:X}"),
            Self::And(x, y) => write!(f, "AND V{x:X}, V{y:X}"),
            Self::XOr(x, y) => write!(f, "XOR V{x:X}, V{y:X}"),
            Self::Add(x, y) => write!(f, "ADD V{x:X}, V{y:X}"),
            Self::SubtractForward(x, y) => write!(f, "SUB V{x:X}, V{y:X}"),
            Self::RightShift(x, _) => write!(f, "SHR V{x:X}"),
            Self::SubtractBackward(x, y) => write!(f, "SUBN V{x:X}, V{y:X}"),
            Self::LeftShift(x, _) => write!(f, "SHL V{x:X}"),
            Self::SetIndexRegister(addr) => write!(f, "LD I, {addr:#05x}"),
            Self::JumpWithOffset(addr) => write!(f, "JP V0, {addr:#05x}"),
            Self::Random(x, nn) => write!(f, "RND V{x:X}, {nn:#04x}"),
            Self::Display(x, y, n) => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            Self::SkipIfPressed(x) => write!(f, "SKP V{x:X}"),
            Self::SkipIfNotPressed(x) => write!(f, "SKNP V{x:X}"),
            Self::CopyDelayToRegister(x) => write!(f, "LD V{x:X}, DT"),
            Self::GetKey(x) => write!(f, "LD V{x:X}, K"),
            Self::CopyRegisterToDelay(x) => write!(f, "LD DT, V{x:X}"),
            Self::CopyRegisterToSound(x) => write!(f, "LD ST, V{x:X}"),
            Self::AddToIndex(x) => write!(f, "ADD I, V{x:X}"),
            Self::PointChar(x) => write!(f, "LD F, V{x:X}"),
            Self::ToDecimal(x) => write!(f, "LD B, V{x:X}"),
            Self::StoreRegisterToMemory(x) => write!(f, "LD [I], V{x:X}"),
            Self::LoadRegisterFromMemory(x) => write!(f, "LD V{x:X}, [I]"),
            Self::Unknown(code) => write!(f, "??? {code:#06x}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_manip() {
        assert_eq!(RawInstruction::new(0x4CEE).nibbles(2, 1), 0xC);
        assert_eq!(RawInstruction::new(0x4CEE).nibbles(3, 1), 0xE);
        assert_eq!(RawInstruction::new(0x4CEE).nibbles(1, 1), 0x4);

        assert_eq!(RawInstruction::new(0x4CEE).nibbles(1, 2), 0x4C);
        assert_eq!(RawInstruction::new(0x4CEE).nibbles(2, 2), 0xCE);
        assert_eq!(RawInstruction::new(0x4CEE).nibbles(2, 3), 0xCEE);
        assert_eq!(RawInstruction::new(0x4CEE).nibbles(1, 4), 0x4CEE);
    }

    #[test]
    fn operand_fields() {
        let raw = RawInstruction::new(0xD12F);
        assert_eq!(raw.family(), 0xD);
        assert_eq!(raw.x(), 0x1);
        assert_eq!(raw.y(), 0x2);
        assert_eq!(raw.n(), 0xF);
        assert_eq!(raw.nn(), 0x2F);
        assert_eq!(raw.nnn(), 0x12F);
        assert!(raw == 0xD12F);
    }

    #[test]
    fn decodes_every_family() {
        let table = [
            (0x00E0, OpCode::ClearScreen),
            (0x00EE, OpCode::Return),
            (0x1ABC, OpCode::Jump(0xABC)),
            (0x2ABC, OpCode::Call(0xABC)),
            (0x3A12, OpCode::SkipEqualConstant(0xA, 0x12)),
            (0x4A12, OpCode::SkipNotEqualConstant(0xA, 0x12)),
            (0x5AB0, OpCode::SkipEqualRegister(0xA, 0xB)),
            (0x6A12, OpCode::SetRegister(0xA, 0x12)),
            (0x7A12, OpCode::AddToRegister(0xA, 0x12)),
            (0x8AB0, OpCode::CopyRegister(0xA, 0xB)),
            (0x8AB1, OpCode::Or(0xA, 0xB)),
            (0x8AB2, OpCode::And(0xA, 0xB)),
            (0x8AB3, OpCode::XOr(0xA, 0xB)),
            (0x8AB4, OpCode::Add(0xA, 0xB)),
            (0x8AB5, OpCode::SubtractForward(0xA, 0xB)),
            (0x8AB6, OpCode::RightShift(0xA, 0xB)),
            (0x8AB7, OpCode::SubtractBackward(0xA, 0xB)),
            (0x8ABE, OpCode::LeftShift(0xA, 0xB)),
            (0x9AB0, OpCode::SkipNotEqualRegister(0xA, 0xB)),
            (0xA123, OpCode::SetIndexRegister(0x123)),
            (0xB123, OpCode::JumpWithOffset(0x123)),
            (0xCA0F, OpCode::Random(0xA, 0x0F)),
            (0xDAB5, OpCode::Display(0xA, 0xB, 5)),
            (0xEA9E, OpCode::SkipIfPressed(0xA)),
            (0xEAA1, OpCode::SkipIfNotPressed(0xA)),
            (0xFA07, OpCode::CopyDelayToRegister(0xA)),
            (0xFA0A, OpCode::GetKey(0xA)),
            (0xFA15, OpCode::CopyRegisterToDelay(0xA)),
            (0xFA18, OpCode::CopyRegisterToSound(0xA)),
            (0xFA1E, OpCode::AddToIndex(0xA)),
            (0xFA29, OpCode::PointChar(0xA)),
            (0xFA33, OpCode::ToDecimal(0xA)),
            (0xFA55, OpCode::StoreRegisterToMemory(0xA)),
            (0xFA65, OpCode::LoadRegisterFromMemory(0xA)),
        ];
        for (code, expected) in table {
            assert_eq!(OpCode::decode(code), expected, "decoding {code:#06x}");
        }
    }

    #[test]
    fn unmatched_secondary_codes_are_unknown() {
        for code in [0x0000, 0x0123, 0x00E1, 0x8AB8, 0x8ABF, 0xEA00, 0xEA9F, 0xFA00, 0xFAFF] {
            assert_eq!(OpCode::decode(code), OpCode::Unknown(code));
        }
    }

    #[test]
    fn low_nibble_ignored_for_register_skips() {
        assert_eq!(OpCode::decode(0x5AB3), OpCode::SkipEqualRegister(0xA, 0xB));
        assert_eq!(OpCode::decode(0x9ABF), OpCode::SkipNotEqualRegister(0xA, 0xB));
    }

    #[test]
    fn mnemonics() {
        assert_eq!(OpCode::decode(0x6005).to_string(), "LD V0, 0x05");
        assert_eq!(OpCode::decode(0x70FE).to_string(), "ADD V0, 0xfe");
        assert_eq!(OpCode::decode(0xD125).to_string(), "DRW V1, V2, 5");
        assert_eq!(OpCode::decode(0x2300).to_string(), "CALL 0x300");
        assert_eq!(OpCode::decode(0x0123).to_string(), "??? 0x0123");
    }
}
