use crate::memory::TypeAddr;

pub const REGISTER_COUNT: usize = 16;
/// VF doubles as the carry / borrow / collision output.
pub const FLAG_REGISTER: u8 = 0xF;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registers {
    registers: [u8; REGISTER_COUNT],
}

impl Registers {
    pub fn new() -> Self {
        Self {
            registers: [0; REGISTER_COUNT],
        }
    }

    pub fn reset(&mut self) {
        self.registers = [0; REGISTER_COUNT];
    }

    pub fn set(&mut self, reg_num: u8, value: u8) {
        self.registers[(reg_num & 0xF) as usize] = value;
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[(reg_num & 0xF) as usize]
    }

    // 7XNN never touches VF
    pub fn add_immediate(&mut self, reg_num: u8, value: u8) {
        let total = self.get(reg_num).wrapping_add(value);
        self.set(reg_num, total);
    }

    pub fn set_flag(&mut self, on: bool) {
        self.set(FLAG_REGISTER, on as u8);
    }

    pub fn flag(&self) -> u8 {
        self.get(FLAG_REGISTER)
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    /// Move past the current two-byte instruction.
    pub fn advance(&mut self) {
        self.0 = self.0.wrapping_add(2);
    }

    /// Move past the current instruction and the one after it.
    pub fn skip(&mut self) {
        self.0 = self.0.wrapping_add(4);
    }

    pub fn jump(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }

    /// Address of the instruction following the current one.
    pub fn next(&self) -> TypeAddr {
        self.0.wrapping_add(2)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }

    pub fn add(&mut self, value: u8) {
        self.0 = self.0.wrapping_add(value as u16);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_immediate_wraps_without_flag() {
        let mut regs = Registers::new();
        regs.set(3, 0xFF);
        regs.add_immediate(3, 2);
        assert_eq!(regs.get(3), 1);
        assert_eq!(regs.flag(), 0);
    }

    #[test]
    fn register_index_is_masked() {
        let mut regs = Registers::new();
        regs.set(0x12, 7);
        assert_eq!(regs.get(0x2), 7);
    }

    #[test]
    fn index_add_wraps_at_sixteen_bits() {
        let mut index = IndexRegister(0xFFFF);
        index.add(2);
        assert_eq!(index.0, 1);
    }

    #[test]
    fn program_counter_moves() {
        let mut pc = ProgramCounter(0x200);
        pc.advance();
        assert_eq!(pc.0, 0x202);
        pc.skip();
        assert_eq!(pc.0, 0x206);
        assert_eq!(pc.next(), 0x208);
        pc.jump(0x300);
        assert_eq!(pc.0, 0x300);
    }
}
