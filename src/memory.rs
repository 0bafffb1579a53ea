use log::debug;

use crate::error::{Error, Result};
use crate::registers::{IndexRegister, ProgramCounter};

pub type TypeAddr = u16; // in reality u12
type FontBytes = [u8; FONT_GLYPH_BYTES * 16];

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const FONT_START: TypeAddr = 0x50;
pub const FONT_GLYPH_BYTES: usize = 5;
pub const STACK_DEPTH: usize = 16;

const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Address of the glyph for hex digit `digit`. Not masked: values above 0xF
/// point past the font table, as the interpreter has always done.
pub fn font_address(digit: u8) -> TypeAddr {
    FONT_START + digit as TypeAddr * FONT_GLYPH_BYTES as TypeAddr
}

pub struct Memory {
    // 4k bytes
    // font data stored from 050 -> 09F (000 -> 04F is empty by convention)
    bytes: Box<[u8; MEMORY_SIZE]>,
    pub pc: ProgramCounter,
    pub index: IndexRegister,
    pub stack: Stack,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        let mut mem = Self {
            bytes: Box::new([0; MEMORY_SIZE]),
            pc: ProgramCounter(PROGRAM_START),
            index: IndexRegister(0),
            stack: Stack::new(),
        };
        mem.install_font();
        mem
    }

    /// Zero RAM, the stack and both address registers, then put the font back.
    pub fn reset(&mut self) {
        self.bytes.fill(0);
        self.pc = ProgramCounter(PROGRAM_START);
        self.index = IndexRegister(0);
        self.stack.reset();
        self.install_font();
    }

    fn install_font(&mut self) {
        let start = FONT_START as usize;
        self.bytes[start..start + DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);
    }

    pub fn set(&mut self, addr: TypeAddr, val: u8) {
        self.bytes[addr as usize % MEMORY_SIZE] = val;
    }

    pub fn get(&self, addr: TypeAddr) -> u8 {
        self.bytes[addr as usize % MEMORY_SIZE]
    }

    /// Big-endian word at `addr`, both halves wrapped into RAM.
    pub fn fetch(&self, addr: TypeAddr) -> u16 {
        let (hi, lo) = (self.get(addr), self.get(addr.wrapping_add(1)));
        u16::from_be_bytes([hi, lo])
    }

    pub fn current_instruction(&self) -> u16 {
        self.fetch(self.pc.0)
    }

    /// Copy a program to 0x200 and point the PC at it. Oversized programs are
    /// rejected before anything is written.
    pub fn load_program(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > MAX_PROGRAM_SIZE {
            return Err(Error::ProgramTooLarge {
                size: bytes.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.bytes[start..start + bytes.len()].copy_from_slice(bytes);
        self.pc = ProgramCounter(PROGRAM_START);
        debug!("loaded {} byte program at {:#05x}", bytes.len(), start);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    addresses: [TypeAddr; STACK_DEPTH],
    pointer: usize,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: [0; STACK_DEPTH],
            pointer: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// `pc` is only used to describe the failure.
    pub fn push(&mut self, addr: TypeAddr, pc: TypeAddr) -> Result<()> {
        if self.pointer >= STACK_DEPTH {
            return Err(Error::StackOverflow { pc });
        }
        self.addresses[self.pointer] = addr;
        self.pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self, pc: TypeAddr) -> Result<TypeAddr> {
        if self.pointer == 0 {
            return Err(Error::StackUnderflow { pc });
        }
        self.pointer -= 1;
        Ok(self.addresses[self.pointer])
    }

    pub fn depth(&self) -> usize {
        self.pointer
    }

    /// Return addresses currently pushed, oldest first.
    pub fn frames(&self) -> &[TypeAddr] {
        &self.addresses[..self.pointer]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_is_installed() {
        let mem = Memory::new();
        assert_eq!(mem.get(FONT_START), 0xF0);
        assert_eq!(mem.get(font_address(0x1)), 0x20);
        assert_eq!(mem.get(font_address(0xF) + 4), 0x80);
        assert!(mem.as_slice()[PROGRAM_START as usize..].iter().all(|&b| b == 0));
    }

    #[test]
    fn addresses_wrap() {
        let mut mem = Memory::new();
        mem.set(0x1000 + 0x300, 0xAB);
        assert_eq!(mem.get(0x300), 0xAB);
        mem.set(0x0FFF, 0x12);
        mem.set(0x0000, 0x34);
        assert_eq!(mem.fetch(0x0FFF), 0x1234);
    }

    #[test]
    fn fetch_is_big_endian() {
        let mut mem = Memory::new();
        mem.load_program(&[0x60, 0x05]).unwrap();
        assert_eq!(mem.current_instruction(), 0x6005);
    }

    #[test]
    fn load_rejects_oversized_program() {
        let mut mem = Memory::new();
        mem.set(PROGRAM_START, 0x77);
        let rom = vec![0xAA; MAX_PROGRAM_SIZE + 1];
        assert_eq!(
            mem.load_program(&rom),
            Err(Error::ProgramTooLarge {
                size: MAX_PROGRAM_SIZE + 1,
                max: MAX_PROGRAM_SIZE
            })
        );
        assert_eq!(mem.get(PROGRAM_START), 0x77);
    }

    #[test]
    fn load_accepts_program_filling_memory() {
        let mut mem = Memory::new();
        let rom = vec![0xAA; MAX_PROGRAM_SIZE];
        mem.load_program(&rom).unwrap();
        assert_eq!(mem.get(0x0FFF), 0xAA);
    }

    #[test]
    fn reset_restores_font_and_clears_ram() {
        let mut mem = Memory::new();
        mem.set(FONT_START, 0);
        mem.set(0x400, 9);
        mem.index.set(0x123);
        mem.stack.push(0x202, 0x200).unwrap();
        mem.reset();
        assert_eq!(mem.get(FONT_START), 0xF0);
        assert_eq!(mem.get(0x400), 0);
        assert_eq!(mem.index.0, 0);
        assert_eq!(mem.stack.depth(), 0);
    }

    #[test]
    fn stack_overflow_keeps_entries() {
        let mut stack = Stack::new();
        for i in 0..STACK_DEPTH as u16 {
            stack.push(0x300 + i * 2, 0).unwrap();
        }
        assert_eq!(
            stack.push(0xFFF, 0x222),
            Err(Error::StackOverflow { pc: 0x222 })
        );
        assert_eq!(stack.depth(), STACK_DEPTH);
        assert_eq!(stack.frames()[STACK_DEPTH - 1], 0x300 + 15 * 2);
        assert_eq!(stack.pop(0).unwrap(), 0x300 + 15 * 2);
    }

    #[test]
    fn stack_underflow() {
        let mut stack = Stack::new();
        assert_eq!(stack.pop(0x204), Err(Error::StackUnderflow { pc: 0x204 }));
        assert_eq!(stack.depth(), 0);
    }
}
