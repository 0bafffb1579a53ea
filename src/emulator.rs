use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{
    config::Config,
    decode::OpCode,
    display::{FrameBuffer, HEIGHT, WIDTH},
    error::Result,
    keyboard::Keypad,
    memory::{font_address, Memory, TypeAddr},
    registers::Registers,
    timer::TimerClock,
};

/// Whether the machine is executing or parked on FX0A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// PC still points at the FX0A; the key index goes into `register`.
    AwaitingKey { register: u8 },
}

/// What the PC does once a handler is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    Skip,
    Goto(TypeAddr),
    Wait,
}

impl Flow {
    fn skip_if(condition: bool) -> Self {
        if condition {
            Self::Skip
        } else {
            Self::Next
        }
    }
}

pub struct Emulator {
    pub regs: Registers,
    pub mem: Memory,
    fb: FrameBuffer,
    keypad: Keypad,
    timers: TimerClock,
    rng: StdRng,
    state: RunState,
    config: Config,
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Emulator {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::build(config, StdRng::from_entropy())
    }

    /// Same as `new` but with a reproducible random source for CXNN.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(Config::default(), StdRng::seed_from_u64(seed))
    }

    fn build(config: Config, rng: StdRng) -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            fb: FrameBuffer::new(),
            keypad: Keypad::new(),
            timers: TimerClock::new(),
            rng,
            state: RunState::Running,
            config,
        }
    }

    /// Zero every register, RAM, the stack, timers, keys and the screen,
    /// reinstall the font and point the PC at the program area.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.mem.reset();
        self.fb.clear();
        self.keypad.reset();
        self.timers.reset();
        self.state = RunState::Running;
        debug!("machine reset");
    }

    /// Install a program at 0x200 and restart from there.
    ///
    /// Registers, timers, the call stack, keys and the screen carry over from
    /// whatever ran before; call [`Emulator::reset`] first for a clean machine.
    /// Programs larger than the space above 0x200 are rejected untouched.
    pub fn load(&mut self, program: &[u8]) -> Result<()> {
        self.mem.load_program(program)?;
        self.state = RunState::Running;
        Ok(())
    }

    /// Run one batch of instructions, then let `delta_ms` of wall-clock time
    /// act on the timers.
    pub fn step(&mut self, delta_ms: f64) {
        for _ in 0..self.config.cycles_per_step {
            self.cycle();
        }
        self.timers.advance(delta_ms);
    }

    /// One dispatch. Returns the instruction that completed, or `None` while
    /// parked waiting for a key.
    pub fn cycle(&mut self) -> Option<OpCode> {
        if let RunState::AwaitingKey { register } = self.state {
            let key = self.keypad.first_pressed()?;
            self.regs.set(register, key);
            self.mem.pc.advance();
            self.state = RunState::Running;
            trace!("key {key:X} released FX0A into V{register:X}");
            return Some(OpCode::GetKey(register));
        }

        let addr = self.mem.pc.0;
        let operation = self.fetch_decode();
        trace!("{addr:#05x}: {operation}");
        match self.execute_ins(operation) {
            Flow::Next => self.mem.pc.advance(),
            Flow::Skip => self.mem.pc.skip(),
            Flow::Goto(target) => self.mem.pc.jump(target),
            Flow::Wait => return None,
        }
        Some(operation)
    }

    pub fn fetch_decode(&self) -> OpCode {
        OpCode::decode(self.mem.current_instruction())
    }

    fn execute_ins(&mut self, ins: OpCode) -> Flow {
        let pc = self.mem.pc.0;
        match ins {
            OpCode::ClearScreen => self.fb.clear(),
            OpCode::Return => match self.mem.stack.pop(pc) {
                Ok(addr) => return Flow::Goto(addr),
                Err(err) => warn!("{err}, skipping RET"),
            },
            OpCode::Jump(addr) => return Flow::Goto(addr),
            OpCode::Call(addr) => match self.mem.stack.push(self.mem.pc.next(), pc) {
                Ok(()) => return Flow::Goto(addr),
                Err(err) => warn!("{err}, skipping CALL {addr:#05x}"),
            },
            OpCode::SkipEqualConstant(vx, nn) => return Flow::skip_if(self.regs.get(vx) == nn),
            OpCode::SkipNotEqualConstant(vx, nn) => {
                return Flow::skip_if(self.regs.get(vx) != nn)
            }
            OpCode::SkipEqualRegister(vx, vy) => {
                return Flow::skip_if(self.regs.get(vx) == self.regs.get(vy))
            }
            OpCode::SkipNotEqualRegister(vx, vy) => {
                return Flow::skip_if(self.regs.get(vx) != self.regs.get(vy))
            }
            OpCode::SetRegister(vx, nn) => self.regs.set(vx, nn),
            OpCode::AddToRegister(vx, nn) => self.regs.add_immediate(vx, nn),
            OpCode::CopyRegister(vx, vy) => self.regs.set(vx, self.regs.get(vy)),
            OpCode::Or(vx, vy) => self.regs.set(vx, self.regs.get(vx) | self.regs.get(vy)),
            OpCode::And(vx, vy) => self.regs.set(vx, self.regs.get(vx) & self.regs.get(vy)),
            OpCode::XOr(vx, vy) => self.regs.set(vx, self.regs.get(vx) ^ self.regs.get(vy)),
            // flag first, result second: when VX is VF the result wins
            OpCode::Add(vx, vy) => {
                let (sum, carry) = self.regs.get(vx).overflowing_add(self.regs.get(vy));
                self.regs.set_flag(carry);
                self.regs.set(vx, sum);
            }
            OpCode::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_flag(x > y);
                self.regs.set(vx, x.wrapping_sub(y));
            }
            OpCode::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_flag(y > x);
                self.regs.set(vx, y.wrapping_sub(x));
            }
            OpCode::RightShift(vx, _) => {
                let value = self.regs.get(vx);
                self.regs.set_flag(value & 1 == 1);
                self.regs.set(vx, value >> 1);
            }
            OpCode::LeftShift(vx, _) => {
                let value = self.regs.get(vx);
                self.regs.set_flag(value & 0x80 != 0);
                self.regs.set(vx, value << 1);
            }
            OpCode::SetIndexRegister(addr) => self.mem.index.set(addr),
            OpCode::JumpWithOffset(addr) => {
                return Flow::Goto(addr.wrapping_add(self.regs.get(0) as TypeAddr))
            }
            OpCode::Random(vx, nn) => {
                let byte: u8 = self.rng.gen();
                self.regs.set(vx, byte & nn);
            }
            OpCode::Display(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                let start = self.mem.index.0;
                let sprite: Vec<u8> = (0..height as TypeAddr)
                    .map(|row| self.mem.get(start.wrapping_add(row)))
                    .collect();
                let collision = self.fb.draw(x, y, &sprite);
                self.regs.set_flag(collision);
            }
            OpCode::SkipIfPressed(vx) => {
                return Flow::skip_if(self.keypad.is_pressed(self.regs.get(vx)))
            }
            OpCode::SkipIfNotPressed(vx) => {
                return Flow::skip_if(!self.keypad.is_pressed(self.regs.get(vx)))
            }
            OpCode::CopyDelayToRegister(vx) => self.regs.set(vx, self.timers.delay.get()),
            OpCode::CopyRegisterToDelay(vx) => self.timers.delay.set(self.regs.get(vx)),
            OpCode::CopyRegisterToSound(vx) => self.timers.sound.set(self.regs.get(vx)),
            OpCode::GetKey(vx) => match self.keypad.first_pressed() {
                Some(key) => self.regs.set(vx, key),
                None => {
                    self.state = RunState::AwaitingKey { register: vx };
                    return Flow::Wait;
                }
            },
            OpCode::AddToIndex(vx) => self.mem.index.add(self.regs.get(vx)),
            OpCode::PointChar(vx) => self.mem.index.set(font_address(self.regs.get(vx))),
            OpCode::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let i = self.mem.index.0;
                self.mem.set(i, value / 100);
                self.mem.set(i.wrapping_add(1), (value / 10) % 10);
                self.mem.set(i.wrapping_add(2), value % 10);
            }
            OpCode::StoreRegisterToMemory(vx) => {
                let i = self.mem.index.0;
                for reg in 0..=vx {
                    self.mem.set(i.wrapping_add(reg as TypeAddr), self.regs.get(reg));
                }
            }
            OpCode::LoadRegisterFromMemory(vx) => {
                let i = self.mem.index.0;
                for reg in 0..=vx {
                    self.regs.set(reg, self.mem.get(i.wrapping_add(reg as TypeAddr)));
                }
            }
            OpCode::Unknown(code) => warn!("unsupported opcode {code:#06x} at {pc:#05x}"),
        }
        Flow::Next
    }

    /// Record a key transition from the host. Indices past 0xF are ignored.
    pub fn set_key(&mut self, index: usize, pressed: bool) {
        self.keypad.set(index, pressed);
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound.get()
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay.get()
    }

    /// The host should be making noise while this is true.
    pub fn is_sound_active(&self) -> bool {
        self.sound_timer() > 0
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    pub fn is_awaiting_key(&self) -> bool {
        matches!(self.state, RunState::AwaitingKey { .. })
    }

    pub fn pc(&self) -> TypeAddr {
        self.mem.pc.0
    }

    pub fn index(&self) -> TypeAddr {
        self.mem.index.0
    }

    pub fn register(&self, reg_num: u8) -> u8 {
        self.regs.get(reg_num)
    }

    pub fn stack_depth(&self) -> usize {
        self.mem.stack.depth()
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn width(&self) -> usize {
        WIDTH
    }

    pub fn height(&self) -> usize {
        HEIGHT
    }
}
