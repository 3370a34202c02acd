//! CHIP-8 CPU

use std::fmt;

use super::drivers::{RandDriver, RandomInterface};
use super::errors::EmulationError;
use super::font::{Font, FONT_CHAR_HEIGHT, FONT_DATA_ADDR};
use super::memory::PROGRAM_START_ADDRESS;
use super::opcodes::OpCode;
use super::peripherals::Peripherals;
use super::registers::Registers;
use super::stack::Stack;
use super::timer::Timer;
use super::types::{C8Addr, C8Byte};

/// Compatibility quirks.
///
/// Defaults match the behavior most modern ROMs expect; each toggle restores
/// the corresponding COSMAC VIP era convention.
#[derive(Clone, Copy, Debug, Default)]
pub struct Quirks {
    /// 8XY6/8XYE shift a copy of Vy instead of Vx in place.
    pub shift_uses_vy: bool,
    /// FX55/FX65 leave I incremented by x + 1.
    pub load_increments_i: bool,
    /// FX1E sets VF when I + Vx crosses 0xFFF.
    pub index_add_sets_vf: bool,
}

/// CHIP-8 CPU struct
pub struct CPU {
    /// Peripherals
    pub peripherals: Peripherals,

    /// Registers
    pub registers: Registers,
    /// Stack
    pub stack: Stack,

    /// Delay timer
    pub delay_timer: Timer,
    /// Sound timer
    pub sound_timer: Timer,

    /// Font
    pub font: Font,
    /// Quirks
    pub quirks: Quirks,
    /// Instruction count
    pub instruction_count: usize,

    random: Box<dyn RandomInterface>,
}

impl CPU {
    /// Create CHIP-8 CPU
    pub fn new() -> Self {
        CPU {
            peripherals: Peripherals::new(),

            registers: Registers::new(),
            stack: Stack::new(),

            delay_timer: Timer::new("Delay".to_string()),
            sound_timer: Timer::new("Sound".to_string()),

            font: Font::new_system_font(),
            quirks: Quirks::default(),
            instruction_count: 0,

            random: Box::new(RandDriver::new()),
        }
    }

    /// Set random driver.
    pub fn set_random_driver(&mut self, driver: Box<dyn RandomInterface>) {
        self.random = driver;
    }

    /// Load font in memory
    pub fn load_font_in_memory(&mut self) -> Result<(), EmulationError> {
        self.peripherals
            .memory
            .write_data(FONT_DATA_ADDR as usize, self.font.get_data())
    }

    /// Load program data in memory
    ///
    /// # Arguments
    ///
    /// * `data` - Program bytes
    ///
    pub fn load_program_data(&mut self, data: &[C8Byte]) -> Result<(), EmulationError> {
        self.peripherals
            .memory
            .write_data(PROGRAM_START_ADDRESS as usize, data)
    }

    /// Decrement timers
    pub fn decrement_timers(&mut self) {
        self.delay_timer.decrement();
        self.sound_timer.decrement();
    }

    /// Execute instruction
    ///
    /// The program counter has already been advanced past the instruction;
    /// control flow opcodes overwrite it, skip opcodes advance it once more.
    ///
    /// # Arguments
    ///
    /// * `opcode` - Decoded instruction
    ///
    pub fn execute_instruction(&mut self, opcode: &OpCode) -> Result<(), EmulationError> {
        match *opcode {
            OpCode::SYS(_addr) => {
                // Legacy host call, ignored
            }
            OpCode::CLS => {
                self.peripherals.screen.clear_screen();
            }
            OpCode::RET => {
                let addr = self.stack.pop()?;
                self.registers.set_pc(addr);
            }
            OpCode::JP(addr) => {
                self.registers.set_pc(addr);
            }
            OpCode::CALL(addr) => {
                // The stored address is the instruction after the call
                self.stack.push(self.registers.get_pc())?;
                self.registers.set_pc(addr);
            }
            OpCode::SEByte(reg, byte) => {
                if self.registers.get_register(reg) == byte {
                    self.registers.advance_pc();
                }
            }
            OpCode::SNEByte(reg, byte) => {
                if self.registers.get_register(reg) != byte {
                    self.registers.advance_pc();
                }
            }
            OpCode::SE(reg1, reg2) => {
                if self.registers.get_register(reg1) == self.registers.get_register(reg2) {
                    self.registers.advance_pc();
                }
            }
            OpCode::LDByte(reg, byte) => {
                self.registers.set_register(reg, byte);
            }
            OpCode::ADDByte(reg, byte) => {
                // Carry flag is untouched
                let r = self.registers.get_register(reg);
                self.registers.set_register(reg, r.wrapping_add(byte));
            }
            OpCode::LD(reg1, reg2) => {
                let r = self.registers.get_register(reg2);
                self.registers.set_register(reg1, r);
            }
            OpCode::OR(reg1, reg2) => {
                let r1 = self.registers.get_register(reg1);
                let r2 = self.registers.get_register(reg2);

                self.registers.set_register(reg1, r1 | r2);
            }
            OpCode::AND(reg1, reg2) => {
                let r1 = self.registers.get_register(reg1);
                let r2 = self.registers.get_register(reg2);

                self.registers.set_register(reg1, r1 & r2);
            }
            OpCode::XOR(reg1, reg2) => {
                let r1 = self.registers.get_register(reg1);
                let r2 = self.registers.get_register(reg2);

                self.registers.set_register(reg1, r1 ^ r2);
            }
            OpCode::ADD(reg1, reg2) => {
                let r1 = self.registers.get_register(reg1);
                let r2 = self.registers.get_register(reg2);
                let (res, overflow) = r1.overflowing_add(r2);

                self.registers.set_carry_register(overflow as C8Byte);
                self.registers.set_register(reg1, res);
            }
            OpCode::SUB(reg1, reg2) => {
                let r1 = self.registers.get_register(reg1);
                let r2 = self.registers.get_register(reg2);

                self.registers.set_carry_register((r1 >= r2) as C8Byte);
                self.registers.set_register(reg1, r1.wrapping_sub(r2));
            }
            OpCode::SHR(reg1, reg2) => {
                let r = if self.quirks.shift_uses_vy {
                    self.registers.get_register(reg2)
                } else {
                    self.registers.get_register(reg1)
                };

                self.registers.set_carry_register(r & 1);
                self.registers.set_register(reg1, r >> 1);
            }
            OpCode::SUBN(reg1, reg2) => {
                let r1 = self.registers.get_register(reg1);
                let r2 = self.registers.get_register(reg2);

                self.registers.set_carry_register((r2 >= r1) as C8Byte);
                self.registers.set_register(reg1, r2.wrapping_sub(r1));
            }
            OpCode::SHL(reg1, reg2) => {
                let r = if self.quirks.shift_uses_vy {
                    self.registers.get_register(reg2)
                } else {
                    self.registers.get_register(reg1)
                };

                self.registers.set_carry_register((r >> 7) & 1);
                self.registers.set_register(reg1, r << 1);
            }
            OpCode::SNE(reg1, reg2) => {
                if self.registers.get_register(reg1) != self.registers.get_register(reg2) {
                    self.registers.advance_pc();
                }
            }
            OpCode::LDI(addr) => {
                self.registers.set_i_register(addr);
            }
            OpCode::JP0(addr) => {
                let v0 = self.registers.get_register(0);
                self.registers.set_pc(addr.wrapping_add(C8Addr::from(v0)));
            }
            OpCode::RND(reg, byte) => {
                let value = self.random.random_byte() & byte;
                self.registers.set_register(reg, value);
            }
            OpCode::DRW(reg1, reg2, byte) => {
                let x = self.registers.get_register(reg1);
                let y = self.registers.get_register(reg2);
                let i = self.registers.get_i_register();

                let sprite = self
                    .peripherals
                    .memory
                    .read_data(i as usize, byte as usize)?;
                let collision = self.peripherals.screen.draw_sprite(x, y, sprite);

                self.registers.set_carry_register(collision as C8Byte);
            }
            OpCode::SKP(reg) => {
                let key = self.registers.get_register(reg) & 0x0F;

                if self.peripherals.input.get(key) == 1 {
                    self.registers.advance_pc();
                }
            }
            OpCode::SKNP(reg) => {
                let key = self.registers.get_register(reg) & 0x0F;

                if self.peripherals.input.get(key) == 0 {
                    self.registers.advance_pc();
                }
            }
            OpCode::LDGetDelayTimer(reg) => {
                let dt = self.delay_timer.get_value();
                self.registers.set_register(reg, dt);
            }
            OpCode::LDGetKey(reg) => {
                // Arm the key wait; the driver resumes once a key arrives
                self.peripherals.input.wait_for_input(reg);
            }
            OpCode::LDSetDelayTimer(reg) => {
                let r = self.registers.get_register(reg);
                self.delay_timer.reset(r);
            }
            OpCode::LDSetSoundTimer(reg) => {
                let r = self.registers.get_register(reg);
                self.sound_timer.reset(r);
            }
            OpCode::ADDI(reg) => {
                let i = self.registers.get_i_register();
                let r = C8Addr::from(self.registers.get_register(reg));
                let res = i.wrapping_add(r);

                if self.quirks.index_add_sets_vf {
                    self.registers
                        .set_carry_register((u32::from(i) + u32::from(r) > 0xFFF) as C8Byte);
                }

                self.registers.set_i_register(res);
            }
            OpCode::LDSprite(reg) => {
                let digit = C8Addr::from(self.registers.get_register(reg) & 0x0F);
                let sprite_addr = FONT_DATA_ADDR + (FONT_CHAR_HEIGHT as C8Addr * digit);

                self.registers.set_i_register(sprite_addr);
            }
            OpCode::LDBCD(reg) => {
                let r = self.registers.get_register(reg);
                let i = self.registers.get_i_register();

                let digits = [r / 100, (r % 100) / 10, r % 10];
                self.peripherals.memory.write_data(i as usize, &digits)?;
            }
            OpCode::LDS(reg) => {
                let i = self.registers.get_i_register() as usize;

                for ridx in 0..=reg {
                    let r = self.registers.get_register(ridx);
                    self.peripherals.memory.write_byte(i + ridx as usize, r)?;
                }

                if self.quirks.load_increments_i {
                    self.registers
                        .set_i_register((i + reg as usize + 1) as C8Addr);
                }
            }
            OpCode::LDR(reg) => {
                let i = self.registers.get_i_register() as usize;

                for ridx in 0..=reg {
                    let byte = self.peripherals.memory.read_byte(i + ridx as usize)?;
                    self.registers.set_register(ridx, byte);
                }

                if self.quirks.load_increments_i {
                    self.registers
                        .set_i_register((i + reg as usize + 1) as C8Addr);
                }
            }
        };

        Ok(())
    }
}

impl Default for CPU {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CPU {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CPU {{")?;

        writeln!(f, "  memory: {{")?;
        write!(f, "{:?}", self.peripherals.memory)?;
        writeln!(f, "  }},")?;

        writeln!(f, "  screen: {{")?;
        write!(f, "{:?}", self.peripherals.screen)?;
        writeln!(f, "  }},")?;

        writeln!(f, "  registers: {{")?;
        write!(f, "{:?}", self.registers)?;
        writeln!(f, "  }},")?;

        writeln!(f, "  stack: {{")?;
        write!(f, "{:?}", self.stack)?;
        writeln!(f, "  }},")?;

        writeln!(f, "  input: {{")?;
        write!(f, "{:?}", self.peripherals.input)?;
        writeln!(f, "  }},")?;

        writeln!(f, "  delay_timer: {:?},", self.delay_timer)?;
        writeln!(f, "  sound_timer: {:?}", self.sound_timer)?;

        writeln!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRandom(C8Byte);

    impl RandomInterface for FixedRandom {
        fn random_byte(&mut self) -> C8Byte {
            self.0
        }
    }

    #[test]
    fn test_add_with_carry() {
        let mut cpu = CPU::new();
        cpu.registers.set_register(0x0, 0xFF);
        cpu.registers.set_register(0x1, 0xFF);

        cpu.execute_instruction(&OpCode::ADD(0x0, 0x1)).unwrap();

        assert_eq!(cpu.registers.get_register(0x0), 0xFE);
        assert_eq!(cpu.registers.get_register(0xF), 1);
    }

    #[test]
    fn test_sub_with_borrow() {
        let mut cpu = CPU::new();
        cpu.registers.set_register(0x0, 10);
        cpu.registers.set_register(0x1, 11);

        cpu.execute_instruction(&OpCode::SUB(0x0, 0x1)).unwrap();

        assert_eq!(cpu.registers.get_register(0x0), 0xFF);
        assert_eq!(cpu.registers.get_register(0xF), 0);
    }

    #[test]
    fn test_sub_equal_sets_flag() {
        let mut cpu = CPU::new();
        cpu.registers.set_register(0x0, 10);
        cpu.registers.set_register(0x1, 10);

        cpu.execute_instruction(&OpCode::SUB(0x0, 0x1)).unwrap();

        assert_eq!(cpu.registers.get_register(0x0), 0);
        assert_eq!(cpu.registers.get_register(0xF), 1);
    }

    #[test]
    fn test_shift_right_in_place() {
        let mut cpu = CPU::new();
        cpu.registers.set_register(0x0, 0b0000_0101);
        cpu.registers.set_register(0x1, 0b1111_0000);

        cpu.execute_instruction(&OpCode::SHR(0x0, 0x1)).unwrap();

        assert_eq!(cpu.registers.get_register(0x0), 0b0000_0010);
        assert_eq!(cpu.registers.get_register(0xF), 1);
    }

    #[test]
    fn test_shift_right_quirk_uses_vy() {
        let mut cpu = CPU::new();
        cpu.quirks.shift_uses_vy = true;
        cpu.registers.set_register(0x0, 0b0000_0101);
        cpu.registers.set_register(0x1, 0b1111_0000);

        cpu.execute_instruction(&OpCode::SHR(0x0, 0x1)).unwrap();

        assert_eq!(cpu.registers.get_register(0x0), 0b0111_1000);
        assert_eq!(cpu.registers.get_register(0xF), 0);
    }

    #[test]
    fn test_shift_left_in_place() {
        let mut cpu = CPU::new();
        cpu.registers.set_register(0x2, 0b1100_0000);

        cpu.execute_instruction(&OpCode::SHL(0x2, 0x3)).unwrap();

        assert_eq!(cpu.registers.get_register(0x2), 0b1000_0000);
        assert_eq!(cpu.registers.get_register(0xF), 1);
    }

    #[test]
    fn test_add_byte_keeps_flag() {
        let mut cpu = CPU::new();
        cpu.registers.set_register(0x0, 0xFF);
        cpu.registers.set_carry_register(0);

        cpu.execute_instruction(&OpCode::ADDByte(0x0, 0x02)).unwrap();

        assert_eq!(cpu.registers.get_register(0x0), 0x01);
        assert_eq!(cpu.registers.get_register(0xF), 0);
    }

    #[test]
    fn test_random_masks_value() {
        let mut cpu = CPU::new();
        cpu.set_random_driver(Box::new(FixedRandom(0b1010_1010)));

        cpu.execute_instruction(&OpCode::RND(0x0, 0x0F)).unwrap();

        assert_eq!(cpu.registers.get_register(0x0), 0b0000_1010);
    }

    #[test]
    fn test_index_add_default_keeps_flag() {
        let mut cpu = CPU::new();
        cpu.registers.set_i_register(0xFFF);
        cpu.registers.set_register(0x0, 0x10);
        cpu.registers.set_carry_register(0);

        cpu.execute_instruction(&OpCode::ADDI(0x0)).unwrap();

        assert_eq!(cpu.registers.get_i_register(), 0x100F);
        assert_eq!(cpu.registers.get_register(0xF), 0);
    }

    #[test]
    fn test_index_add_quirk_sets_flag() {
        let mut cpu = CPU::new();
        cpu.quirks.index_add_sets_vf = true;
        cpu.registers.set_i_register(0xFFF);
        cpu.registers.set_register(0x0, 0x10);

        cpu.execute_instruction(&OpCode::ADDI(0x0)).unwrap();

        assert_eq!(cpu.registers.get_register(0xF), 1);
    }

    #[test]
    fn test_bcd() {
        let mut cpu = CPU::new();
        cpu.registers.set_register(0x2, 234);
        cpu.registers.set_i_register(0x400);

        cpu.execute_instruction(&OpCode::LDBCD(0x2)).unwrap();

        assert_eq!(cpu.peripherals.memory.read_byte(0x400).unwrap(), 2);
        assert_eq!(cpu.peripherals.memory.read_byte(0x401).unwrap(), 3);
        assert_eq!(cpu.peripherals.memory.read_byte(0x402).unwrap(), 4);
    }

    #[test]
    fn test_register_dump_load_roundtrip() {
        let mut cpu = CPU::new();
        for reg in 0..8 {
            cpu.registers.set_register(reg, 0x10 + reg);
        }
        cpu.registers.set_i_register(0x300);

        cpu.execute_instruction(&OpCode::LDS(0x7)).unwrap();
        assert_eq!(cpu.registers.get_i_register(), 0x300);

        for reg in 0..8 {
            cpu.registers.set_register(reg, 0);
        }

        cpu.execute_instruction(&OpCode::LDR(0x7)).unwrap();
        assert_eq!(cpu.registers.get_i_register(), 0x300);

        for reg in 0..8 {
            assert_eq!(cpu.registers.get_register(reg), 0x10 + reg);
        }
    }

    #[test]
    fn test_register_dump_quirk_increments_i() {
        let mut cpu = CPU::new();
        cpu.quirks.load_increments_i = true;
        cpu.registers.set_i_register(0x300);

        cpu.execute_instruction(&OpCode::LDS(0x3)).unwrap();

        assert_eq!(cpu.registers.get_i_register(), 0x304);
    }

    #[test]
    fn test_font_sprite_address() {
        let mut cpu = CPU::new();
        cpu.registers.set_register(0x0, 0x1A);

        cpu.execute_instruction(&OpCode::LDSprite(0x0)).unwrap();

        // Only the low nibble of the register selects the glyph.
        assert_eq!(
            cpu.registers.get_i_register(),
            FONT_DATA_ADDR + 0xA * FONT_CHAR_HEIGHT as C8Addr
        );
    }

    #[test]
    fn test_draw_out_of_memory_fails() {
        let mut cpu = CPU::new();
        cpu.registers.set_i_register(0xFFE);

        let result = cpu.execute_instruction(&OpCode::DRW(0x0, 0x1, 0x5));
        assert!(result.is_err());
    }
}
