//! CHIP-8 emulator
//!
//! Cycle driver over the CPU. One cycle ticks the timers, fetches the next
//! big-endian word at PC, advances PC, then decodes and executes. Every
//! fault is terminal: the driver parks in the faulted state and the machine
//! is meant to be discarded.

use super::cartridge::Cartridge;
use super::cpu::CPU;
use super::drivers::{ClockInterface, InputInterface};
use super::errors::EmulationError;
use super::opcodes::decode_opcode;

/// Default pacing, in milliseconds per cycle.
const DEFAULT_CYCLE_DELAY: u64 = 1;

/// Emulation state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmulationState {
    /// Created, no cartridge loaded
    Idle,
    /// Cartridge loaded, ready to run
    Ready,
    /// Executing cycles
    Running,
    /// Suspended until a key press arrives
    WaitingForKey,
    /// Exit requested; terminal
    Stopped,
    /// Emulation error; terminal
    Faulted,
}

/// CHIP-8 emulator
pub struct Emulator {
    /// CPU handle
    pub cpu: CPU,

    state: EmulationState,
    cycle_delay: u64,
}

impl Emulator {
    /// Create new CHIP-8 emulator
    pub fn new() -> Self {
        Emulator {
            cpu: CPU::new(),
            state: EmulationState::Idle,
            cycle_delay: DEFAULT_CYCLE_DELAY,
        }
    }

    /// Current driver state.
    pub fn state(&self) -> EmulationState {
        self.state
    }

    /// Set pacing in milliseconds per cycle.
    pub fn set_cycle_delay(&mut self, millis: u64) {
        self.cycle_delay = millis;
    }

    /// Pacing in milliseconds per cycle.
    pub fn cycle_delay(&self) -> u64 {
        self.cycle_delay
    }

    /// Load game
    ///
    /// Writes the font and the cartridge data into memory and readies the
    /// driver.
    ///
    /// # Arguments
    ///
    /// * `cartridge` - Cartridge
    ///
    pub fn load_game(&mut self, cartridge: &Cartridge) -> Result<(), EmulationError> {
        self.cpu.load_font_in_memory()?;
        self.cpu.load_program_data(cartridge.get_data())?;
        self.state = EmulationState::Ready;

        debug!("cartridge `{}` loaded", cartridge.get_title());
        Ok(())
    }

    /// Request a stop before the next fetch.
    pub fn stop(&mut self) {
        self.cpu.peripherals.input.request_close();
    }

    /// Step emulation
    ///
    /// Runs one cycle and returns the resulting driver state. Terminal
    /// states are sticky; stepping them is a no-op.
    pub fn step(&mut self) -> Result<EmulationState, EmulationError> {
        match self.state {
            EmulationState::Idle | EmulationState::Stopped | EmulationState::Faulted => {
                return Ok(self.state);
            }
            _ => {}
        }

        if self.cpu.peripherals.input.should_close() {
            debug!("emulation stopped");
            self.state = EmulationState::Stopped;
            return Ok(self.state);
        }

        // Key wait: deliver the captured key, or hold the cycle
        if self.cpu.peripherals.input.data.lock.is_locked() {
            if self.cpu.peripherals.input.data.lock.is_key_set() {
                let register = self.cpu.peripherals.input.data.lock.register;
                let key = self.cpu.peripherals.input.data.lock.key;

                self.cpu.registers.set_register(register, key);
                self.cpu.peripherals.input.data.lock.unlock();
            } else {
                self.state = EmulationState::WaitingForKey;
                return Ok(self.state);
            }
        }

        match self.cycle() {
            Ok(()) => {
                self.cpu.instruction_count += 1;

                self.state = if self.cpu.peripherals.input.data.lock.is_locked() {
                    EmulationState::WaitingForKey
                } else {
                    EmulationState::Running
                };
                Ok(self.state)
            }
            Err(error) => {
                self.state = EmulationState::Faulted;
                Err(error)
            }
        }
    }

    /// Run loop
    ///
    /// Polls input, steps and sleeps until a stop is requested. A fault
    /// exits the loop with the error.
    ///
    /// # Arguments
    ///
    /// * `input` - Input driver
    /// * `clock` - Clock driver
    ///
    pub fn run(
        &mut self,
        input: &mut dyn InputInterface,
        clock: &dyn ClockInterface,
    ) -> Result<(), EmulationError> {
        if self.state == EmulationState::Idle {
            debug!("no cartridge loaded, nothing to run");
            return Ok(());
        }

        loop {
            input.update_input_state(&mut self.cpu.peripherals.input);

            match self.step() {
                Ok(EmulationState::Stopped) => break,
                Ok(_) => {}
                Err(error) => {
                    error!("emulation fault: {}", error);
                    return Err(error);
                }
            }

            clock.sleep_millis(self.cycle_delay);
        }

        Ok(())
    }

    fn cycle(&mut self) -> Result<(), EmulationError> {
        self.cpu.decrement_timers();

        let pc = self.cpu.registers.get_pc();
        let opcode = self.cpu.peripherals.memory.read_word(pc as usize)?;
        self.cpu.registers.advance_pc();

        let instruction = decode_opcode(opcode, pc)?;
        trace!(
            "[{:08X}] {:04X}: executing opcode {:04X}",
            self.cpu.instruction_count,
            pc,
            opcode
        );

        self.cpu.execute_instruction(&instruction)
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
