//! Emulator driver tests.

use std::cell::Cell;

use vip8::cartridge::Cartridge;
use vip8::drivers::{ClockInterface, InputInterface, NativeClockDriver};
use vip8::emulator::{EmulationState, Emulator};
use vip8::input::InputState;

/// Input driver following a small script: optionally press a key on a given
/// poll, request the emulation to close after a fixed number of polls.
struct ScriptedInput {
    polls: usize,
    close_after: usize,
    press_on_poll: Option<(usize, u8)>,
}

impl ScriptedInput {
    fn close_after(polls: usize) -> Self {
        Self {
            polls: 0,
            close_after: polls,
            press_on_poll: None,
        }
    }
}

impl InputInterface for ScriptedInput {
    fn update_input_state(&mut self, state: &mut InputState) {
        self.polls += 1;

        if let Some((at, key)) = self.press_on_poll {
            if self.polls == at {
                state.press(key);
            }
        }

        if self.polls > self.close_after {
            state.request_close();
        }
    }
}

/// Clock driver counting sleep requests instead of sleeping.
#[derive(Default)]
struct CountingClock {
    sleeps: Cell<u64>,
    total_millis: Cell<u64>,
}

impl ClockInterface for CountingClock {
    fn sleep_millis(&self, millis: u64) {
        self.sleeps.set(self.sleeps.get() + 1);
        self.total_millis.set(self.total_millis.get() + millis);
    }
}

fn load_program(opcodes: &[u16]) -> Emulator {
    let mut bytes = Vec::new();
    for opcode in opcodes {
        bytes.push((opcode >> 8) as u8);
        bytes.push((opcode & 0xFF) as u8);
    }

    let cartridge = Cartridge::load_from_bytes("TEST", &bytes).unwrap();
    let mut emulator = Emulator::new();
    emulator.load_game(&cartridge).unwrap();
    emulator
}

#[test]
fn test_initial_state_is_idle() {
    let emulator = Emulator::new();
    assert_eq!(emulator.state(), EmulationState::Idle);
}

#[test]
fn test_step_without_cartridge_is_a_noop() {
    let mut emulator = Emulator::new();
    assert_eq!(emulator.step().unwrap(), EmulationState::Idle);
    assert_eq!(emulator.cpu.registers.get_pc(), 0x200);
}

#[test]
fn test_load_readies_the_driver() {
    let emulator = load_program(&[0x1200]);
    assert_eq!(emulator.state(), EmulationState::Ready);
}

#[test]
fn test_step_transitions_to_running() {
    let mut emulator = load_program(&[0x1200]);
    assert_eq!(emulator.step().unwrap(), EmulationState::Running);
}

#[test]
fn test_stop_request_is_honored_before_the_next_fetch() {
    let mut emulator = load_program(&[0x1200]);
    emulator.step().unwrap();

    let pc = emulator.cpu.registers.get_pc();
    emulator.stop();

    assert_eq!(emulator.step().unwrap(), EmulationState::Stopped);
    assert_eq!(emulator.cpu.registers.get_pc(), pc);
}

#[test]
fn test_stopped_is_terminal() {
    let mut emulator = load_program(&[0x1200]);
    emulator.stop();
    emulator.step().unwrap();

    assert_eq!(emulator.step().unwrap(), EmulationState::Stopped);
    assert_eq!(emulator.state(), EmulationState::Stopped);
}

#[test]
fn test_faulted_is_terminal() {
    let mut emulator = load_program(&[0xF0FF]);
    assert!(emulator.step().is_err());
    assert_eq!(emulator.state(), EmulationState::Faulted);

    // Subsequent steps are no-ops, not new faults.
    assert_eq!(emulator.step().unwrap(), EmulationState::Faulted);
}

#[test]
fn test_font_is_loaded_at_boot() {
    let emulator = load_program(&[0x1200]);

    // '0' glyph first byte at 0x050, 'F' glyph last byte at 0x09F.
    assert_eq!(
        emulator.cpu.peripherals.memory.read_byte(0x050).unwrap(),
        0xF0
    );
    assert_eq!(
        emulator.cpu.peripherals.memory.read_byte(0x09F).unwrap(),
        0x80
    );
}

#[test]
fn test_program_is_loaded_at_0x200() {
    let emulator = load_program(&[0x1234]);

    assert_eq!(
        emulator.cpu.peripherals.memory.read_word(0x200).unwrap(),
        0x1234
    );
}

#[test]
fn test_run_loop_until_close() {
    let mut emulator = load_program(&[0x1200]);
    let mut input = ScriptedInput::close_after(25);
    let clock = CountingClock::default();

    emulator.run(&mut input, &clock).unwrap();

    assert_eq!(emulator.state(), EmulationState::Stopped);
    // One sleep per executed cycle, none for the closing step.
    assert_eq!(clock.sleeps.get(), 25);
    assert_eq!(clock.total_millis.get(), 25);
}

#[test]
fn test_run_loop_respects_cycle_delay() {
    let mut emulator = load_program(&[0x1200]);
    emulator.set_cycle_delay(4);

    let mut input = ScriptedInput::close_after(10);
    let clock = CountingClock::default();

    emulator.run(&mut input, &clock).unwrap();

    assert_eq!(clock.total_millis.get(), 40);
}

#[test]
fn test_run_loop_with_native_clock() {
    let mut emulator = load_program(&[0x1200]);
    let mut input = ScriptedInput::close_after(5);
    let clock = NativeClockDriver::new();

    emulator.run(&mut input, &clock).unwrap();

    assert_eq!(emulator.state(), EmulationState::Stopped);
    assert_eq!(emulator.cpu.instruction_count, 5);
}

#[test]
fn test_run_loop_propagates_faults() {
    let mut emulator = load_program(&[0x800F]);
    let mut input = ScriptedInput::close_after(1000);
    let clock = CountingClock::default();

    assert!(emulator.run(&mut input, &clock).is_err());
    assert_eq!(emulator.state(), EmulationState::Faulted);
}

#[test]
fn test_run_loop_delivers_waited_key() {
    // FX0A, then store V3 somewhere visible and loop.
    let mut emulator = load_program(&[0xF30A, 0x1202]);

    let mut input = ScriptedInput::close_after(50);
    input.press_on_poll = Some((10, 0xB));
    let clock = CountingClock::default();

    emulator.run(&mut input, &clock).unwrap();

    assert_eq!(emulator.cpu.registers.get_register(0x3), 0xB);
}

#[test]
fn test_clear_screen_schedules_present() {
    let mut emulator = load_program(&[0x00E0]);
    emulator.cpu.peripherals.screen.consume_dirty();

    emulator.step().unwrap();

    assert!(emulator.cpu.peripherals.screen.consume_dirty());
}
