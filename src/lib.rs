//! CHIP-8 virtual machine
//!
//! Fetch/decode/execute core for the CHIP-8 interpreted language, with the
//! host reached through small driver traits (display, keyboard, randomness,
//! pacing).

#![warn(missing_docs)]

#[macro_use]
extern crate log;

pub mod cartridge;
pub mod cpu;
pub mod drivers;
pub mod emulator;
pub mod errors;
pub mod font;
pub mod input;
pub mod logger;
pub mod memory;
pub mod opcodes;
pub mod peripherals;
pub mod registers;
pub mod screen;
pub mod stack;
pub mod timer;
pub mod types;
