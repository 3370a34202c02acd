//! CHIP-8 error types

use std::error::Error;
use std::fmt;
use std::io;

use super::types::C8Addr;

/// Common result.
pub type CResult<T = ()> = Result<T, Box<dyn Error>>;

/// Emulation error.
///
/// Every failure class is fatal for the current run: the driver moves to
/// the faulted state and the machine is discarded.
#[derive(Debug)]
pub enum EmulationError {
    /// Memory access out of range.
    OutOfBounds {
        /// Operation that triggered the access.
        operation: &'static str,
        /// Offending address.
        address: usize,
    },
    /// Push on a full call stack.
    StackOverflow,
    /// Pop on an empty call stack.
    StackUnderflow,
    /// 16-bit pattern with no matching instruction.
    UnknownOpcode {
        /// Offending opcode.
        opcode: C8Addr,
        /// Address the opcode was fetched from.
        address: C8Addr,
    },
    /// Cartridge file with no data.
    EmptyCartridge,
    /// Cartridge larger than the program area.
    CartridgeTooLarge(usize),
    /// Cartridge file access failure.
    Io(io::Error),
    /// Host subsystem initialization failure.
    Init(String),
}

impl fmt::Display for EmulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmulationError::OutOfBounds { operation, address } => {
                write!(f, "address out of bounds: {:#05X} ({})", address, operation)
            }
            EmulationError::StackOverflow => write!(f, "call stack is full"),
            EmulationError::StackUnderflow => write!(f, "call stack is empty"),
            EmulationError::UnknownOpcode { opcode, address } => {
                write!(f, "unknown opcode {:04X} at address {:04X}", opcode, address)
            }
            EmulationError::EmptyCartridge => write!(f, "cartridge is empty"),
            EmulationError::CartridgeTooLarge(size) => {
                write!(f, "cartridge is too large: {} bytes", size)
            }
            EmulationError::Io(error) => write!(f, "cartridge I/O error: {}", error),
            EmulationError::Init(message) => write!(f, "initialization error: {}", message),
        }
    }
}

impl Error for EmulationError {}

impl From<io::Error> for EmulationError {
    fn from(error: io::Error) -> Self {
        EmulationError::Io(error)
    }
}
