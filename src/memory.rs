//! CHIP-8 memory
//!
//! 4 KiB byte-addressable store. Addresses 0x000-0x1FF are reserved for the
//! interpreter (the font lives at 0x050); programs start at 0x200.

use std::fmt;

use super::errors::EmulationError;
use super::types::{C8Addr, C8Byte};

/// Memory size in bytes.
pub const MEMORY_SIZE: usize = 4096;
/// Initial program address.
pub const PROGRAM_START_ADDRESS: C8Addr = 0x200;

const CHUNK_SIZE: usize = 64;

/// CHIP-8 memory struct
#[derive(Clone)]
pub struct Memory {
    data: Vec<C8Byte>,
}

impl Memory {
    /// Create new memory
    pub fn new() -> Self {
        Memory {
            data: vec![0; MEMORY_SIZE],
        }
    }

    /// Read byte at address.
    pub fn read_byte(&self, address: usize) -> Result<C8Byte, EmulationError> {
        self.check_address("memory read", address)?;
        Ok(self.data[address])
    }

    /// Write byte at address.
    pub fn write_byte(&mut self, address: usize, byte: C8Byte) -> Result<(), EmulationError> {
        self.check_address("memory write", address)?;
        self.data[address] = byte;
        Ok(())
    }

    /// Read a big-endian 16-bit word at address.
    pub fn read_word(&self, address: usize) -> Result<C8Addr, EmulationError> {
        let high = self.read_byte(address)?;
        let low = self.read_byte(address + 1)?;

        Ok(C8Addr::from(high) << 8 | C8Addr::from(low))
    }

    /// Write data at offset.
    ///
    /// # Arguments
    ///
    /// * `offset` - Offset
    /// * `data` - Data (bytes)
    ///
    pub fn write_data(&mut self, offset: usize, data: &[C8Byte]) -> Result<(), EmulationError> {
        if data.len() > MEMORY_SIZE || offset > MEMORY_SIZE - data.len() {
            return Err(EmulationError::OutOfBounds {
                operation: "memory load",
                address: offset + data.len(),
            });
        }

        self.data[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Read `count` bytes starting at offset.
    pub fn read_data(&self, offset: usize, count: usize) -> Result<&[C8Byte], EmulationError> {
        if count > MEMORY_SIZE || offset > MEMORY_SIZE - count {
            return Err(EmulationError::OutOfBounds {
                operation: "memory read",
                address: offset + count,
            });
        }

        Ok(&self.data[offset..offset + count])
    }

    fn check_address(
        &self,
        operation: &'static str,
        address: usize,
    ) -> Result<(), EmulationError> {
        if address >= MEMORY_SIZE {
            Err(EmulationError::OutOfBounds { operation, address })
        } else {
            Ok(())
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, chunk) in self.data.chunks(CHUNK_SIZE).enumerate() {
            write!(
                f,
                "    {:04X}-{:04X} | ",
                idx * CHUNK_SIZE,
                (idx + 1) * CHUNK_SIZE
            )?;

            for chunk_value in chunk.iter() {
                write!(f, "{:02X} ", chunk_value)?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}
