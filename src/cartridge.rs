//! CHIP-8 cartridge
//!
//! Raw binary ROM image, no header. Loaded verbatim at 0x200; anything that
//! cannot fit the program area is rejected.

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use super::errors::EmulationError;
use super::types::C8Byte;

/// Cartridge max size
pub const CARTRIDGE_MAX_SIZE: usize = 4096 - 512;

const EMPTY_GAME_NAME: &str = "<EMPTY>";

/// CHIP-8 cartridge type
pub struct Cartridge {
    title: String,
    data: Vec<C8Byte>,
}

impl Cartridge {
    /// Load cartridge from path.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to file
    ///
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Cartridge, EmulationError> {
        let mut file = File::open(path.as_ref())?;

        let mut contents = Vec::with_capacity(CARTRIDGE_MAX_SIZE);
        file.read_to_end(&mut contents)?;

        let title = Self::get_game_name(path.as_ref());
        debug!("loading cartridge `{}` ({} bytes)", title, contents.len());

        Cartridge::load_from_bytes(&title, &contents)
    }

    /// Load cartridge from bytes.
    ///
    /// # Arguments
    ///
    /// * `title` - Game title
    /// * `bytes` - Bytes contents
    ///
    pub fn load_from_bytes(title: &str, bytes: &[C8Byte]) -> Result<Cartridge, EmulationError> {
        if bytes.is_empty() {
            return Err(EmulationError::EmptyCartridge);
        }

        if bytes.len() > CARTRIDGE_MAX_SIZE {
            return Err(EmulationError::CartridgeTooLarge(bytes.len()));
        }

        Ok(Cartridge {
            title: title.to_string(),
            data: bytes.to_vec(),
        })
    }

    /// Get game name from path
    pub fn get_game_name(path: &Path) -> String {
        match path.file_stem() {
            Some(stem) => stem.to_string_lossy().to_uppercase().replace("_", " "),
            None => String::from(EMPTY_GAME_NAME),
        }
    }

    /// Get cartridge title.
    pub fn get_title(&self) -> &str {
        &self.title
    }

    /// Get internal data.
    pub fn get_data(&self) -> &[C8Byte] {
        &self.data
    }
}
