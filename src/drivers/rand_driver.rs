//! Random driver.

use rand::random;

use super::RandomInterface;
use crate::types::C8Byte;

/// Random driver backed by the thread RNG.
#[derive(Default)]
pub struct RandDriver;

impl RandDriver {
    /// Creates new driver.
    pub fn new() -> Self {
        Default::default()
    }
}

impl RandomInterface for RandDriver {
    fn random_byte(&mut self) -> C8Byte {
        random::<C8Byte>()
    }
}
