//! CHIP-8 input system
//!
//! Keys:
//!     1 2 3 C
//!     4 5 6 D
//!     7 8 9 E
//!     A 0 B F
//!

use std::fmt;

use super::types::{C8Byte, C8RegIdx};

/// Input state count
pub const INPUT_STATE_COUNT: usize = 16;
/// Input empty key
pub const INPUT_EMPTY_KEY: C8Byte = 0xFF;

/// Input state flags
#[derive(Clone, Debug, Default)]
pub struct InputStateFlags {
    /// Close requested.
    pub should_close: bool,
}

/// Input lock
///
/// Armed by the wait-for-key instruction; the next released-to-pressed
/// transition satisfies it and records the key for the locked register.
#[derive(Clone, Debug)]
pub struct InputLock {
    /// Active
    pub active: bool,
    /// Register
    pub register: C8RegIdx,
    /// Key
    pub key: C8Byte,
}

impl InputLock {
    /// Check if key is set
    pub fn is_key_set(&self) -> bool {
        self.key != INPUT_EMPTY_KEY
    }

    /// Is locked
    pub fn is_locked(&self) -> bool {
        self.active
    }

    /// Lock on a register
    pub fn lock(&mut self, register: C8RegIdx) {
        self.active = true;
        self.register = register;
        self.key = INPUT_EMPTY_KEY;
    }

    /// Unlock
    pub fn unlock(&mut self) {
        self.active = false;
        self.register = INPUT_EMPTY_KEY;
        self.key = INPUT_EMPTY_KEY;
    }

    /// Set key
    pub fn set_key(&mut self, key: C8Byte) {
        self.key = key;
    }
}

/// Input state data
#[derive(Clone, Debug)]
pub struct InputStateData {
    data: Vec<C8Byte>,
    last_pressed_key: C8Byte,

    /// Lock
    pub lock: InputLock,
    /// Flags
    pub flags: InputStateFlags,
}

/// Input state struct
pub struct InputState {
    /// State data
    pub data: InputStateData,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            data: InputStateData {
                data: vec![0; INPUT_STATE_COUNT],
                last_pressed_key: INPUT_EMPTY_KEY,
                lock: InputLock {
                    active: false,
                    register: INPUT_EMPTY_KEY,
                    key: INPUT_EMPTY_KEY,
                },
                flags: InputStateFlags::default(),
            },
        }
    }
}

impl InputState {
    /// Create new input state
    pub fn new() -> Self {
        Default::default()
    }

    /// Arm the key wait lock for a register
    ///
    /// # Arguments
    ///
    /// * `register` - Target register
    ///
    pub fn wait_for_input(&mut self, register: C8RegIdx) {
        self.data.lock.lock(register);
    }

    /// Press input
    ///
    /// # Arguments
    ///
    /// * `key` - Input key
    ///
    pub fn press(&mut self, key: C8Byte) {
        if key as usize >= INPUT_STATE_COUNT {
            panic!("Key `{}` does not exist.", key);
        }

        self.data.data[key as usize] = 1;
        self.data.last_pressed_key = key;

        // Handle lock
        if self.data.lock.is_locked() && !self.data.lock.is_key_set() {
            self.data.lock.set_key(key);
        }
    }

    /// Release input
    ///
    /// # Arguments
    ///
    /// * `key` - Input key
    ///
    pub fn release(&mut self, key: C8Byte) {
        if key as usize >= INPUT_STATE_COUNT {
            panic!("Key `{}` does not exist.", key);
        }

        self.data.data[key as usize] = 0;
        self.data.last_pressed_key = INPUT_EMPTY_KEY;
    }

    /// Get input
    ///
    /// # Arguments
    ///
    /// * `key` - Input key
    ///
    pub fn get(&self, key: C8Byte) -> C8Byte {
        if key as usize >= INPUT_STATE_COUNT {
            panic!("Key `{}` does not exist.", key);
        }

        self.data.data[key as usize]
    }

    /// Get last pressed key
    pub fn get_last_pressed_key(&self) -> C8Byte {
        self.data.last_pressed_key
    }

    /// Request emulation exit
    pub fn request_close(&mut self) {
        self.data.flags.should_close = true;
    }

    /// Check if emulation exit was requested
    pub fn should_close(&self) -> bool {
        self.data.flags.should_close
    }
}

impl fmt::Debug for InputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, v) in self.data.data.iter().enumerate() {
            writeln!(f, "    K{:X}: {}", idx, v)?;
        }

        writeln!(f, "    LK: {}", self.data.last_pressed_key)
    }
}
