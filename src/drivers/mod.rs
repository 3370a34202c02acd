//! Drivers.
//!
//! Host-facing ports: the core consumes keyboard state, randomness and
//! pacing through these traits and pushes pixels through the render trait.
//! Concrete implementations live in the sibling modules.

mod clock_driver;
mod pixels_driver;
mod rand_driver;
mod winit_driver;

use super::cartridge::Cartridge;
use super::emulator::Emulator;
use super::errors::CResult;
use super::input::InputState;
use super::screen::Color;
use super::types::C8Byte;

/// Screen width.
pub const SCREEN_WIDTH: u32 = 640;
/// Screen height.
pub const SCREEN_HEIGHT: u32 = 320;
/// Window width.
pub const WINDOW_WIDTH: u32 = 640;
/// Window height.
pub const WINDOW_HEIGHT: u32 = 320;
/// Window title.
pub const WINDOW_TITLE: &str = "VIP-8";

/// Window interface.
pub trait WindowInterface {
    /// Run emulator.
    fn run_emulator(&mut self, emulator: Emulator, cartridge: Cartridge) -> CResult;
}

/// Input interface.
pub trait InputInterface {
    /// Update input state.
    fn update_input_state(&mut self, state: &mut InputState);
}

/// Render interface.
pub trait RenderInterface {
    /// Render pixel.
    fn render_pixel(
        &mut self,
        origin_x: u32,
        origin_y: u32,
        x: usize,
        y: usize,
        scale: usize,
        color: Color,
        frame_width: usize,
    ) -> CResult;
}

/// Random interface.
pub trait RandomInterface {
    /// Get a random byte.
    fn random_byte(&mut self) -> C8Byte;
}

/// Clock interface.
pub trait ClockInterface {
    /// Sleep for the given number of milliseconds.
    fn sleep_millis(&self, millis: u64);
}

pub use clock_driver::NativeClockDriver;
pub use pixels_driver::PixelsRenderDriver;
pub use rand_driver::RandDriver;
pub use winit_driver::{WinitInputDriver, WinitWindowDriver};
