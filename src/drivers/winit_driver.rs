//! Window and keyboard driver for winit.

use std::process;
use std::time::Instant;

use pixels::{Pixels, SurfaceTexture};
use winit::{
    dpi::LogicalSize,
    event::VirtualKeyCode,
    event_loop::{ControlFlow, EventLoop},
    window::Window,
};
use winit_input_helper::WinitInputHelper;

use super::{
    pixels_driver::PixelsRenderDriver, InputInterface, WindowInterface, SCREEN_HEIGHT,
    SCREEN_WIDTH, WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH,
};
use crate::cartridge::Cartridge;
use crate::emulator::{EmulationState, Emulator};
use crate::errors::{CResult, EmulationError};
use crate::input::{InputState, INPUT_STATE_COUNT};
use crate::types::C8Byte;

/// Milliseconds per rendered frame, used to batch CPU cycles.
const FRAME_TIME_MS: u64 = 16;

/// Window driver for winit.
#[derive(Default)]
pub struct WinitWindowDriver;

/// Input driver for winit.
///
/// Conventional key layout: `1234 / QWER / ASDF / ZXCV` mapping to
/// `123C / 456D / 789E / A0BF`.
pub struct WinitInputDriver {
    helper: WinitInputHelper,
}

impl WinitWindowDriver {
    /// Creates new driver.
    pub fn new() -> Self {
        Default::default()
    }

    fn create_window(&mut self) -> Result<(EventLoop<()>, Window), EmulationError> {
        let event_loop = EventLoop::new();
        let size = LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT);
        let window = winit::window::WindowBuilder::new()
            .with_title(WINDOW_TITLE)
            .with_inner_size(size)
            .with_min_inner_size(size)
            .build(&event_loop)
            .map_err(|e| EmulationError::Init(e.to_string()))?;

        Ok((event_loop, window))
    }
}

impl WindowInterface for WinitWindowDriver {
    fn run_emulator(&mut self, mut emulator: Emulator, cartridge: Cartridge) -> CResult {
        let (event_loop, window) = self.create_window()?;

        let mut pixels = {
            let window_size = window.inner_size();
            let surface_texture =
                SurfaceTexture::new(window_size.width, window_size.height, &window);
            Pixels::new(SCREEN_WIDTH, SCREEN_HEIGHT, surface_texture)
                .map_err(|e| EmulationError::Init(e.to_string()))?
        };

        let mut input = WinitInputDriver::new();
        let cycles_per_frame = (FRAME_TIME_MS / emulator.cycle_delay().max(1)).max(1);

        let base_title = format!("{} - {}", WINDOW_TITLE, cartridge.get_title());
        window.set_title(&base_title);

        let mut last_elapsed_time = Instant::now();
        let mut fps_timer = Instant::now();

        event_loop.run(move |event, _, control_flow| {
            let frame_time = last_elapsed_time.elapsed().as_micros();
            last_elapsed_time = Instant::now();

            if fps_timer.elapsed().as_millis() > 2000 {
                let frame_time_millis = frame_time as f32 / 1_000.0;
                let fps = (1_000.0 / frame_time_millis) as u32;

                window.set_title(&format!("[FPS: {}] {}", fps, base_title));
                fps_timer = Instant::now();
            }

            if let winit::event::Event::RedrawRequested(_) = event {
                let mut render_driver = PixelsRenderDriver::new(pixels.get_frame());
                emulator
                    .cpu
                    .peripherals
                    .screen
                    .render_pixels(0, 0, SCREEN_WIDTH as usize, &mut render_driver)
                    .expect("render failure");
                pixels.render().expect("surface failure");

                emulator.cpu.peripherals.screen.consume_dirty();
            }

            if input.helper().update(&event) {
                if input.helper().quit() || input.helper().key_pressed(VirtualKeyCode::Escape) {
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                for _ in 0..cycles_per_frame {
                    input.update_input_state(&mut emulator.cpu.peripherals.input);

                    match emulator.step() {
                        Ok(EmulationState::Stopped) => {
                            *control_flow = ControlFlow::Exit;
                            return;
                        }
                        Ok(EmulationState::WaitingForKey) => {
                            window.set_title(&format!("{} [WAITING FOR INPUT]", base_title));
                            break;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            error!("emulation fault: {}", e);
                            process::exit(3);
                        }
                    }
                }

                if emulator.cpu.peripherals.screen.is_dirty() {
                    window.request_redraw();
                }
            }
        });
    }
}

impl Default for WinitInputDriver {
    fn default() -> Self {
        Self {
            helper: WinitInputHelper::new(),
        }
    }
}

impl WinitInputDriver {
    /// Creates new driver.
    pub fn new() -> Self {
        Default::default()
    }

    /// Get helper.
    pub fn helper(&mut self) -> &mut WinitInputHelper {
        &mut self.helper
    }

    fn code_to_key(code: C8Byte) -> VirtualKeyCode {
        match code {
            0x1 => VirtualKeyCode::Key1,
            0x2 => VirtualKeyCode::Key2,
            0x3 => VirtualKeyCode::Key3,
            0xC => VirtualKeyCode::Key4,
            0x4 => VirtualKeyCode::Q,
            0x5 => VirtualKeyCode::W,
            0x6 => VirtualKeyCode::E,
            0xD => VirtualKeyCode::R,
            0x7 => VirtualKeyCode::A,
            0x8 => VirtualKeyCode::S,
            0x9 => VirtualKeyCode::D,
            0xE => VirtualKeyCode::F,
            0xA => VirtualKeyCode::Z,
            0x0 => VirtualKeyCode::X,
            0xB => VirtualKeyCode::C,
            0xF => VirtualKeyCode::V,
            _ => unreachable!(),
        }
    }
}

impl InputInterface for WinitInputDriver {
    fn update_input_state(&mut self, state: &mut InputState) {
        for key in 0..INPUT_STATE_COUNT {
            let key8 = key as C8Byte;
            let code = Self::code_to_key(key8);

            if self.helper.key_pressed(code) {
                state.press(key8);
            }

            if self.helper.key_released(code) {
                state.release(key8);
            }
        }
    }
}
