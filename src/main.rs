//! CHIP-8 emulator CLI

use std::path::PathBuf;
use std::process;

use argh::FromArgs;
use log::LevelFilter;

use vip8::cartridge::Cartridge;
use vip8::cpu::Quirks;
use vip8::drivers::{WindowInterface, WinitWindowDriver};
use vip8::emulator::Emulator;
use vip8::logger::init_logger;

/// CHIP-8 virtual machine
#[derive(FromArgs)]
pub struct Args {
    /// cartridge path
    #[argh(positional)]
    pub rom: PathBuf,

    /// milliseconds per CPU cycle
    #[argh(option, short = 'd', default = "1")]
    pub delay: u64,

    /// verbose mode
    #[argh(switch, short = 'v')]
    pub verbose: bool,

    /// shift opcodes read Vy (legacy behavior)
    #[argh(switch)]
    pub shift_quirk: bool,

    /// register dump/load opcodes increment I
    #[argh(switch)]
    pub load_quirk: bool,

    /// ADD I, Vx sets VF on overflow past 0FFF
    #[argh(switch)]
    pub index_quirk: bool,
}

fn main() {
    let args: Args = argh::from_env();

    init_logger(if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    let cartridge = match Cartridge::load_from_path(&args.rom) {
        Ok(cartridge) => cartridge,
        Err(error) => {
            eprintln!("{}", error);
            process::exit(2);
        }
    };

    let mut emulator = Emulator::new();
    emulator.set_cycle_delay(args.delay);
    emulator.cpu.quirks = Quirks {
        shift_uses_vy: args.shift_quirk,
        load_increments_i: args.load_quirk,
        index_add_sets_vf: args.index_quirk,
    };

    if let Err(error) = emulator.load_game(&cartridge) {
        eprintln!("{}", error);
        process::exit(2);
    }

    let mut driver = WinitWindowDriver::new();
    if let Err(error) = driver.run_emulator(emulator, cartridge) {
        eprintln!("execution error: {}", error);
        process::exit(3);
    }
}
