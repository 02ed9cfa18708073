#[macro_use]
extern crate clap;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

extern crate litex_mipi_ctl;
use litex_mipi_ctl::*;

use std::io;
use std::path::PathBuf;
use std::process::exit;

use litex_mipi_ctl::board::{
	Board,
	Platform,
};
use litex_mipi_ctl::config::{
	BoardConfig,
	parse_number,
};

fn get_number(matches: &clap::ArgMatches, name: &str) -> AResult<Option<u64>> {
	match matches.value_of(name) {
		None => Ok(None),
		Some(p) => parse_number(p).map(Some).map_err(|e| {
			let msg = format!("invalid parameter {}: {}", name, e);
			e.context(msg).into()
		}),
	}
}

fn get_u32(matches: &clap::ArgMatches, name: &str) -> AResult<Option<u32>> {
	match get_number(matches, name)? {
		None => Ok(None),
		Some(v) => {
			ensure!(v <= u64::from(u32::max_value()), "invalid parameter {}: {} too large", name, v);
			Ok(Some(v as u32))
		},
	}
}

fn board_config(matches: &clap::ArgMatches) -> AResult<BoardConfig> {
	let mut config = BoardConfig::default();
	if let Some(memory) = matches.value_of("memory") {
		config.memory = PathBuf::from(memory);
	}
	if let Some(base) = get_number(matches, "base")? {
		config.csr_base = base;
	}
	if let Some(len) = get_number(matches, "length")? {
		config.csr_len = len as usize;
	}
	if let Some(assignments) = matches.values_of("csr") {
		for a in assignments {
			config.csr.set(a)?;
		}
	}
	if let Some(base) = get_number(matches, "packet")? {
		config.packet_base = base;
	}
	if let Some(base) = get_number(matches, "image")? {
		config.image_base = base;
	}
	if let Some(hz) = get_u32(matches, "clock")? {
		config.clock_hz = hz;
	}
	if let Some(hz) = get_u32(matches, "speed")? {
		config.i2c_hz = hz;
	}
	config.validate()?;
	debug!("board config: {}", config);
	Ok(config)
}

fn show_sequence() -> AResult<()> {
	println!("# IMX258 @ {:02x}", imx258::DEVICE_ADDRESS);
	for (index, entry) in imx258::REFERENCE_DESIGN.iter().enumerate() {
		println!("@{:02}: {:04x} {:02x}", index, entry.address, entry.value);
	}
	Ok(())
}

fn run_console(board: Board, sub_m: &clap::ArgMatches) -> AResult<()> {
	// the terminal echoes by itself in line mode
	let echo = 0 == unsafe { libc::isatty(libc::STDIN_FILENO) };
	let mut console = console::Console::new(board, echo);
	let stdin = io::stdin();
	let stdout = io::stdout();
	let mut out = stdout.lock();

	if !sub_m.is_present("skip_init") {
		console.camera_init(&mut out)?;
	}
	console.run(&mut stdin.lock(), &mut out)
}

fn main_app() -> AResult<()> {
	let matches = clap_app!(@app (app_from_crate!())
		(@setting SubcommandRequiredElseHelp)
		(global_setting: clap::AppSettings::VersionlessSubcommands)
		(@arg memory: -m --memory +takes_value "file to map SoC memory from (default /dev/mem)")
		(@arg base: --base +takes_value "CSR base address (default 0xf0000000)")
		(@arg length: --length +takes_value "CSR window length (default 0x10000)")
		(@arg csr: --csr +takes_value +multiple number_of_values(1) "override CSR offset: NAME=OFFSET (see csr.h)")
		(@arg packet: --packet +takes_value "packet buffer address")
		(@arg image: --image +takes_value "image buffer address")
		(@arg clock: --clock +takes_value "host clock in Hz; a bus period is clock / speed / 4 cycles of it (default 75000000)")
		(@arg speed: --speed +takes_value "I2C bus frequency in Hz (default 50000)")
		(@subcommand console =>
			(about: "interactive console")
			(@arg skip_init: --skip "don't initialize the camera on startup")
		)
		(@subcommand cam_init =>
			(about: "initialize camera and start streaming")
		)
		(@subcommand chip_id =>
			(about: "read camera chip id")
		)
		(@subcommand lcd_init =>
			(about: "initialize LCD")
		)
		(@subcommand lcd_fill =>
			(about: "fill LCD with one colour")
			(@arg COLOUR: +required "colour name or RGB565 value")
		)
		(@subcommand freq =>
			(about: "print MIPI byte clock frequency")
		)
		(@subcommand show_sequence =>
			(about: "print the camera register sequence (no hardware access)")
		)
	).get_matches();

	if let ("show_sequence", _) = matches.subcommand() {
		return show_sequence();
	}

	let config = board_config(&matches)?;
	let mut board = Board::open(config)?;

	match matches.subcommand() {
		("console", Some(sub_m)) => {
			run_console(board, sub_m)
		}
		("cam_init", _) => {
			ensure!(board.camera_init(), "camera init failed");
			Ok(())
		}
		("chip_id", _) => {
			println!("{:04x}", board.camera_chip_id());
			Ok(())
		}
		("lcd_init", _) => {
			board.lcd_init()
		}
		("lcd_fill", Some(sub_m)) => {
			let colour = st7735::parse_colour(sub_m.value_of("COLOUR").unwrap_or("red"))?;
			board.lcd_fill(colour)
		}
		("freq", _) => {
			println!("Byte clk freq: {}Hz", board.byte_clock_frequency());
			Ok(())
		}
		("", _) => bail!("no subcommand"),
		(cmd, _) => bail!("not implemented subcommand {:?}", cmd),
	}
}

fn main() {
	env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = main_app() {
		error!("Error: {}", e);
		exit(1);
	}
}
