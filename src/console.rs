use std::io::{
	self,
	Read,
	Write,
};

use crate::board::Platform;
use crate::st7735;

pub const LINE_MAX: usize = 63;

pub const MIPI_SAMPLES: usize = 32;
pub const PACKET_WORDS: usize = 1024;
pub const IMAGE_WIDTH: usize = 96;
pub const IMAGE_HEIGHT: usize = 54;
// two buffer rows (GR / BG) per output row
pub const IMAGE_WORDS: usize = IMAGE_WIDTH * IMAGE_HEIGHT * 2;

const PROMPT: &str = "\x1b[92;1mlitex-mipi-app\x1b[0m> ";

const COMMANDS: &[(&str, &str)] = &[
	("help", "Show this command"),
	("reboot", "Reboot CPU"),
	("cam_init", "Run camera initialisation"),
	("chip_id", "Read camera chip id"),
	("lcd_init", "Run LCD initialisation"),
	("lcd_fill", "Fill LCD with a colour (name or RGB565)"),
	("freq", "Print frequency counter output"),
	("data", "Print 32 words of received MIPI data"),
	("packet", "Print 1024 words of last received packet"),
	("image", "Print 96x54 downsampled image"),
	("exit", "Leave the console"),
];

/// Collects bytes into a line; handles backspace, ignores bell.
#[derive(Debug, Default)]
pub struct LineEditor {
	line: Vec<u8>,
	echo: bool,
}

impl LineEditor {
	pub fn new(echo: bool) -> Self {
		LineEditor {
			line: Vec::new(),
			echo,
		}
	}

	fn echo(&self, out: &mut dyn Write, s: &[u8]) -> io::Result<()> {
		if self.echo {
			out.write_all(s)?;
		}
		Ok(())
	}

	/// Returns the line once it's terminated (CR or LF).
	pub fn feed(&mut self, c: u8, out: &mut dyn Write) -> io::Result<Option<String>> {
		match c {
			0x7f | 0x08 => {
				if self.line.pop().is_some() {
					self.echo(out, b"\x08 \x08")?;
				}
			},
			0x07 => (),
			b'\r' | b'\n' => {
				self.echo(out, b"\n")?;
				let line = std::mem::replace(&mut self.line, Vec::new());
				return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
			},
			_ => {
				if self.line.len() < LINE_MAX {
					self.echo(out, &[c])?;
					self.line.push(c);
				}
			},
		}
		Ok(None)
	}
}

/// Split off the first space separated token.
pub fn get_token(s: &str) -> (&str, &str) {
	match s.find(' ') {
		Some(pos) => (&s[..pos], &s[pos + 1..]),
		None => (s, ""),
	}
}

/// Render the image buffer as ANSI true colour blocks; each output row uses
/// two buffer rows (G/R in the first, B in the second).
pub fn render_image(buf: &[u32], out: &mut dyn Write) -> io::Result<()> {
	assert!(buf.len() >= IMAGE_WORDS);
	for y in 0..IMAGE_HEIGHT {
		for x in 0..IMAGE_WIDTH {
			let first = buf[(y * 2) * IMAGE_WIDTH + x];
			let second = buf[(y * 2 + 1) * IMAGE_WIDTH + x];
			let g = (first >> 8) & 0xff;
			let r = first & 0xff;
			let b = (second >> 8) & 0xff;
			write!(out, "\x1b[48;2;{};{};{}m ", r, g, b)?;
		}
		writeln!(out, "\x1b[0m")?;
	}
	Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
	Continue,
	Exit,
}

pub struct Console<P: Platform> {
	platform: P,
	editor: LineEditor,
}

impl<P: Platform> Console<P> {
	pub fn new(platform: P, echo: bool) -> Self {
		Console {
			platform,
			editor: LineEditor::new(echo),
		}
	}

	pub fn into_platform(self) -> P {
		self.platform
	}

	pub fn prompt(&self, out: &mut dyn Write) -> io::Result<()> {
		write!(out, "{}", PROMPT)?;
		out.flush()
	}

	pub fn help(&self, out: &mut dyn Write) -> io::Result<()> {
		writeln!(out, "\n{} {}\n", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))?;
		writeln!(out, "Available commands:")?;
		for (name, about) in COMMANDS {
			writeln!(out, "{:<18} - {}", name, about)?;
		}
		Ok(())
	}

	pub fn camera_init(&mut self, out: &mut dyn Write) -> io::Result<bool> {
		let ok = self.platform.camera_init();
		writeln!(out, "camera init {}", if ok { "done" } else { "failed" })?;
		Ok(ok)
	}

	/// Run one command line; unknown commands are ignored.
	pub fn execute(&mut self, line: &str, out: &mut dyn Write) -> crate::AResult<Flow> {
		let (token, args) = get_token(line.trim_start());
		match token {
			"help" => self.help(out)?,
			"reboot" => self.platform.reboot(),
			"cam_init" => {
				self.camera_init(out)?;
			},
			"chip_id" => {
				let id = self.platform.camera_chip_id();
				writeln!(out, "IMX258_REG_CHIP_ID {:04x}", id)?;
			},
			"lcd_init" => self.platform.lcd_init()?,
			"lcd_fill" => {
				let (colour, _) = get_token(args.trim());
				let colour = st7735::parse_colour(if colour.is_empty() { "red" } else { colour })?;
				self.platform.lcd_fill(colour)?;
			},
			"freq" => {
				writeln!(out, "Byte clk freq: {}Hz", self.platform.byte_clock_frequency())?;
			},
			"data" => {
				for _ in 0..MIPI_SAMPLES {
					let s = self.platform.mipi_sample();
					writeln!(out, "{:08x} {:08x} {:01x}", s.header, s.data, s.sync)?;
				}
			},
			"packet" => {
				let mut buf = vec![0u32; PACKET_WORDS];
				self.platform.read_packet(&mut buf)?;
				for word in buf {
					writeln!(out, "{:08x}", word)?;
				}
			},
			"image" => {
				let mut buf = vec![0u32; IMAGE_WORDS];
				self.platform.read_image(&mut buf)?;
				render_image(&buf, out)?;
			},
			"exit" | "quit" => return Ok(Flow::Exit),
			"" => (),
			_ => debug!("unknown command {:?}", token),
		}
		Ok(Flow::Continue)
	}

	/// Read commands until "exit" or end of input; failing commands are
	/// logged and the console keeps going.
	pub fn run(&mut self, input: &mut dyn Read, out: &mut dyn Write) -> crate::AResult<()> {
		self.help(out)?;
		self.prompt(out)?;
		for c in input.bytes() {
			let line = match self.editor.feed(c?, out)? {
				Some(line) => line,
				None => {
					out.flush()?;
					continue;
				},
			};
			match self.execute(&line, out) {
				Ok(Flow::Exit) => return Ok(()),
				Ok(Flow::Continue) => (),
				Err(e) => error!("{}: {}", line, e),
			}
			self.prompt(out)?;
		}
		Ok(())
	}
}
