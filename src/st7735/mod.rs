/* Sitronix ST7735 128x128 TFT controller, 4-wire SPI with separate D/C line */

#[allow(dead_code)]
mod consts {
	pub const SWRESET: u8 = 0x01;
	pub const SLPOUT: u8 = 0x11;
	pub const NORON: u8 = 0x13;
	pub const INVOFF: u8 = 0x20;
	pub const DISPON: u8 = 0x29;
	pub const CASET: u8 = 0x2a;
	pub const RASET: u8 = 0x2b;
	pub const RAMWR: u8 = 0x2c;
	pub const MADCTL: u8 = 0x36;
	pub const COLMOD: u8 = 0x3a;

	pub const FRMCTR1: u8 = 0xb1;
	pub const FRMCTR2: u8 = 0xb2;
	pub const FRMCTR3: u8 = 0xb3;
	pub const INVCTR: u8 = 0xb4;
	pub const PWCTR1: u8 = 0xc0;
	pub const PWCTR2: u8 = 0xc1;
	pub const PWCTR3: u8 = 0xc2;
	pub const PWCTR4: u8 = 0xc3;
	pub const PWCTR5: u8 = 0xc4;
	pub const VMCTR1: u8 = 0xc5;
}

use self::consts::*;

pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 128;

// RGB565
pub const BLACK: u16 = 0x0000;
pub const WHITE: u16 = 0xffff;
pub const RED: u16 = 0xf800;
pub const GREEN: u16 = 0x07e0;
pub const BLUE: u16 = 0x001f;

/// Access to the display controller; every write blocks until the byte (or
/// pixel) is out.
pub trait DisplayBus {
	fn set_reset(&mut self, reset: bool) -> crate::AResult<()>;
	fn write_command(&mut self, command: u8) -> crate::AResult<()>;
	fn write_param(&mut self, param: u8) -> crate::AResult<()>;
	fn write_pixel(&mut self, colour: u16) -> crate::AResult<()>;
	fn delay_ms(&mut self, ms: u32);
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct DisplayStep {
	pub command: u8,
	pub params: &'static [u8],
	/// wait after the command
	pub delay_ms: u32,
}

const fn step(command: u8, params: &'static [u8], delay_ms: u32) -> DisplayStep {
	DisplayStep { command, params, delay_ms }
}

pub const INIT_PROGRAM: [DisplayStep; 19] = [
	step(SWRESET, &[], 150),
	step(SLPOUT, &[], 150),
	// frame rate: normal, idle, partial (dot / line inversion)
	step(FRMCTR1, &[0x01, 0x2c, 0x2d], 0),
	step(FRMCTR2, &[0x01, 0x2c, 0x2d], 0),
	step(FRMCTR3, &[0x01, 0x2c, 0x2d, 0x01, 0x2c, 0x2d], 0),
	step(INVCTR, &[0x07], 0),
	// power
	step(PWCTR1, &[0xa2, 0x02, 0x84], 0),
	step(PWCTR2, &[0xc5], 0),
	step(PWCTR3, &[0x0a, 0x00], 0),
	step(PWCTR4, &[0x8a, 0x2a], 0),
	step(PWCTR5, &[0x8a, 0xee], 0),
	step(VMCTR1, &[0x0e], 0),
	step(INVOFF, &[], 0),
	// row/column order, bottom-to-top refresh
	step(MADCTL, &[0xc8], 0),
	// 16-bit colour
	step(COLMOD, &[0x05], 0),
	step(CASET, &[0x00, 0x00, 0x00, (WIDTH - 1) as u8], 0),
	step(RASET, &[0x00, 0x00, 0x00, (HEIGHT - 1) as u8], 150),
	step(NORON, &[], 150),
	step(DISPON, &[], 0),
];

pub fn run_program<B: DisplayBus + ?Sized>(display: &mut B, program: &[DisplayStep]) -> crate::AResult<()> {
	for (index, s) in program.iter().enumerate() {
		with_context!(("display command {} ({:02x}) failed", index, s.command), {
			display.write_command(s.command)?;
			for &param in s.params {
				display.write_param(param)?;
			}
			Ok(())
		})?;
		if s.delay_ms > 0 {
			display.delay_ms(s.delay_ms);
		}
	}
	Ok(())
}

pub fn reset<B: DisplayBus + ?Sized>(display: &mut B) -> crate::AResult<()> {
	display.set_reset(true)?;
	display.delay_ms(10);
	display.set_reset(false)?;
	display.delay_ms(10);
	Ok(())
}

/// Reset, configure and switch on the display; paints it red afterwards so
/// you can tell it worked.
pub fn init<B: DisplayBus + ?Sized>(display: &mut B) -> crate::AResult<()> {
	reset(display)?;
	run_program(display, &INIT_PROGRAM)?;
	fill(display, RED)?;
	debug!("display initialized");
	Ok(())
}

pub fn fill<B: DisplayBus + ?Sized>(display: &mut B, colour: u16) -> crate::AResult<()> {
	display.write_command(RAMWR)?;
	for _ in 0..WIDTH * HEIGHT {
		display.write_pixel(colour)?;
	}
	Ok(())
}

pub fn parse_colour(s: &str) -> crate::AResult<u16> {
	Ok(match s {
		"black" => BLACK,
		"white" => WHITE,
		"red" => RED,
		"green" => GREEN,
		"blue" => BLUE,
		_ => with_context!(("invalid colour {:?} (name or RGB565 value)", s), {
			let value = crate::config::parse_number(s)?;
			ensure!(value <= u64::from(u16::max_value()), "0x{:x} doesn't fit in 16 bits", value);
			Ok(value as u16)
		})?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Clone, Copy, PartialEq, Eq, Debug)]
	enum Op {
		Reset(bool),
		Command(u8),
		Param(u8),
		Pixel(u16),
		Delay(u32),
	}

	#[derive(Default)]
	struct Recording {
		ops: Vec<Op>,
		fail_on_command: Option<u8>,
	}

	impl DisplayBus for Recording {
		fn set_reset(&mut self, reset: bool) -> crate::AResult<()> {
			self.ops.push(Op::Reset(reset));
			Ok(())
		}
		fn write_command(&mut self, command: u8) -> crate::AResult<()> {
			ensure!(Some(command) != self.fail_on_command, "SPI timeout");
			self.ops.push(Op::Command(command));
			Ok(())
		}
		fn write_param(&mut self, param: u8) -> crate::AResult<()> {
			self.ops.push(Op::Param(param));
			Ok(())
		}
		fn write_pixel(&mut self, colour: u16) -> crate::AResult<()> {
			self.ops.push(Op::Pixel(colour));
			Ok(())
		}
		fn delay_ms(&mut self, ms: u32) {
			self.ops.push(Op::Delay(ms));
		}
	}

	#[test]
	fn init_order() {
		let mut display = Recording::default();
		init(&mut display).unwrap();
		let ops = &display.ops;

		assert_eq!(&ops[..5], &[Op::Reset(true), Op::Delay(10), Op::Reset(false), Op::Delay(10), Op::Command(SWRESET)]);
		assert_eq!(ops[5], Op::Delay(150));

		// parameters follow their command directly
		let madctl = ops.iter().position(|&op| op == Op::Command(MADCTL)).unwrap();
		assert_eq!(ops[madctl + 1], Op::Param(0xc8));
		let colmod = ops.iter().position(|&op| op == Op::Command(COLMOD)).unwrap();
		assert_eq!(ops[colmod + 1], Op::Param(0x05));

		let ramwr = ops.iter().position(|&op| op == Op::Command(RAMWR)).unwrap();
		let dispon = ops.iter().position(|&op| op == Op::Command(DISPON)).unwrap();
		assert!(dispon < ramwr);
		assert_eq!(ops.len() - ramwr - 1, WIDTH * HEIGHT);
		assert!(ops[ramwr + 1..].iter().all(|&op| op == Op::Pixel(RED)));
	}

	#[test]
	fn stops_at_failing_command() {
		let mut display = Recording {
			fail_on_command: Some(PWCTR1),
			..Default::default()
		};
		let err = init(&mut display).unwrap_err();
		assert!(err.to_string().contains("display command 6 (c0) failed"), "{}", err);
		assert!(!display.ops.contains(&Op::Command(PWCTR2)));
	}

	#[test]
	fn colours() {
		assert_eq!(parse_colour("red").unwrap(), RED);
		assert_eq!(parse_colour("0x07e0").unwrap(), GREEN);
		assert_eq!(parse_colour("31").unwrap(), BLUE);
		assert_eq!(parse_colour("0xffff").unwrap(), WHITE);
		assert!(parse_colour("mauve").is_err());
		assert!(parse_colour("0x1f800").is_err());
		assert!(parse_colour("65536").is_err());
	}
}
