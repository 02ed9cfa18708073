use std::fmt;
use std::path::PathBuf;

use crate::i2c::{
	DEFAULT_BUS_HZ,
	Timing,
};

pub const DEFAULT_CLOCK_HZ: u32 = 75_000_000;
pub const DEFAULT_MEMORY: &str = "/dev/mem";
pub const DEFAULT_CSR_BASE: u64 = 0xf000_0000;
pub const DEFAULT_CSR_LEN: usize = 0x1_0000;

/// Accepts decimal, or hex with "0x" prefix (and '_' separators).
pub fn parse_number(s: &str) -> crate::AResult<u64> {
	let s = s.trim().replace('_', "");
	if s.starts_with("0x") || s.starts_with("0X") {
		with_context!(("invalid hex number {:?}", s), {
			Ok(u64::from_str_radix(&s[2..], 16)?)
		})
	} else {
		with_context!(("invalid number {:?}", s), {
			Ok(s.parse::<u64>()?)
		})
	}
}

/// CSR offsets relative to the CSR base; take them from the generated
/// `csr.h` (`CSR_*_ADDR - CSR_BASE`) when the gateware changes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CsrMap {
	pub ctrl_reset: usize,
	pub i2c_w: usize,
	pub i2c_r: usize,
	pub lcd_gpio_out: usize,
	pub lcd_spi_control: usize,
	pub lcd_spi_status: usize,
	pub lcd_spi_mosi: usize,
	pub lcd_spi_cs: usize,
	pub clk_byte_freq_value: usize,
	pub dphy_header_in: usize,
	pub hs_rx_data_in: usize,
	pub hs_rx_sync_in: usize,
}

impl Default for CsrMap {
	fn default() -> Self {
		CsrMap {
			ctrl_reset: 0x0000,
			i2c_w: 0x3000,
			i2c_r: 0x3004,
			lcd_gpio_out: 0x3800,
			lcd_spi_control: 0x4000,
			lcd_spi_status: 0x4004,
			lcd_spi_mosi: 0x4008,
			lcd_spi_cs: 0x4010,
			clk_byte_freq_value: 0x4800,
			dphy_header_in: 0x5000,
			hs_rx_data_in: 0x5004,
			hs_rx_sync_in: 0x5008,
		}
	}
}

impl CsrMap {
	fn slot(&mut self, name: &str) -> Option<&mut usize> {
		Some(match name {
			"ctrl_reset" => &mut self.ctrl_reset,
			"i2c_w" => &mut self.i2c_w,
			"i2c_r" => &mut self.i2c_r,
			"lcd_gpio_out" => &mut self.lcd_gpio_out,
			"lcd_spi_control" => &mut self.lcd_spi_control,
			"lcd_spi_status" => &mut self.lcd_spi_status,
			"lcd_spi_mosi" => &mut self.lcd_spi_mosi,
			"lcd_spi_cs" => &mut self.lcd_spi_cs,
			"clk_byte_freq_value" => &mut self.clk_byte_freq_value,
			"dphy_header_in" => &mut self.dphy_header_in,
			"hs_rx_data_in" => &mut self.hs_rx_data_in,
			"hs_rx_sync_in" => &mut self.hs_rx_sync_in,
			_ => return None,
		})
	}

	/// Override one offset from a "name=offset" string.
	pub fn set(&mut self, assignment: &str) -> crate::AResult<()> {
		let mut parts = assignment.splitn(2, '=');
		let name = parts.next().unwrap_or("").trim();
		let value = match parts.next() {
			Some(v) => v,
			None => bail!("expected NAME=OFFSET, got {:?}", assignment),
		};
		let offset = parse_number(value)? as usize;
		ensure!(offset & 3 == 0, "CSR offset for {} not 32-bit aligned: 0x{:x}", name, offset);
		match self.slot(name) {
			Some(slot) => *slot = offset,
			None => bail!("unknown CSR {:?}", name),
		}
		Ok(())
	}

	pub fn max_offset(&self) -> usize {
		*[
			self.ctrl_reset, self.i2c_w, self.i2c_r,
			self.lcd_gpio_out, self.lcd_spi_control, self.lcd_spi_status, self.lcd_spi_mosi, self.lcd_spi_cs,
			self.clk_byte_freq_value, self.dphy_header_in, self.hs_rx_data_in, self.hs_rx_sync_in,
		].iter().max().unwrap_or(&0)
	}
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BoardConfig {
	/// file to map the CSR window (and buffers) from
	pub memory: PathBuf,
	pub csr_base: u64,
	pub csr_len: usize,
	pub csr: CsrMap,
	pub packet_base: u64,
	pub image_base: u64,
	/// host clock the bus timing is derived from
	pub clock_hz: u32,
	pub i2c_hz: u32,
}

impl Default for BoardConfig {
	fn default() -> Self {
		BoardConfig {
			memory: PathBuf::from(DEFAULT_MEMORY),
			csr_base: DEFAULT_CSR_BASE,
			csr_len: DEFAULT_CSR_LEN,
			csr: CsrMap::default(),
			packet_base: 0xb000_0000,
			image_base: 0xb001_0000,
			clock_hz: DEFAULT_CLOCK_HZ,
			i2c_hz: DEFAULT_BUS_HZ,
		}
	}
}

impl BoardConfig {
	pub fn timing(&self) -> crate::AResult<Timing> {
		Timing::new(self.clock_hz, self.i2c_hz)
	}

	pub fn validate(&self) -> crate::AResult<()> {
		self.timing()?;
		let max_offset = self.csr.max_offset();
		ensure!(max_offset < self.csr_len && self.csr_len - max_offset >= 4,
			"CSR offset 0x{:x} outside of CSR window (0x{:x} bytes)", max_offset, self.csr_len
		);
		Ok(())
	}
}

impl fmt::Display for BoardConfig {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f,
			"{} @ 0x{:08x}+0x{:x}, clock {} Hz, i2c {} Hz",
			self.memory.display(), self.csr_base, self.csr_len, self.clock_hz, self.i2c_hz,
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn numbers() {
		assert_eq!(parse_number("75000000").unwrap(), 75_000_000);
		assert_eq!(parse_number("75_000_000").unwrap(), 75_000_000);
		assert_eq!(parse_number("0xf0000000").unwrap(), 0xf000_0000);
		assert_eq!(parse_number(" 0X1f ").unwrap(), 0x1f);
		assert!(parse_number("0x").is_err());
		assert!(parse_number("12k").is_err());
	}

	#[test]
	fn defaults_are_valid() {
		let config = BoardConfig::default();
		config.validate().unwrap();
		assert!(config.i2c_hz < 100_000);
		assert_eq!(config.timing().unwrap().period_cycles(), 375);
	}

	#[test]
	fn override_csr() {
		let mut map = CsrMap::default();
		map.set("i2c_w=0x2800").unwrap();
		map.set("i2c_r = 10244").unwrap();
		assert_eq!(map.i2c_w, 0x2800);
		assert_eq!(map.i2c_r, 0x2804);
		assert!(map.set("i2c_w").is_err());
		assert!(map.set("i2c_q=0x10").is_err());
		assert!(map.set("i2c_w=0x2801").is_err());
	}

	#[test]
	fn rejects_bad_config() {
		let mut config = BoardConfig::default();
		config.i2c_hz = 40_000_000;
		assert!(config.validate().is_err());

		let mut config = BoardConfig::default();
		config.csr.i2c_w = config.csr_len;
		assert!(config.validate().is_err());

		let mut config = BoardConfig::default();
		config.csr.set("i2c_w=0xfffffffffffffffc").unwrap();
		assert!(config.validate().is_err());

		let mut config = BoardConfig::default();
		config.csr.i2c_w = config.csr_len - 4;
		config.validate().unwrap();
	}
}
