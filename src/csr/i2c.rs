use crate::i2c::{
	Lines,
	OutLines,
};

use super::CsrAccess;

// LiteX bitbang I2CMaster: "w" register fields
const W_SCL: u32 = 0x01;
const W_OE: u32 = 0x02;
const W_SDA: u32 = 0x04;
// "r" register fields
const R_SDA: u32 = 0x01;

/// Bus lines through the `i2c_w` / `i2c_r` CSRs; the gateware only drives
/// SDA while OE is set.
pub struct CsrI2c<C: CsrAccess> {
	csr: C,
	w: usize,
	r: usize,
}

impl<C: CsrAccess> CsrI2c<C> {
	pub fn new(csr: C, w: usize, r: usize) -> Self {
		CsrI2c { csr, w, r }
	}

	pub fn into_inner(self) -> C {
		self.csr
	}
}

impl<C: CsrAccess> Lines for CsrI2c<C> {
	fn set_lines(&mut self, lines: OutLines) {
		let oe = if lines.output_enable { W_OE } else { 0 };
		let scl = if lines.clock { W_SCL } else { 0 };
		let sda = if lines.data { W_SDA } else { 0 };
		self.csr.write_csr(self.w, oe | scl | sda);
	}

	fn read_data(&mut self) -> bool {
		0 != self.csr.read_csr(self.r) & R_SDA
	}
}
