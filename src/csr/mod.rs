/// LiteX CSR access from a host that can map the SoC bus (through a PCIe
/// bridge, or on the SoC itself via `/dev/mem`).
///
/// CSRs are 32 bits wide, little endian, at 4 byte steps; the offsets of the
/// individual registers depend on the gateware and are part of the
/// configuration (`config::CsrMap`).

mod i2c;
mod lcd;
mod mapped;

use crate::config::BoardConfig;

pub use self::i2c::CsrI2c;

pub use self::lcd::{
	CsrLcd,
	reliable_sleep,
};

pub use self::mapped::{
	Mapped,
	open_mapped,
};

pub trait CsrAccess {
	fn read_csr(&self, offset: usize) -> u32;
	fn write_csr(&mut self, offset: usize, data: u32);
}

impl<'a, C: ?Sized + CsrAccess> CsrAccess for &'a mut C {
	fn read_csr(&self, offset: usize) -> u32 {
		C::read_csr(*self, offset)
	}

	fn write_csr(&mut self, offset: usize, data: u32) {
		C::write_csr(*self, offset, data)
	}
}

pub fn open_csr_window(config: &BoardConfig) -> crate::AResult<Mapped> {
	with_context!(("couldn't map CSR window 0x{:08x} from {}", config.csr_base, config.memory.display()), {
		Ok(open_mapped(&config.memory, config.csr_base, config.csr_len)?)
	})
}

pub fn open_buffer(config: &BoardConfig, base: u64, words: usize) -> crate::AResult<Mapped> {
	// mappings are in whole pages anyway
	let len = (words * 4 + 0xfff) & !0xfff;
	with_context!(("couldn't map buffer 0x{:08x} from {}", base, config.memory.display()), {
		Ok(open_mapped(&config.memory, base, len)?)
	})
}
