use crate::config::BoardConfig;
use crate::csr::{
	self,
	CsrAccess,
	CsrI2c,
	CsrLcd,
	Mapped,
};
use crate::i2c::{
	Bus,
	SpinDelay,
	Timing,
};
use crate::imx258;
use crate::st7735;

/// One sample of the MIPI receiver debug registers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MipiSample {
	pub header: u32,
	pub data: u32,
	pub sync: u32,
}

/// What the console can do with the board.
pub trait Platform {
	/// reads the chip id, then programs the camera; false if the sequence
	/// failed (details are logged)
	fn camera_init(&mut self) -> bool;
	fn camera_chip_id(&mut self) -> u16;
	fn lcd_init(&mut self) -> crate::AResult<()>;
	fn lcd_fill(&mut self, colour: u16) -> crate::AResult<()>;
	fn reboot(&mut self);
	fn byte_clock_frequency(&mut self) -> u32;
	fn mipi_sample(&mut self) -> MipiSample;
	fn read_packet(&mut self, target: &mut [u32]) -> crate::AResult<()>;
	fn read_image(&mut self, target: &mut [u32]) -> crate::AResult<()>;
}

pub struct Board {
	config: BoardConfig,
	timing: Timing,
	csr: Mapped,
}

impl Board {
	pub fn open(config: BoardConfig) -> crate::AResult<Self> {
		config.validate()?;
		let timing = config.timing()?;
		let csr = csr::open_csr_window(&config)?;
		debug!("mapped CSR window: {}", config);
		Ok(Board {
			config,
			timing,
			csr,
		})
	}

	pub fn config(&self) -> &BoardConfig {
		&self.config
	}

	pub fn camera_bus(&mut self) -> Bus<CsrI2c<&mut Mapped>, SpinDelay> {
		let lines = CsrI2c::new(&mut self.csr, self.config.csr.i2c_w, self.config.csr.i2c_r);
		Bus::new(lines, SpinDelay::new(self.timing))
	}

	pub fn lcd(&mut self) -> CsrLcd<&mut Mapped> {
		CsrLcd::new(&mut self.csr, self.config.csr)
	}

	fn read_buffer(&self, base: u64, target: &mut [u32]) -> crate::AResult<()> {
		let buffer = csr::open_buffer(&self.config, base, target.len())?;
		buffer.read_dwords(0, target);
		Ok(())
	}
}

impl Platform for Board {
	fn camera_init(&mut self) -> bool {
		imx258::init(&mut self.camera_bus()).is_ok()
	}

	fn camera_chip_id(&mut self) -> u16 {
		imx258::read_chip_id(&mut self.camera_bus())
	}

	fn lcd_init(&mut self) -> crate::AResult<()> {
		st7735::init(&mut self.lcd())
	}

	fn lcd_fill(&mut self, colour: u16) -> crate::AResult<()> {
		st7735::fill(&mut self.lcd(), colour)
	}

	fn reboot(&mut self) {
		let offset = self.config.csr.ctrl_reset;
		self.csr.write_csr(offset, 1);
	}

	fn byte_clock_frequency(&mut self) -> u32 {
		self.csr.read_csr(self.config.csr.clk_byte_freq_value)
	}

	fn mipi_sample(&mut self) -> MipiSample {
		let header = self.csr.read_csr(self.config.csr.dphy_header_in);
		let data = self.csr.read_csr(self.config.csr.hs_rx_data_in);
		let sync = self.csr.read_csr(self.config.csr.hs_rx_sync_in);
		MipiSample { header, data, sync }
	}

	fn read_packet(&mut self, target: &mut [u32]) -> crate::AResult<()> {
		let base = self.config.packet_base;
		self.read_buffer(base, target)
	}

	fn read_image(&mut self, target: &mut [u32]) -> crate::AResult<()> {
		let base = self.config.image_base;
		self.read_buffer(base, target)
	}
}
