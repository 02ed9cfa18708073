use std::thread;
use std::time::{
	Duration,
	Instant,
};

use crate::config::CsrMap;
use crate::st7735::DisplayBus;

use super::CsrAccess;

// lcd_gpio_out bits
const GPIO_DATA: u32 = 0x01; // D/C: high for parameters and pixels
const GPIO_RUN: u32 = 0x02; // RESET is active low

// LiteX SPIMaster: control = length << 8 | start; status bit 0 = done
const SPI_START: u32 = 0x0001;
const SPI_LENGTH_SHIFT: u32 = 8;
const SPI_DONE: u32 = 0x0001;
const SPI_CS0: u32 = 0x0001;

const POLL_LIMIT: usize = 0xffff;

pub fn reliable_sleep(mut duration: Duration) {
	loop {
		let now = Instant::now();
		thread::sleep(duration);
		let elapsed = now.elapsed();
		if elapsed >= duration {
			return;
		}
		duration -= elapsed;
	}
}

/// ST7735 on the SPI master CSRs, D/C and RESET on a GPIO CSR.
pub struct CsrLcd<C: CsrAccess> {
	csr: C,
	map: CsrMap,
}

impl<C: CsrAccess> CsrLcd<C> {
	pub fn new(csr: C, map: CsrMap) -> Self {
		CsrLcd { csr, map }
	}

	pub fn into_inner(self) -> C {
		self.csr
	}

	fn wait_done(&mut self) -> crate::AResult<()> {
		for _ in 0..POLL_LIMIT {
			if 0 != self.csr.read_csr(self.map.lcd_spi_status) & SPI_DONE {
				return Ok(());
			}
		}
		bail!("LCD SPI timeout - transfer never finished!");
	}

	fn transfer(&mut self, gpio: u32, data: u32, bits: u32) -> crate::AResult<()> {
		self.csr.write_csr(self.map.lcd_gpio_out, gpio);
		self.csr.write_csr(self.map.lcd_spi_cs, SPI_CS0);
		self.csr.write_csr(self.map.lcd_spi_mosi, data);
		self.csr.write_csr(self.map.lcd_spi_control, bits << SPI_LENGTH_SHIFT | SPI_START);
		self.wait_done()
	}
}

impl<C: CsrAccess> DisplayBus for CsrLcd<C> {
	fn set_reset(&mut self, reset: bool) -> crate::AResult<()> {
		self.csr.write_csr(self.map.lcd_gpio_out, if reset { 0 } else { GPIO_RUN });
		Ok(())
	}

	fn write_command(&mut self, command: u8) -> crate::AResult<()> {
		self.transfer(GPIO_RUN, u32::from(command), 8)
	}

	fn write_param(&mut self, param: u8) -> crate::AResult<()> {
		self.transfer(GPIO_RUN | GPIO_DATA, u32::from(param), 8)
	}

	fn write_pixel(&mut self, colour: u16) -> crate::AResult<()> {
		self.transfer(GPIO_RUN | GPIO_DATA, u32::from(colour), 16)
	}

	fn delay_ms(&mut self, ms: u32) {
		reliable_sleep(Duration::from_millis(u64::from(ms)));
	}
}
