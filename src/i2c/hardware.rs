use std::hint;
use std::time::{
	Duration,
	Instant,
};

/// Lowest bus frequency we accept; below that the period math isn't useful
/// anymore and it's most likely a typo.
pub const MIN_BUS_HZ: u32 = 1_000;

/// Safe default in the 10-100 kHz range, so SMBus devices are fine too.
pub const DEFAULT_BUS_HZ: u32 = 50_000;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct OutLines {
	pub output_enable: bool,
	pub clock: bool,
	pub data: bool,
}

impl OutLines {
	pub const fn new(output_enable: bool, clock: bool, data: bool) -> Self {
		OutLines {
			output_enable,
			clock,
			data,
		}
	}

	/// whether we pull the data line low (open drain: "1" is just released)
	pub fn drives_data_low(&self) -> bool {
		self.output_enable && !self.data
	}
}

/// Platform access to the two bus lines.
///
/// `set_lines` has to update all three signals at once; the clock line is
/// driven independent of `output_enable`, which only gates the data line.
pub trait Lines {
	fn set_lines(&mut self, lines: OutLines);
	fn read_data(&mut self) -> bool;
}

impl<'a, L: ?Sized + Lines> Lines for &'a mut L {
	fn set_lines(&mut self, lines: OutLines) {
		L::set_lines(*self, lines)
	}

	fn read_data(&mut self) -> bool {
		L::read_data(*self)
	}
}

/// Wait for a number of basic periods (a quarter bit time each).
pub trait Delay {
	fn wait(&mut self, periods: u32);
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Timing {
	pub clock_hz: u32,
	pub bus_hz: u32,
}

impl Timing {
	pub fn new(clock_hz: u32, bus_hz: u32) -> crate::AResult<Self> {
		ensure!(bus_hz >= MIN_BUS_HZ, "bus frequency {} Hz too low (minimum {} Hz)", bus_hz, MIN_BUS_HZ);
		ensure!(u64::from(bus_hz) * 4 <= u64::from(clock_hz),
			"bus frequency {} Hz too high for host clock {} Hz (maximum {} Hz)", bus_hz, clock_hz, clock_hz / 4
		);
		Ok(Timing { clock_hz, bus_hz })
	}

	/// host clock cycles per basic period
	pub fn period_cycles(&self) -> u32 {
		// same rounding as "cycles per bit time, divided by four"
		(self.clock_hz / self.bus_hz) / 4
	}

	/// `period_cycles` worth of host clock
	pub fn period(&self) -> Duration {
		let nanos = u64::from(self.period_cycles()) * 1_000_000_000 / u64::from(self.clock_hz);
		Duration::from_nanos(nanos)
	}
}

/// Busy waiting delay; sleeping is far too coarse for bus timing.
#[derive(Copy, Clone, Debug)]
pub struct SpinDelay {
	period: Duration,
}

impl SpinDelay {
	pub fn new(timing: Timing) -> Self {
		SpinDelay {
			period: timing.period(),
		}
	}
}

impl Delay for SpinDelay {
	fn wait(&mut self, periods: u32) {
		let duration = self.period * periods;
		let start = Instant::now();
		while start.elapsed() < duration {
			hint::spin_loop();
		}
	}
}
