use std::ops::{
	Deref,
	DerefMut,
};

use super::{
	Delay,
	Lines,
	OutLines,
};

/// Bit-banged two-wire bus master.
///
/// All transitions are purely time driven; we never wait for the other side,
/// so an absent device just shows up as missing acknowledge.
pub struct Bus<L, D> {
	lines: L,
	delay: D,
}

impl<L: Lines, D: Delay> Bus<L, D> {
	pub fn new(lines: L, delay: D) -> Self {
		Bus { lines, delay }
	}

	pub fn into_inner(self) -> (L, D) {
		(self.lines, self.delay)
	}

	pub fn lines(&mut self) -> &mut L {
		&mut self.lines
	}

	fn drive(&mut self, output_enable: bool, clock: bool, data: bool, periods: u32) {
		self.lines.set_lines(OutLines::new(output_enable, clock, data));
		if periods > 0 {
			self.delay.wait(periods);
		}
	}

	// START condition: 1-to-0 transition of data while clock is high
	pub fn start(&mut self) {
		self.drive(true, true, true, 1);
		self.drive(true, true, false, 1);
		self.drive(true, false, false, 1);
	}

	// STOP condition: 0-to-1 transition of data while clock is high; then
	// float the bus.
	pub fn stop(&mut self) {
		self.drive(true, false, false, 1);
		self.drive(true, true, false, 1);
		self.drive(true, true, true, 1);
		self.drive(false, true, true, 0);
	}

	// call while clock is low (for at least one period); advances a full bit
	// time. clock high lasts two periods so the receiver has a full period to
	// sample.
	pub fn transmit_bit(&mut self, value: bool) {
		self.drive(true, false, value, 1);
		self.drive(true, true, value, 2);
		self.drive(true, false, value, 1);
		self.drive(false, false, false, 0); // release line
	}

	// call while clock is low; samples data in the middle of clock high
	pub fn receive_bit(&mut self) -> bool {
		self.drive(false, false, false, 1);
		self.drive(false, true, false, 1);
		let value = self.lines.read_data();
		self.delay.wait(1);
		self.drive(false, false, false, 1);
		value
	}

	/// Send a byte (highest bit first); returns whether the receiver
	/// acknowledged it.
	pub fn transmit_byte(&mut self, data: u8) -> bool {
		self.drive(false, false, false, 0);
		for bit in (0..8).rev() {
			self.transmit_bit(0 != data & (1u8 << bit));
		}
		// low from the receiver means ack
		let ack = !self.receive_bit();
		trace!("i2c tx {:02x} {}", data, if ack { "ack" } else { "nack" });
		ack
	}

	/// Receive a byte (highest bit first); `ack` tells the sender whether we
	/// want more bytes.
	pub fn receive_byte(&mut self, ack: bool) -> u8 {
		let mut data = 0u8;
		for _ in 0..8 {
			data <<= 1;
			if self.receive_bit() {
				data |= 1;
			}
		}
		self.transmit_bit(!ack);
		trace!("i2c rx {:02x} {}", data, if ack { "ack" } else { "nack" });
		data
	}

	/// Issue START and hand out a guard that issues STOP when dropped, on
	/// every path.
	pub fn transaction(&mut self) -> Transaction<L, D> {
		self.start();
		Transaction(self)
	}
}

pub struct Transaction<'a, L: Lines + 'a, D: Delay + 'a>(&'a mut Bus<L, D>);

impl<'a, L: Lines, D: Delay> Transaction<'a, L, D> {
	/// START again without releasing the bus (used to switch direction)
	pub fn restart(&mut self) {
		self.0.start();
	}
}

impl<'a, L: Lines, D: Delay> Drop for Transaction<'a, L, D> {
	fn drop(&mut self) {
		self.0.stop();
	}
}

impl<'a, L: Lines, D: Delay> Deref for Transaction<'a, L, D> {
	type Target = Bus<L, D>;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl<'a, L: Lines, D: Delay> DerefMut for Transaction<'a, L, D> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}
