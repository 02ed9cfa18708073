use failure::Fail;

use super::{
	Bus,
	Delay,
	Lines,
	Transaction,
};

/// Returned by the diagnostic reads when the device didn't respond.
pub const READ8_FAILED: u8 = 0xff;
pub const READ16_FAILED: u16 = 0xffff;

pub fn address_write(device: u8) -> u8 {
	device << 1
}

pub fn address_read(device: u8) -> u8 {
	(device << 1) | 1
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RegisterEntry {
	pub address: u16,
	pub value: u8,
}

/// Shorthand for register tables.
pub const fn reg(address: u16, value: u8) -> RegisterEntry {
	RegisterEntry { address, value }
}

/// Which step of a register access wasn't acknowledged.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Fail)]
pub enum Nack {
	#[fail(display = "device address not acknowledged")]
	Address,
	#[fail(display = "register address not acknowledged")]
	Register,
	#[fail(display = "data not acknowledged")]
	Data,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Fail)]
#[fail(display = "write {} failed (addr={:04x}, data={:02x})", index, register, value)]
pub struct SequenceFailed {
	pub index: usize,
	pub register: u16,
	pub value: u8,
	pub nack: Nack,
}

fn send_register<L: Lines, D: Delay>(tx: &mut Transaction<L, D>, device: u8, register: u16) -> Result<(), Nack> {
	if !tx.transmit_byte(address_write(device)) {
		return Err(Nack::Address);
	}
	if !tx.transmit_byte((register >> 8) as u8) {
		return Err(Nack::Register);
	}
	if !tx.transmit_byte(register as u8) {
		return Err(Nack::Register);
	}
	Ok(())
}

// write direction done; repeated START in read direction
fn start_reading<L: Lines, D: Delay>(tx: &mut Transaction<L, D>, device: u8, register: u16) -> Result<(), Nack> {
	send_register(tx, device, register)?;
	tx.restart();
	if !tx.transmit_byte(address_read(device)) {
		return Err(Nack::Address);
	}
	Ok(())
}

/// Register access for devices with 16-bit register addresses and 8-bit
/// registers.
///
/// Every access is exactly one transaction; STOP is sent on all paths.
impl<L: Lines, D: Delay> Bus<L, D> {
	pub fn write8(&mut self, device: u8, register: u16, value: u8) -> Result<(), Nack> {
		let mut tx = self.transaction();
		send_register(&mut tx, device, register)?;
		if !tx.transmit_byte(value) {
			return Err(Nack::Data);
		}
		Ok(())
	}

	pub fn try_read8(&mut self, device: u8, register: u16) -> Result<u8, Nack> {
		let mut tx = self.transaction();
		start_reading(&mut tx, device, register)?;
		Ok(tx.receive_byte(false))
	}

	// big endian: register holds the high byte, register+1 the low byte
	pub fn try_read16(&mut self, device: u8, register: u16) -> Result<u16, Nack> {
		let mut tx = self.transaction();
		start_reading(&mut tx, device, register)?;
		let high = tx.receive_byte(true);
		let low = tx.receive_byte(false);
		Ok(u16::from(high) << 8 | u16::from(low))
	}

	/// Best-effort read for diagnostics: `READ8_FAILED` if the device didn't
	/// respond (which can't be told apart from a register holding 0xff; use
	/// `try_read8` if that matters).
	pub fn read8(&mut self, device: u8, register: u16) -> u8 {
		self.try_read8(device, register).unwrap_or(READ8_FAILED)
	}

	pub fn read16(&mut self, device: u8, register: u16) -> u16 {
		self.try_read16(device, register).unwrap_or(READ16_FAILED)
	}

	/// Write all entries in order, one transaction each; stops at the first
	/// entry that isn't acknowledged. The device is left as far as it got.
	pub fn apply(&mut self, device: u8, sequence: &[RegisterEntry]) -> Result<(), SequenceFailed> {
		for (index, entry) in sequence.iter().enumerate() {
			if let Err(nack) = self.write8(device, entry.address, entry.value) {
				let failed = SequenceFailed {
					index,
					register: entry.address,
					value: entry.value,
					nack,
				};
				error!("{} ({})", failed, nack);
				return Err(failed);
			}
		}
		trace!("applied {} register writes to device {:02x}", sequence.len(), device);
		Ok(())
	}
}
