/* Sony IMX258 image sensor; register addresses as in the linux driver (drivers/media/i2c/imx258.c) */

use crate::i2c::{
	Bus,
	Delay,
	Lines,
	SequenceFailed,
};

mod sequence;

pub use self::sequence::REFERENCE_DESIGN;

pub const DEVICE_ADDRESS: u8 = 0x1a;

pub const REG_MODE_SELECT: u16 = 0x0100;
pub const MODE_STANDBY: u8 = 0x00;
pub const MODE_STREAMING: u8 = 0x01;

pub const REG_CHIP_ID: u16 = 0x0016;
pub const CHIP_ID: u16 = 0x0258;

/// Log the chip id (whatever comes back), then program the sensor and start
/// streaming.
pub fn init<L: Lines, D: Delay>(bus: &mut Bus<L, D>) -> Result<(), SequenceFailed> {
	let chip_id = read_chip_id(bus);
	info!("IMX258_REG_CHIP_ID {:04x}", chip_id);
	if chip_id != CHIP_ID {
		warn!("unexpected IMX258 chip id {:04x} (expected {:04x})", chip_id, CHIP_ID);
	}

	bus.apply(DEVICE_ADDRESS, &REFERENCE_DESIGN)
}

pub fn read_chip_id<L: Lines, D: Delay>(bus: &mut Bus<L, D>) -> u16 {
	bus.read16(DEVICE_ADDRESS, REG_CHIP_ID)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::i2c::sim::{
		NoDelay,
		Responder,
	};

	#[test]
	fn streaming_is_enabled_last() {
		assert_eq!(REFERENCE_DESIGN[0].address, REG_MODE_SELECT);
		assert_eq!(REFERENCE_DESIGN[0].value, MODE_STANDBY);
		let last = REFERENCE_DESIGN[REFERENCE_DESIGN.len() - 1];
		assert_eq!((last.address, last.value), (REG_MODE_SELECT, MODE_STREAMING));
		assert!(REFERENCE_DESIGN[1..REFERENCE_DESIGN.len() - 1].iter().all(|e| e.address != REG_MODE_SELECT));
	}

	#[test]
	fn init_programs_sensor() {
		let mut sensor = Responder::new(DEVICE_ADDRESS);
		sensor.registers.insert(REG_CHIP_ID, 0x02);
		sensor.registers.insert(REG_CHIP_ID + 1, 0x58);
		let mut bus = Bus::new(sensor, NoDelay::default());

		assert_eq!(read_chip_id(&mut bus), CHIP_ID);
		assert_eq!(init(&mut bus), Ok(()));

		let (sensor, _) = bus.into_inner();
		let expected: Vec<(u16, u8)> = REFERENCE_DESIGN.iter().map(|e| (e.address, e.value)).collect();
		assert_eq!(sensor.writes, expected);
		assert_eq!(sensor.registers[&REG_MODE_SELECT], MODE_STREAMING);
		assert_eq!(sensor.transactions, sensor.stops);
	}

	#[test]
	fn init_without_sensor() {
		let mut bus = Bus::new(Responder::new(0x10), NoDelay::default());
		assert_eq!(read_chip_id(&mut bus), 0xffff);
		let err = init(&mut bus).unwrap_err();
		assert_eq!(err.index, 0);
		assert_eq!(err.register, REG_MODE_SELECT);
	}
}
