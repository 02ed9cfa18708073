/// Bit-banged two-wire bus ("I²C") master for devices with 16-bit register
/// addresses.
///
/// There is no bus controller; the platform only gives us a register to set
/// OE/SCL/SDA at once, and one to read SDA back. Everything else is timing:
///
/// - Basic period: host clock / (4 * bus frequency)
/// - START: SDA 1 -> 0 while SCL high
/// - STOP: SDA 0 -> 1 while SCL high, then release the bus
/// - bit: set SDA while SCL low, SCL high for two periods (receiver samples
///   in the middle), SCL low again
/// - byte: 8 bits, highest bit first; then the receiver pulls SDA low for
///   one bit to acknowledge
///
/// Register write: START, address+W, register high, register low, value,
/// STOP. Register read: START, address+W, register high, register low,
/// START, address+R, data..., STOP.
///
/// Not supported: clock stretching, multiple masters.

mod hardware;
mod low_level;
mod operations;

#[cfg(test)]
pub(crate) mod sim;

pub use self::hardware::{
	DEFAULT_BUS_HZ,
	Delay,
	Lines,
	MIN_BUS_HZ,
	OutLines,
	SpinDelay,
	Timing,
};

pub use self::low_level::{
	Bus,
	Transaction,
};

pub use self::operations::{
	Nack,
	READ16_FAILED,
	READ8_FAILED,
	RegisterEntry,
	SequenceFailed,
	address_read,
	address_write,
	reg,
};
