//! Test doubles for the bus: a plain line recorder, a zero-time delay and a
//! simulated register device decoding the line transitions.

use std::collections::{
	HashMap,
	VecDeque,
};

use super::{
	Delay,
	Lines,
	OutLines,
};

#[derive(Default, Debug)]
pub struct NoDelay {
	pub periods: u64,
}

impl Delay for NoDelay {
	fn wait(&mut self, periods: u32) {
		self.periods += u64::from(periods);
	}
}

/// Records every line update; reads come from a queue (released line reads
/// as high once the queue is empty).
#[derive(Default, Debug)]
pub struct Recorder {
	pub history: Vec<OutLines>,
	input: VecDeque<bool>,
}

impl Recorder {
	pub fn with_input(input: Vec<bool>) -> Self {
		Recorder {
			history: Vec::new(),
			input: input.into(),
		}
	}

	fn count_data_edges_while_clock_high(&self, rising: bool) -> usize {
		self.history.windows(2)
			.filter(|w| w[0].clock && w[1].clock)
			.filter(|w| {
				let (before, after) = (!w[0].drives_data_low(), !w[1].drives_data_low());
				before != after && after == rising
			})
			.count()
	}

	pub fn starts(&self) -> usize {
		self.count_data_edges_while_clock_high(false)
	}

	pub fn stops(&self) -> usize {
		self.count_data_edges_while_clock_high(true)
	}
}

impl Lines for Recorder {
	fn set_lines(&mut self, lines: OutLines) {
		self.history.push(lines);
	}

	fn read_data(&mut self) -> bool {
		self.input.pop_front().unwrap_or(true)
	}
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Stage {
	// not addressed (or refused); wait for next START
	Idle,
	Address,
	RegisterHigh,
	RegisterLow,
	Value,
	Transmit,
}

/// Simulated device with 16-bit register addresses and 8-bit registers,
/// auto-incrementing the register pointer.
#[derive(Debug)]
pub struct Responder {
	pub address: u8,
	pub registers: HashMap<u16, u8>,
	/// refuse (don't acknowledge) the value byte of the n-th write attempt
	pub refuse_write: Option<usize>,
	/// refuse the n-th register address byte (two per access, high byte
	/// first)
	pub refuse_register: Option<usize>,

	/// acknowledged writes, in order
	pub writes: Vec<(u16, u8)>,
	/// value bytes received, acknowledged or not
	pub write_attempts: usize,
	/// register address bytes received, acknowledged or not
	pub register_bytes: usize,
	/// START conditions on an idle bus
	pub transactions: usize,
	/// START conditions inside a transaction
	pub restarts: usize,
	pub stops: usize,

	// line state as seen on the bus
	clock: bool,
	data: bool,
	master_low: bool,
	slave_low: bool,
	in_frame: bool,

	stage: Stage,
	next_stage: Stage,
	// rising clock edges seen in current byte (9 with acknowledge)
	clocks: u8,
	shift: u8,
	pointer: u16,
	master_ack: bool,
}

impl Responder {
	pub fn new(address: u8) -> Self {
		Responder {
			address,
			registers: HashMap::new(),
			refuse_write: None,
			refuse_register: None,
			writes: Vec::new(),
			write_attempts: 0,
			register_bytes: 0,
			transactions: 0,
			restarts: 0,
			stops: 0,
			clock: true,
			data: true,
			master_low: false,
			slave_low: false,
			in_frame: false,
			stage: Stage::Idle,
			next_stage: Stage::Idle,
			clocks: 0,
			shift: 0,
			pointer: 0,
			master_ack: false,
		}
	}

	fn bus_data(&self) -> bool {
		!(self.master_low || self.slave_low)
	}

	fn receiving(&self) -> bool {
		match self.stage {
			Stage::Address | Stage::RegisterHigh | Stage::RegisterLow | Stage::Value => true,
			_ => false,
		}
	}

	fn on_start(&mut self) {
		if self.in_frame {
			self.restarts += 1;
		} else {
			self.transactions += 1;
		}
		self.in_frame = true;
		self.stage = Stage::Address;
		self.clocks = 0;
		self.shift = 0;
		self.slave_low = false;
	}

	fn on_stop(&mut self) {
		self.stops += 1;
		self.in_frame = false;
		self.stage = Stage::Idle;
		self.slave_low = false;
	}

	fn on_rising(&mut self) {
		if self.stage == Stage::Idle {
			return;
		}
		self.clocks += 1;
		if self.receiving() {
			if self.clocks <= 8 {
				self.shift = (self.shift << 1) | (self.data as u8);
			}
		} else if self.clocks == 9 {
			self.master_ack = !self.data;
		}
	}

	fn refuse_register_byte(&mut self) -> bool {
		let n = self.register_bytes;
		self.register_bytes += 1;
		Some(n) == self.refuse_register
	}

	// returns whether to acknowledge; sets next_stage
	fn on_byte(&mut self, byte: u8) -> bool {
		if (self.stage == Stage::RegisterHigh || self.stage == Stage::RegisterLow) && self.refuse_register_byte() {
			self.next_stage = Stage::Idle;
			return false;
		}
		match self.stage {
			Stage::Address => {
				if byte >> 1 != self.address {
					self.next_stage = Stage::Idle;
					return false;
				}
				self.next_stage = if byte & 1 == 0 { Stage::RegisterHigh } else { Stage::Transmit };
			},
			Stage::RegisterHigh => {
				self.pointer = u16::from(byte) << 8;
				self.next_stage = Stage::RegisterLow;
			},
			Stage::RegisterLow => {
				self.pointer |= u16::from(byte);
				self.next_stage = Stage::Value;
			},
			Stage::Value => {
				let attempt = self.write_attempts;
				self.write_attempts += 1;
				if Some(attempt) == self.refuse_write {
					self.next_stage = Stage::Idle;
					return false;
				}
				self.registers.insert(self.pointer, byte);
				self.writes.push((self.pointer, byte));
				self.pointer = self.pointer.wrapping_add(1);
				self.next_stage = Stage::Value;
			},
			Stage::Idle | Stage::Transmit => unreachable!(),
		}
		true
	}

	fn load_output(&mut self) {
		self.shift = self.registers.get(&self.pointer).cloned().unwrap_or(0xff);
		self.pointer = self.pointer.wrapping_add(1);
		self.slave_low = self.shift & 0x80 == 0;
	}

	fn on_falling(&mut self) {
		match self.stage {
			Stage::Idle => (),
			_ if self.receiving() => {
				if self.clocks == 8 {
					let byte = self.shift;
					self.slave_low = self.on_byte(byte);
				} else if self.clocks == 9 {
					self.slave_low = false;
					self.clocks = 0;
					self.shift = 0;
					self.stage = self.next_stage;
					if self.stage == Stage::Transmit {
						self.load_output();
					}
				}
			},
			_ => {
				if self.clocks < 8 {
					self.slave_low = self.shift & (0x80 >> self.clocks) == 0;
				} else if self.clocks == 8 {
					self.slave_low = false;
				} else {
					self.clocks = 0;
					if self.master_ack {
						self.load_output();
					} else {
						self.stage = Stage::Idle;
					}
				}
			},
		}
	}
}

impl Lines for Responder {
	fn set_lines(&mut self, lines: OutLines) {
		self.master_low = lines.drives_data_low();
		let data = self.bus_data();
		let (was_clock, was_data) = (self.clock, self.data);
		self.clock = lines.clock;
		self.data = data;

		match (was_clock, lines.clock) {
			(true, true) => {
				if was_data && !data {
					self.on_start();
				} else if !was_data && data {
					self.on_stop();
				}
			},
			(false, true) => self.on_rising(),
			(true, false) => self.on_falling(),
			(false, false) => (),
		}

		// we might have changed what we drive
		self.data = self.bus_data();
	}

	fn read_data(&mut self) -> bool {
		self.bus_data()
	}
}
