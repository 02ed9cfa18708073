use crate::i2c::{
	RegisterEntry,
	reg,
};

/// 1920x1080 RAW10 on 4 CSI-2 lanes, 27 MHz reference clock; taken from the
/// Lattice CrossLink-NX reference design.
pub const REFERENCE_DESIGN: [RegisterEntry; 81] = [
	// standby while configuring
	reg(0x0100, 0x00),
	// 27 MHz external clock; corrupt frame masking, fast standby, 4 CSI lanes
	reg(0x0136, 0x1b),
	reg(0x0105, 0x00),
	reg(0x0106, 0x00),
	reg(0x0114, 0x03),
	// no HDR
	reg(0x0220, 0x00),
	reg(0x0221, 0x11),
	reg(0x0222, 0x01),
	// frame: 0x045c lines of 0x1518 pixels, full 0x0eff x 0x086f array
	reg(0x0340, 0x04),
	reg(0x0341, 0x5c),
	reg(0x0342, 0x15),
	reg(0x0343, 0x18),
	reg(0x0344, 0x00),
	reg(0x0345, 0x00),
	reg(0x0346, 0x00),
	reg(0x0347, 0x00),
	reg(0x0348, 0x0e),
	reg(0x0349, 0xff),
	reg(0x034a, 0x08),
	reg(0x034b, 0x6f),
	// readout increments
	reg(0x0381, 0x01),
	reg(0x0383, 0x01),
	reg(0x0385, 0x01),
	reg(0x0387, 0x01),
	// vertical 1/2 binning (addition)
	reg(0x0900, 0x00),
	reg(0x0901, 0x12),
	reg(0x0902, 0x00),
	// RAW10 output
	reg(0x0112, 0x0a),
	reg(0x0113, 0x0a),
	// 1920x1080 output window, no scaling
	reg(0x034c, 0x07),
	reg(0x034d, 0x80),
	reg(0x034e, 0x04),
	reg(0x034f, 0x38),
	reg(0x0401, 0x00),
	reg(0x0408, 0x00),
	reg(0x0409, 0x00),
	reg(0x040a, 0x00),
	reg(0x040b, 0x00),
	reg(0x040c, 0x07),
	reg(0x040d, 0x80),
	reg(0x040e, 0x04),
	reg(0x040f, 0x38),
	// PLL: dual mode
	reg(0x0301, 0x05),
	reg(0x0303, 0x02),
	reg(0x0305, 0x04),
	reg(0x0306, 0x00),
	reg(0x0307, 0x6e),
	reg(0x0309, 0x0a),
	reg(0x030b, 0x02),
	reg(0x0310, 0x01),
	reg(0x030d, 0x02),
	reg(0x030e, 0x00),
	reg(0x030f, 0x37),
	// CSI link bit rate
	reg(0x0820, 0x05),
	reg(0x0821, 0xcd),
	reg(0x0822, 0x00),
	reg(0x0823, 0x00),
	// defect correction; master mode
	reg(0x0b06, 0x01),
	reg(0x5a5c, 0x01),
	// exposure and gains
	reg(0x0202, 0x03),
	reg(0x0203, 0x20),
	reg(0x0224, 0x01),
	reg(0x0225, 0x80),
	reg(0x0204, 0x01),
	reg(0x0205, 0x80),
	reg(0x020e, 0x03),
	reg(0x020f, 0x00),
	reg(0x0210, 0x04),
	reg(0x0211, 0x80),
	reg(0x0212, 0x05),
	reg(0x0213, 0x00),
	reg(0x0214, 0x03),
	reg(0x0215, 0x00),
	reg(0x0216, 0x00),
	reg(0x0217, 0x00),
	// continuous clock during blanking, automatic frame length, DPHY from UI control
	reg(0x4040, 0x00),
	reg(0x0350, 0x00),
	reg(0x0808, 0x00),
	// no test pattern
	reg(0x0600, 0x00),
	reg(0x0601, 0x00),
	// streaming on; needs everything above
	reg(0x0100, 0x01),
];
