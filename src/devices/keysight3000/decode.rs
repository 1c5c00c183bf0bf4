// Raw waveform codes to volts, using the constants the scope reports for the selected source.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Calibration {
	pub vert_inc: f32,          // volts per code
	pub vert_origin: f32,       // volts
	pub vert_reference: i32,    // code
}

impl Calibration {

	pub fn to_volts(&self, code:u8) -> f32 {
		// Integer code arithmetic first, then double precision, narrowed once at the end.  Doing it
		// all in f32 is off by an ulp for most codes once the origin is nonzero.
		let steps = (code as i32 - self.vert_reference) as f64 - self.vert_origin as f64;
		(steps * self.vert_inc as f64) as f32
	}

	// Decimal places worth showing given the size of one step
	pub fn digits(&self) -> i32 {
		let inc_log = self.vert_inc.log10();
		-(inc_log as i32) + (inc_log < 0.0) as i32
	}

	pub fn decode(&self, raw:&[u8], out:&mut [f32]) {
		for (v, &code) in out.iter_mut().zip(raw) {
			*v = self.to_volts(code);
		}
	}

}
