// Static descriptions of the supported InfiniiVision scopes. Timebases and vertical scales are
// rationals, (numerator, denominator) in s/div and V/div.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Vendor {
	pub name: &'static str,
	pub full_name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Series {
	pub vendor: &'static Vendor,
	pub name: &'static str,
	pub max_timebase: (u64, u64),
	pub min_vdiv: (u64, u64),
	pub num_horizontal_divs: u32,
	pub live_samples: u32,
	pub buffer_samples: u32,
}

#[derive(Debug, Serialize)]
pub struct Model {
	pub series: &'static Series,
	pub name: &'static str,
	pub min_timebase: (u64, u64),
	pub analog_channels: usize,
	pub has_digital: bool,
	pub trigger_sources: &'static [&'static str],
}

pub const MAX_DIGITAL_CHANNELS:usize = 16;

impl Model {
	pub fn digital_channels(&self) -> usize {
		if self.has_digital { MAX_DIGITAL_CHANNELS } else { 0 }
	}

	// Matches the model field of an *IDN? reply, which may or may not have the space after the dash
	pub fn find(name:&str) -> Option<&'static Model> {
		let wanted = normalize(name);
		MODELS.iter().find(|m| normalize(m.name) == wanted)
	}

	pub fn is_trigger_source(&self, source:&str) -> bool {
		self.trigger_sources.iter().any(|s| s.eq_ignore_ascii_case(source))
	}
}

fn normalize(name:&str) -> String {
	name.chars().filter(|c| !c.is_whitespace()).map(|c| c.to_ascii_uppercase()).collect()
}

pub static KEYSIGHT: Vendor = Vendor{ name: "Keysight", full_name: "Keysight Technologies" };
pub static AGILENT: Vendor  = Vendor{ name: "Agilent", full_name: "Agilent Technologies" };

pub static DSOX2000: Series = Series{ vendor: &AGILENT, name: "DSOX2000", max_timebase: (50, 1), min_vdiv: (1, 1000),
	num_horizontal_divs: 10, live_samples: 50_000, buffer_samples: 1_000_000 };
pub static DSOX3000: Series = Series{ vendor: &AGILENT, name: "DSOX3000", max_timebase: (50, 1), min_vdiv: (1, 1000),
	num_horizontal_divs: 10, live_samples: 50_000, buffer_samples: 2_000_000 };
pub static DSOX3000T: Series = Series{ vendor: &KEYSIGHT, name: "DSOX3000T", max_timebase: (50, 1), min_vdiv: (1, 1000),
	num_horizontal_divs: 10, live_samples: 50_000, buffer_samples: 4_000_000 };

const SOURCES_2CH:&[&str] = &["CHAN1", "CHAN2", "EXT", "LINE", "WGEN"];
const SOURCES_4CH:&[&str] = &["CHAN1", "CHAN2", "CHAN3", "CHAN4", "EXT", "LINE", "WGEN"];
const SOURCES_2CH_MSO:&[&str] = &["CHAN1", "CHAN2", "EXT", "LINE", "WGEN",
	"DIG0", "DIG1", "DIG2", "DIG3", "DIG4", "DIG5", "DIG6", "DIG7",
	"DIG8", "DIG9", "DIG10", "DIG11", "DIG12", "DIG13", "DIG14", "DIG15"];
const SOURCES_4CH_MSO:&[&str] = &["CHAN1", "CHAN2", "CHAN3", "CHAN4", "EXT", "LINE", "WGEN",
	"DIG0", "DIG1", "DIG2", "DIG3", "DIG4", "DIG5", "DIG6", "DIG7",
	"DIG8", "DIG9", "DIG10", "DIG11", "DIG12", "DIG13", "DIG14", "DIG15"];

macro_rules! model {
	($series:expr, $name:expr, $min_tb:expr, $channels:expr, $digital:expr, $sources:expr) => {
		Model{ series: &$series, name: $name, min_timebase: $min_tb, analog_channels: $channels,
			has_digital: $digital, trigger_sources: $sources }
	};
}

pub static MODELS: &[Model] = &[
	model!(DSOX2000, "DSO-X 2002A", (5, 1_000_000_000), 2, false, SOURCES_2CH),
	model!(DSOX2000, "DSO-X 2004A", (5, 1_000_000_000), 4, false, SOURCES_4CH),
	model!(DSOX2000, "DSO-X 2012A", (2, 1_000_000_000), 2, false, SOURCES_2CH),
	model!(DSOX2000, "DSO-X 2014A", (2, 1_000_000_000), 4, false, SOURCES_4CH),
	model!(DSOX2000, "DSO-X 2022A", (2, 1_000_000_000), 2, false, SOURCES_2CH),
	model!(DSOX2000, "DSO-X 2024A", (2, 1_000_000_000), 4, false, SOURCES_4CH),
	model!(DSOX2000, "MSO-X 2002A", (5, 1_000_000_000), 2, true, SOURCES_2CH_MSO),
	model!(DSOX2000, "MSO-X 2004A", (5, 1_000_000_000), 4, true, SOURCES_4CH_MSO),
	model!(DSOX2000, "MSO-X 2012A", (2, 1_000_000_000), 2, true, SOURCES_2CH_MSO),
	model!(DSOX2000, "MSO-X 2014A", (2, 1_000_000_000), 4, true, SOURCES_4CH_MSO),
	model!(DSOX2000, "MSO-X 2022A", (2, 1_000_000_000), 2, true, SOURCES_2CH_MSO),
	model!(DSOX2000, "MSO-X 2024A", (2, 1_000_000_000), 4, true, SOURCES_4CH_MSO),
	model!(DSOX3000, "DSO-X 3012A", (2, 1_000_000_000), 2, false, SOURCES_2CH),
	model!(DSOX3000, "DSO-X 3014A", (2, 1_000_000_000), 4, false, SOURCES_4CH),
	model!(DSOX3000, "DSO-X 3024A", (2, 1_000_000_000), 4, false, SOURCES_4CH),
	model!(DSOX3000, "DSO-X 3034A", (1, 1_000_000_000), 4, false, SOURCES_4CH),
	model!(DSOX3000, "DSO-X 3054A", (1, 1_000_000_000), 4, false, SOURCES_4CH),
	model!(DSOX3000, "DSO-X 3104A", (500, 1_000_000_000_000), 4, false, SOURCES_4CH),
	model!(DSOX3000, "MSO-X 3012A", (2, 1_000_000_000), 2, true, SOURCES_2CH_MSO),
	model!(DSOX3000, "MSO-X 3014A", (2, 1_000_000_000), 4, true, SOURCES_4CH_MSO),
	model!(DSOX3000, "MSO-X 3024A", (2, 1_000_000_000), 4, true, SOURCES_4CH_MSO),
	model!(DSOX3000, "MSO-X 3034A", (1, 1_000_000_000), 4, true, SOURCES_4CH_MSO),
	model!(DSOX3000, "MSO-X 3054A", (1, 1_000_000_000), 4, true, SOURCES_4CH_MSO),
	model!(DSOX3000, "MSO-X 3104A", (500, 1_000_000_000_000), 4, true, SOURCES_4CH_MSO),
	model!(DSOX3000T, "DSO-X 3012T", (2, 1_000_000_000), 2, false, SOURCES_2CH),
	model!(DSOX3000T, "DSO-X 3014T", (2, 1_000_000_000), 4, false, SOURCES_4CH),
	model!(DSOX3000T, "DSO-X 3022T", (2, 1_000_000_000), 2, false, SOURCES_2CH),
	model!(DSOX3000T, "DSO-X 3024T", (2, 1_000_000_000), 4, false, SOURCES_4CH),
	model!(DSOX3000T, "DSO-X 3032T", (1, 1_000_000_000), 2, false, SOURCES_2CH),
	model!(DSOX3000T, "DSO-X 3034T", (1, 1_000_000_000), 4, false, SOURCES_4CH),
	model!(DSOX3000T, "DSO-X 3054T", (1, 1_000_000_000), 4, false, SOURCES_4CH),
	model!(DSOX3000T, "DSO-X 3104T", (500, 1_000_000_000_000), 4, false, SOURCES_4CH),
	model!(DSOX3000T, "MSO-X 3012T", (2, 1_000_000_000), 2, true, SOURCES_2CH_MSO),
	model!(DSOX3000T, "MSO-X 3014T", (2, 1_000_000_000), 4, true, SOURCES_4CH_MSO),
	model!(DSOX3000T, "MSO-X 3024T", (2, 1_000_000_000), 4, true, SOURCES_4CH_MSO),
	model!(DSOX3000T, "MSO-X 3034T", (1, 1_000_000_000), 4, true, SOURCES_4CH_MSO),
	model!(DSOX3000T, "MSO-X 3054T", (1, 1_000_000_000), 4, true, SOURCES_4CH_MSO),
	model!(DSOX3000T, "MSO-X 3104T", (500, 1_000_000_000_000), 4, true, SOURCES_4CH_MSO),
];
