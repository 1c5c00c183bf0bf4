// Acquisition settings supplied by the user, and the scope settings read back from the
// instrument.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};
use crate::scpi::ScpiTransport;
use crate::utils;
use super::models::Model;

const COUPLINGS:&[&str] = &["AC", "DC", "GND"];
const SLOPES:&[&str] = &["POS", "NEG", "EITH", "ALT"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
	// Number of frames to acquire before stopping; `0` keeps going until stopped.
	pub limit_frames: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChannelState {
	pub enabled: bool,
	// Probe attenuation factor, `10.0` for a 10X probe.
	pub attenuation: f32,
	// Volts per division.
	pub vdiv: f32,
	pub vert_offset: f32,
	pub coupling: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ScopeState {
	pub analog: Vec<ChannelState>,
	pub digital: Vec<bool>,
	// Seconds per division.
	pub timebase: f32,
	pub horiz_triggerpos: f32,
	pub trigger_source: String,
	pub trigger_slope: String,
	pub trigger_level: f32,
	// Samples per second.
	pub sample_rate: f32,
}

// Reads the complete channel, timebase and trigger setup. Nothing is returned unless every
// query succeeds.
pub fn read_state<T: ScpiTransport + ?Sized>(transport:&mut T, model:&Model) -> Result<ScopeState> {
	let mut state = ScopeState {
		analog: vec![ChannelState::default(); model.analog_channels],
		digital: vec![false; model.digital_channels()],
		..ScopeState::default()
	};

	for (i, channel) in state.analog.iter_mut().enumerate() {
		channel.enabled = transport.get_bool(&format!(":CHAN{}:DISP?", i + 1))?;
		log::debug!("CH{} {}", i + 1, if channel.enabled { "on" } else { "off" });
	}

	for (i, enabled) in state.digital.iter_mut().enumerate() {
		*enabled = transport.get_bool(&format!(":DIG{}:DISP?", i))?;
		log::debug!("D{}: {}", i, if *enabled { "on" } else { "off" });
	}

	state.timebase = transport.get_float(":TIM:SCAL?")?;
	log::debug!("current timebase {}", state.timebase);

	for (i, channel) in state.analog.iter_mut().enumerate() {
		let command = format!(":CHAN{}:PROB?", i + 1);
		let response = transport.get_string(&command)?;
		channel.attenuation = utils::parse_float(utils::trim_probe_factor(&response))
			.map_err(|e| Error::Protocol(format!("{} in reply to {}", e, command)))?;
		log::debug!("CH{} probe attenuation {}", i + 1, channel.attenuation);
	}

	read_vertical(transport, &mut state.analog)?;

	for (i, channel) in state.analog.iter_mut().enumerate() {
		let coupling = transport.get_string(&format!(":CHAN{}:COUP?", i + 1))?;
		if !COUPLINGS.contains(&coupling.as_str()) {
			return Err(Error::Config(format!("CH{} has unsupported coupling '{}'", i + 1, coupling)))
		}
		log::debug!("CH{} coupling {}", i + 1, coupling);
		channel.coupling = coupling;
	}

	state.trigger_source = transport.get_string(":TRIG:EDGE:SOUR?")?;
	log::debug!("current trigger source {}", state.trigger_source);
	if !model.is_trigger_source(&state.trigger_source) {
		log::warn!("trigger source {} is not one {} is known to have", state.trigger_source, model.name);
	}

	state.horiz_triggerpos = transport.get_float(":TIM:POS?")?;
	log::debug!("current horizontal trigger position {}", state.horiz_triggerpos);

	state.trigger_slope = transport.get_string(":TRIG:EDGE:SLOP?")?;
	log::debug!("current trigger slope {}", state.trigger_slope);
	if !SLOPES.contains(&state.trigger_slope.as_str()) {
		log::warn!("unrecognized trigger slope {}", state.trigger_slope);
	}

	state.trigger_level = transport.get_float(":TRIG:EDGE:LEV?")?;
	log::debug!("current trigger level {}", state.trigger_level);

	state.sample_rate = transport.get_float(":ACQ:SRAT?")?;
	log::debug!("current sample rate {}", state.sample_rate);

	Ok(state)
}

// Vertical gain and offset only; these change whenever the user turns the knobs.
pub fn read_vertical<T: ScpiTransport + ?Sized>(transport:&mut T, analog:&mut [ChannelState]) -> Result<()> {
	for (i, channel) in analog.iter_mut().enumerate() {
		channel.vdiv = transport.get_float(&format!(":CHAN{}:SCAL?", i + 1))?;
		log::debug!("CH{} vertical gain {}", i + 1, channel.vdiv);
	}

	for (i, channel) in analog.iter_mut().enumerate() {
		channel.vert_offset = transport.get_float(&format!(":CHAN{}:OFFS?", i + 1))?;
		log::debug!("CH{} vertical offset {}", i + 1, channel.vert_offset);
	}

	Ok(())
}
