// The upstream side of an acquisition: framing markers and sample packets.

use serde::Serialize;

// A channel as the driver iterates over it. Digital channels are read a pod (eight bits) at a
// time, so they show up here as pods rather than individual bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChannelRef {
	// Analog channel, zero-based.
	Analog(usize),
	// Digital pod, one-based as on the scope (`POD1`, `POD2`).
	DigitalPod(usize),
}

impl ChannelRef {
	// Pod holding the zero-based digital channel `index`.
	pub fn pod_of(index:usize) -> ChannelRef {
		ChannelRef::DigitalPod(if index < 8 { 1 } else { 2 })
	}

	// Argument for `:WAV:SOUR`.
	pub fn waveform_source(self) -> String {
		match self {
			ChannelRef::Analog(index) => format!("CHAN{}", index + 1),
			ChannelRef::DigitalPod(pod) => format!("POD{}", pod),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quantity {
	Voltage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
	Volt,
}

#[derive(Debug, Clone, Copy)]
pub struct AnalogPacket<'a> {
	pub channel: ChannelRef,
	pub samples: &'a [f32],
	pub quantity: Quantity,
	pub unit: Unit,
	// Number of significant decimal digits.
	pub digits: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct LogicPacket<'a> {
	pub channel: ChannelRef,
	pub data: &'a [u8],
	pub unit_size: usize,
}

#[derive(Debug, Clone, Copy)]
pub enum Packet<'a> {
	Analog(AnalogPacket<'a>),
	Logic(LogicPacket<'a>),
}

pub trait SessionBus {
	fn frame_begin(&mut self);
	fn frame_end(&mut self);
	fn send_packet(&mut self, packet:Packet<'_>);
	fn acquisition_stop(&mut self);
}

// Owned copy of everything a session received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Event {
	FrameBegin,
	FrameEnd,
	Analog { channel: ChannelRef, samples: Vec<f32>, digits: i32 },
	Logic { channel: ChannelRef, data: Vec<u8>, unit_size: usize },
	AcquisitionStop,
}

impl From<Packet<'_>> for Event {
	fn from(packet:Packet<'_>) -> Event {
		match packet {
			Packet::Analog(analog) =>
				Event::Analog { channel: analog.channel, samples: analog.samples.to_vec(), digits: analog.digits },
			Packet::Logic(logic) =>
				Event::Logic { channel: logic.channel, data: logic.data.to_vec(), unit_size: logic.unit_size },
		}
	}
}

// A session that just writes everything down.
#[derive(Debug, Default, Serialize)]
pub struct Recorder {
	pub events: Vec<Event>,
}

impl Recorder {
	pub fn new() -> Recorder {
		Recorder::default()
	}

	pub fn frames(&self) -> usize {
		self.events.iter().filter(|e| **e == Event::FrameEnd).count()
	}

	pub fn stopped(&self) -> bool {
		self.events.last() == Some(&Event::AcquisitionStop)
	}
}

impl SessionBus for Recorder {
	fn frame_begin(&mut self) {
		self.events.push(Event::FrameBegin)
	}

	fn frame_end(&mut self) {
		self.events.push(Event::FrameEnd)
	}

	fn send_packet(&mut self, packet:Packet<'_>) {
		self.events.push(Event::from(packet))
	}

	fn acquisition_stop(&mut self) {
		self.events.push(Event::AcquisitionStop)
	}
}
