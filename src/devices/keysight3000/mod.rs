// Keysight (formerly Agilent) InfiniiVision 2000 X and 3000 X oscilloscopes.  Acquisition is
// digitize-then-read: each frame arms the scope with :DIGitize, then pulls every enabled channel
// across as an IEEE 488.2 block with :WAV:DATA?.  The driver never blocks waiting for bulk data;
// the host calls receive() whenever the transport may have something and the driver makes as much
// progress as the available bytes allow.

pub mod block;
pub mod config;
pub mod decode;
pub mod models;

use serde::Serialize;

use crate::{Error, Result};
use crate::scpi::ScpiTransport;
use crate::session::{AnalogPacket, ChannelRef, LogicPacket, Packet, Quantity, SessionBus, Unit};
use crate::utils;

use self::block::{BlockHeader, Header};
use self::config::{AcquisitionConfig, ScopeState};
use self::decode::Calibration;
use self::models::Model;

pub const ACQ_BUFFER_SIZE:usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AcqState {
	Idle,
	Digitizing,
	ReadingData,
}

pub struct Keysight3000<T: ScpiTransport> {
	transport: T,
	model: &'static Model,
	config: AcquisitionConfig,
	scope: Option<ScopeState>,
	calibration: Vec<Calibration>,
	enabled_channels: Vec<ChannelRef>,
	channel_entry: usize,
	num_frames: u64,
	num_channel_bytes_total: usize,
	num_channel_bytes: usize,
	header: BlockHeader,
	num_block_bytes: usize,
	num_block_read: usize,
	state: AcqState,
	frame_open: bool,
	buffer: Vec<u8>,
	data: Vec<f32>,
}

// Analog channels in ascending order, then each digital pod that has at least one bit turned on
pub fn enabled_channels(scope:&ScopeState) -> Vec<ChannelRef> {
	let mut enabled:Vec<ChannelRef> = scope.analog.iter().enumerate()
		.filter(|(_, ch)| ch.enabled)
		.map(|(i, _)| ChannelRef::Analog(i))
		.collect();

	for (i, &on) in scope.digital.iter().enumerate() {
		let pod = ChannelRef::pod_of(i);
		if on && !enabled.contains(&pod) {
			enabled.push(pod);
		}
	}

	enabled
}

impl<T: ScpiTransport> Keysight3000<T> {

	pub fn new(transport:T, model:&'static Model, config:AcquisitionConfig) -> Self {
		Self {
			transport,
			model,
			config,
			scope: None,
			calibration: vec![Calibration::default(); model.analog_channels],
			enabled_channels: Vec::new(),
			channel_entry: 0,
			num_frames: 0,
			num_channel_bytes_total: 0,
			num_channel_bytes: 0,
			header: BlockHeader::new(),
			num_block_bytes: 0,
			num_block_read: 0,
			state: AcqState::Idle,
			frame_open: false,
			buffer: vec![0; ACQ_BUFFER_SIZE],
			data: vec![0.0; ACQ_BUFFER_SIZE],
		}
	}

	pub fn model(&self) -> &'static Model { self.model }
	pub fn state(&self) -> Option<&ScopeState> { self.scope.as_ref() }
	pub fn acq_state(&self) -> AcqState { self.state }
	pub fn num_frames(&self) -> u64 { self.num_frames }
	pub fn calibration(&self) -> &[Calibration] { &self.calibration }

	// Replaces the stored scope state only if every query succeeds
	pub fn read_config(&mut self) -> Result<()> {
		match config::read_state(&mut self.transport, self.model) {
			Ok(state) => {
				self.scope = Some(state);
				Ok(())
			},
			Err(e) => {
				log::error!("configuration read failed: {}", e);
				Err(e)
			}
		}
	}

	pub fn read_vertical(&mut self) -> Result<()> {
		match self.scope.as_mut() {
			Some(scope) => config::read_vertical(&mut self.transport, &mut scope.analog),
			None => self.read_config(),
		}
	}

	// Every setting is followed by *OPC? so later queries can't overtake it
	pub fn config_set(&mut self, command:&str) -> Result<()> {
		self.transport.send(command)?;
		self.transport.get_opc()
	}

	pub fn acquisition_start<S: SessionBus + ?Sized>(&mut self, session:&mut S) -> Result<()> {
		if self.state != AcqState::Idle {
			return Err(Error::Config("acquisition already running".to_owned()));
		}

		if self.scope.is_none() {
			self.read_config()?;
		}

		let enabled = match &self.scope {
			Some(scope) => enabled_channels(scope),
			None => return Err(Error::Bug("no scope state after reading configuration")),
		};

		if enabled.is_empty() {
			return Err(Error::Config("no channels enabled".to_owned()));
		}

		log::debug!("enabled channels: {:?}", enabled);

		self.enabled_channels = enabled;
		self.channel_entry = 0;
		self.num_frames = 0;
		self.calibration = vec![Calibration::default(); self.model.analog_channels];

		self.capture_start()?;

		session.frame_begin();
		self.frame_open = true;

		Ok(())
	}

	pub fn acquisition_stop<S: SessionBus + ?Sized>(&mut self, session:&mut S) {
		if self.state != AcqState::Idle {
			log::debug!("stopping acquisition after {} frames", self.num_frames);
			self.abort(session);
		}
	}

	// Readable-event handler.  Errors abort the acquisition before being handed back.
	pub fn receive<S: SessionBus + ?Sized>(&mut self, session:&mut S) -> Result<()> {
		match self.progress(session) {
			Ok(()) => Ok(()),
			Err(e) => {
				log::error!("{}, aborting capture", e);
				self.abort(session);
				Err(e)
			}
		}
	}

	fn abort<S: SessionBus + ?Sized>(&mut self, session:&mut S) {
		if self.frame_open {
			session.frame_end();
			self.frame_open = false;
		}
		self.state = AcqState::Idle;
		session.acquisition_stop();
	}

	fn progress<S: SessionBus + ?Sized>(&mut self, session:&mut S) -> Result<()> {
		match self.state {
			AcqState::Idle => Ok(()),
			AcqState::Digitizing => {
				// Reply to the *OPC? that went out with :DIGitize
				let response = self.transport.receive()?;
				let done = utils::parse_bool(response.trim_end_matches(&['\r', '\n'][..]))
					.map_err(|e| Error::Protocol(format!("{} in reply to :DIGitize;*OPC?", e)))?;
				if !done {
					return Err(Error::Protocol("scope did not finish digitizing".to_owned()));
				}
				self.channel_start()
			},
			AcqState::ReadingData => self.read_data(session),
		}
	}

	fn current_channel(&self) -> Result<ChannelRef> {
		self.enabled_channels.get(self.channel_entry).copied()
			.ok_or(Error::Bug("current channel is not on the enabled channel list"))
	}

	fn capture_start(&mut self) -> Result<()> {
		if self.config.limit_frames == 0 {
			log::debug!("starting data capture for frameset {}", self.num_frames + 1);
		} else {
			log::debug!("starting data capture for frameset {} of {}", self.num_frames + 1, self.config.limit_frames);
		}

		self.transport.send(":DIGitize;*OPC?")?;

		self.state = AcqState::Digitizing;
		Ok(())
	}

	fn channel_start(&mut self) -> Result<()> {
		let channel = self.current_channel()?;
		let first_frame = self.num_frames == 0;
		let source = channel.waveform_source();

		log::debug!("starting reading data from {}", source);

		self.config_set(&format!(":WAV:SOUR {}", source))?;

		if first_frame {
			self.config_set(":WAV:FORM BYTE")?;
			self.config_set(":WAV:POIN:MODE NORM")?;
			self.config_set(":WAV:UNS ON")?;

			if let ChannelRef::Analog(index) = channel {
				let cal = Calibration {
					vert_inc: self.transport.get_float(":WAV:YINC?")?,
					vert_origin: self.transport.get_float(":WAV:YOR?")?,
					vert_reference: self.transport.get_int(":WAV:YREF?")?,
				};
				log::debug!("{} increment {} origin {} reference {}", source, cal.vert_inc, cal.vert_origin, cal.vert_reference);

				let slot = self.calibration.get_mut(index).ok_or(Error::Bug("analog channel outside the model"))?;
				*slot = cal;
			}
		}

		let points = self.transport.get_int(":WAV:POIN?")?;
		if points <= 0 {
			return Err(Error::Protocol(format!("scope announced {} points for {}", points, source)));
		}
		log::debug!("expecting {} bytes from {}", points, source);

		self.num_channel_bytes_total = points as usize;
		self.num_channel_bytes = 0;
		self.num_block_bytes = 0;
		self.num_block_read = 0;
		self.header = BlockHeader::new();

		self.transport.send(":WAV:DATA?")?;
		self.transport.read_begin()?;

		self.state = AcqState::ReadingData;
		Ok(())
	}

	fn read_data<S: SessionBus + ?Sized>(&mut self, session:&mut S) -> Result<()> {
		let channel = self.current_channel()?;

		if self.num_block_bytes == 0 {
			log::debug!("new block header expected");
			match self.header.read(&mut self.transport)? {
				Header::Pending => return Ok(()),
				Header::Complete(0) => return Err(Error::Protocol("received empty data block".to_owned())),
				Header::Complete(len) => {
					let remaining = self.num_channel_bytes_total - self.num_channel_bytes;
					if len > remaining {
						return Err(Error::Protocol(format!("data block of {} bytes overruns the {} bytes left for {}",
							len, remaining, channel.waveform_source())));
					}
					self.num_block_bytes = len;
					self.num_block_read = 0;
				}
			}
		}

		let wanted = (self.num_block_bytes - self.num_block_read).min(ACQ_BUFFER_SIZE);
		log::debug!("requesting read of {} bytes", wanted);

		let len = self.transport.read_data(&mut self.buffer[..wanted])?;
		log::debug!("received {} bytes", len);

		self.num_block_read += len;

		if len > 0 {
			self.dispatch(session, channel, len)?;
		}

		if self.num_block_read == self.num_block_bytes {
			log::debug!("block has been completed");
			self.header.finish_block(&mut self.transport)?;
			self.num_block_bytes = 0;
			self.num_block_read = 0;

			let last_channel = self.channel_entry + 1 == self.enabled_channels.len();
			if last_channel && !self.transport.read_complete() {
				log::warn!("read should have been completed");
			}
		} else {
			log::debug!("{} of {} block bytes read", self.num_block_read, self.num_block_bytes);
		}

		self.num_channel_bytes += len;
		if self.num_channel_bytes < self.num_channel_bytes_total {
			return Ok(());
		}

		if self.channel_entry + 1 < self.enabled_channels.len() {
			self.channel_entry += 1;
			self.channel_start()
		} else {
			self.frame_complete(session)
		}
	}

	fn dispatch<S: SessionBus + ?Sized>(&mut self, session:&mut S, channel:ChannelRef, len:usize) -> Result<()> {
		match channel {
			ChannelRef::Analog(index) => {
				let cal = *self.calibration.get(index).ok_or(Error::Bug("analog channel outside the model"))?;
				cal.decode(&self.buffer[..len], &mut self.data[..len]);
				session.send_packet(Packet::Analog(AnalogPacket {
					channel,
					samples: &self.data[..len],
					quantity: Quantity::Voltage,
					unit: Unit::Volt,
					digits: cal.digits(),
				}));
			},
			// Eight bits from one pod at a time, never both
			ChannelRef::DigitalPod(_) => {
				session.send_packet(Packet::Logic(LogicPacket {
					channel,
					data: &self.buffer[..len],
					unit_size: 1,
				}));
			}
		}
		Ok(())
	}

	fn frame_complete<S: SessionBus + ?Sized>(&mut self, session:&mut S) -> Result<()> {
		session.frame_end();
		self.frame_open = false;
		self.num_frames += 1;
		self.channel_entry = 0;

		if self.config.limit_frames == 0 || self.num_frames < self.config.limit_frames {
			self.capture_start()?;
			session.frame_begin();
			self.frame_open = true;
		} else {
			log::debug!("frame limit of {} reached", self.config.limit_frames);
			self.state = AcqState::Idle;
			session.acquisition_stop();
		}

		Ok(())
	}

}

#[cfg(test)]
mod test {
	use super::*;
	use crate::scpi::mock::MockScope;
	use crate::session::{Event, Recorder};
	use super::config::test::script_two_channels;

	fn calibrate(scope:&mut MockScope) {
		scope.reply(":WAV:YINC?", "+4.00000E-03");
		scope.reply(":WAV:YOR?", "+0.0E+00");
		scope.reply(":WAV:YREF?", "128");
	}

	fn ramp(len:usize) -> Vec<u8> {
		(0..len).map(|i| (i % 256) as u8).collect()
	}

	fn driver(scope:MockScope, model:&str, limit_frames:u64) -> Keysight3000<MockScope> {
		let mut dev = Keysight3000::new(scope, Model::find(model).unwrap(), AcquisitionConfig{ limit_frames });
		dev.read_config().unwrap();
		dev
	}

	fn run(dev:&mut Keysight3000<MockScope>, rec:&mut Recorder) {
		for _ in 0..100_000 {
			if dev.acq_state() == AcqState::Idle { return; }
			dev.receive(rec).unwrap();
		}
		panic!("acquisition never finished");
	}

	// Collapses consecutive packets from the same channel so event order is easy to compare
	fn outline(rec:&Recorder) -> Vec<String> {
		let mut out:Vec<String> = Vec::new();
		for event in &rec.events {
			let tag = match event {
				Event::FrameBegin => "begin".to_owned(),
				Event::FrameEnd => "end".to_owned(),
				Event::AcquisitionStop => "stop".to_owned(),
				Event::Analog{ channel, .. } | Event::Logic{ channel, .. } => channel.waveform_source(),
			};
			if out.last() != Some(&tag) || tag == "begin" || tag == "end" {
				out.push(tag);
			}
		}
		out
	}

	fn analog_samples(rec:&Recorder, source:&str) -> Vec<f32> {
		rec.events.iter().filter_map(|e| match e {
			Event::Analog{ channel, samples, .. } if channel.waveform_source() == source => Some(samples.clone()),
			_ => None,
		}).flatten().collect()
	}

	#[test]
	fn test_single_channel_single_frame() {
		let payload = ramp(1400);
		let mut block = b"#9000001400".to_vec();
		block.extend_from_slice(&payload);
		block.push(b'\n');

		let mut scope = MockScope::new();
		script_two_channels(&mut scope);
		calibrate(&mut scope);
		scope.reply(":WAV:POIN?", "1400");
		scope.raw_block("CHAN1", &block);

		let mut dev = driver(scope, "DSO-X 3012A", 1);
		let mut rec = Recorder::new();
		dev.acquisition_start(&mut rec).unwrap();
		assert_eq!(dev.acq_state(), AcqState::Digitizing);
		run(&mut dev, &mut rec);

		assert_eq!(outline(&rec), ["begin", "CHAN1", "end", "stop"]);
		assert_eq!(dev.num_frames(), 1);
		assert_eq!(dev.acq_state(), AcqState::Idle);

		let cal = dev.calibration()[0];
		let samples = analog_samples(&rec, "CHAN1");
		assert_eq!(samples.len(), 1400);
		for (v, &code) in samples.iter().zip(&payload) {
			assert_eq!(*v, ((code as i32 - 128) as f64 * 0.004f32 as f64) as f32);
			assert_eq!(*v, cal.to_volts(code));
		}

		match &rec.events[1] {
			Event::Analog{ digits, .. } => assert_eq!(*digits, 3),
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn test_two_channels_two_frames() {
		let mut scope = MockScope::new();
		script_two_channels(&mut scope);
		scope.reply(":CHAN2:DISP?", "1");
		calibrate(&mut scope);
		scope.waveform("CHAN1", ramp(300));
		scope.waveform("CHAN2", ramp(250));
		scope.chunk_size(100);

		let mut dev = driver(scope, "DSO-X 3012A", 2);
		let mut rec = Recorder::new();
		dev.acquisition_start(&mut rec).unwrap();
		run(&mut dev, &mut rec);

		assert_eq!(outline(&rec), ["begin", "CHAN1", "CHAN2", "end", "begin", "CHAN1", "CHAN2", "end", "stop"]);
		assert_eq!(dev.num_frames(), 2);
		assert_eq!(analog_samples(&rec, "CHAN1").len(), 600);
		assert_eq!(analog_samples(&rec, "CHAN2").len(), 500);

		let scope = &dev.transport;
		assert_eq!(scope.count(":DIGitize"), 2);
		assert_eq!(scope.count(":WAV:YINC?"), 2);
		assert_eq!(scope.count(":WAV:YOR?"), 2);
		assert_eq!(scope.count(":WAV:YREF?"), 2);
		assert_eq!(scope.count(":WAV:FORM BYTE"), 2);
		assert_eq!(scope.count(":WAV:POIN?"), 4);
		assert_eq!(scope.count(":WAV:SOUR CHAN2"), 2);
	}

	#[test]
	fn test_commands_in_order() {
		let mut scope = MockScope::new();
		script_two_channels(&mut scope);
		calibrate(&mut scope);
		scope.waveform("CHAN1", ramp(10));

		let mut dev = driver(scope, "DSO-X 3012A", 1);
		let skip = dev.transport.commands().len();
		let mut rec = Recorder::new();
		dev.acquisition_start(&mut rec).unwrap();
		run(&mut dev, &mut rec);

		assert_eq!(&dev.transport.commands()[skip..], [
			":DIGitize;*OPC?",
			":WAV:SOUR CHAN1", "*OPC?",
			":WAV:FORM BYTE", "*OPC?",
			":WAV:POIN:MODE NORM", "*OPC?",
			":WAV:UNS ON", "*OPC?",
			":WAV:YINC?", ":WAV:YOR?", ":WAV:YREF?",
			":WAV:POIN?",
			":WAV:DATA?",
		]);
	}

	#[test]
	fn test_indefinite_block_aborts() {
		let mut scope = MockScope::new();
		script_two_channels(&mut scope);
		calibrate(&mut scope);
		scope.reply(":WAV:POIN?", "3");
		scope.raw_block("CHAN1", b"#0abc\n");

		let mut dev = driver(scope, "DSO-X 3012A", 0);
		let mut rec = Recorder::new();
		dev.acquisition_start(&mut rec).unwrap();
		dev.receive(&mut rec).unwrap();
		assert!(matches!(dev.receive(&mut rec), Err(Error::Protocol(_))));

		assert_eq!(rec.events, [Event::FrameBegin, Event::FrameEnd, Event::AcquisitionStop]);
		assert_eq!(dev.acq_state(), AcqState::Idle);
		assert_eq!(dev.num_frames(), 0);
	}

	#[test]
	fn test_empty_block_aborts() {
		let mut scope = MockScope::new();
		script_two_channels(&mut scope);
		calibrate(&mut scope);
		scope.reply(":WAV:POIN?", "3");
		scope.raw_block("CHAN1", b"#10\n");

		let mut dev = driver(scope, "DSO-X 3012A", 0);
		let mut rec = Recorder::new();
		dev.acquisition_start(&mut rec).unwrap();
		dev.receive(&mut rec).unwrap();
		assert!(matches!(dev.receive(&mut rec), Err(Error::Protocol(_))));
		assert!(rec.stopped());
	}

	#[test]
	fn test_block_longer_than_announced() {
		let mut scope = MockScope::new();
		script_two_channels(&mut scope);
		calibrate(&mut scope);
		scope.reply(":WAV:POIN?", "2");
		scope.raw_block("CHAN1", b"#13abc\n");

		let mut dev = driver(scope, "DSO-X 3012A", 0);
		let mut rec = Recorder::new();
		dev.acquisition_start(&mut rec).unwrap();
		dev.receive(&mut rec).unwrap();
		assert!(matches!(dev.receive(&mut rec), Err(Error::Protocol(_))));
		assert_eq!(rec.events, [Event::FrameBegin, Event::FrameEnd, Event::AcquisitionStop]);
	}

	#[test]
	fn test_digital_pod() {
		let mut scope = MockScope::new();
		script_two_channels(&mut scope);
		scope.reply(":CHAN1:DISP?", "0");
		for i in 0..16 {
			scope.reply(&format!(":DIG{}:DISP?", i), if i == 10 { "1" } else { "0" });
		}
		scope.waveform("POD2", vec![0xa5, 0x5a, 0xff, 0x00]);

		let mut dev = driver(scope, "MSO-X 3012A", 1);
		let mut rec = Recorder::new();
		dev.acquisition_start(&mut rec).unwrap();
		run(&mut dev, &mut rec);

		assert_eq!(rec.events, [
			Event::FrameBegin,
			Event::Logic{ channel: ChannelRef::DigitalPod(2), data: vec![0xa5, 0x5a, 0xff, 0x00], unit_size: 1 },
			Event::FrameEnd,
			Event::AcquisitionStop,
		]);
		assert_eq!(dev.transport.count(":WAV:SOUR POD2"), 1);
		assert_eq!(dev.transport.count(":WAV:YINC?"), 0);
	}

	#[test]
	fn test_enabled_channel_order() {
		let mut scope = MockScope::new();
		script_two_channels(&mut scope);
		scope.reply(":CHAN2:DISP?", "1");
		for i in 0..16 {
			scope.reply(&format!(":DIG{}:DISP?", i), if i == 3 || i == 5 || i == 12 { "1" } else { "0" });
		}
		let dev = driver(scope, "MSO-X 3012A", 1);
		assert_eq!(enabled_channels(dev.state().unwrap()), [
			ChannelRef::Analog(0), ChannelRef::Analog(1), ChannelRef::DigitalPod(1), ChannelRef::DigitalPod(2),
		]);
	}

	#[test]
	fn test_read_failure_aborts() {
		let mut scope = MockScope::new();
		script_two_channels(&mut scope);
		calibrate(&mut scope);
		scope.waveform("CHAN1", ramp(10));
		scope.fail_reads();

		let mut dev = driver(scope, "DSO-X 3012A", 0);
		let mut rec = Recorder::new();
		dev.acquisition_start(&mut rec).unwrap();
		dev.receive(&mut rec).unwrap();
		assert!(matches!(dev.receive(&mut rec), Err(Error::Transport(_))));
		assert_eq!(rec.events, [Event::FrameBegin, Event::FrameEnd, Event::AcquisitionStop]);

		// Nothing more once idle
		dev.receive(&mut rec).unwrap();
		assert_eq!(rec.events.len(), 3);
	}

	#[test]
	fn test_chunking_does_not_change_samples() {
		let payload = ramp(1000);
		let mut reference:Option<Vec<f32>> = None;
		for &chunk in &[1, 3, 7, 64, 999, usize::MAX] {
			let mut scope = MockScope::new();
			script_two_channels(&mut scope);
			calibrate(&mut scope);
			scope.waveform("CHAN1", payload.clone());
			scope.chunk_size(chunk);

			let mut dev = driver(scope, "DSO-X 3012A", 1);
			let mut rec = Recorder::new();
			dev.acquisition_start(&mut rec).unwrap();
			run(&mut dev, &mut rec);

			let samples = analog_samples(&rec, "CHAN1");
			assert_eq!(rec.frames(), 1, "chunk size {}", chunk);
			match &reference {
				Some(expected) => assert_eq!(&samples, expected, "chunk size {}", chunk),
				None => reference = Some(samples),
			}
		}
	}

	#[test]
	fn test_waits_for_bytes() {
		let mut scope = MockScope::new();
		script_two_channels(&mut scope);
		calibrate(&mut scope);
		scope.waveform("CHAN1", ramp(20));
		scope.trickle();

		let mut dev = driver(scope, "DSO-X 3012A", 1);
		let mut rec = Recorder::new();
		dev.acquisition_start(&mut rec).unwrap();
		dev.receive(&mut rec).unwrap();
		assert_eq!(dev.acq_state(), AcqState::ReadingData);

		for _ in 0..3 {
			dev.receive(&mut rec).unwrap();
		}
		assert_eq!(dev.acq_state(), AcqState::ReadingData);
		assert_eq!(rec.events, [Event::FrameBegin]);

		dev.transport.make_available(5);
		dev.receive(&mut rec).unwrap();
		dev.receive(&mut rec).unwrap();
		assert_eq!(rec.events, [Event::FrameBegin]);

		dev.transport.make_available(100);
		run(&mut dev, &mut rec);
		assert_eq!(analog_samples(&rec, "CHAN1").len(), 20);
		assert!(rec.stopped());
	}

	#[test]
	fn test_unlimited_frames_until_stopped() {
		let mut scope = MockScope::new();
		script_two_channels(&mut scope);
		calibrate(&mut scope);
		scope.waveform("CHAN1", ramp(16));

		let mut dev = driver(scope, "DSO-X 3012A", 0);
		let mut rec = Recorder::new();
		dev.acquisition_start(&mut rec).unwrap();
		while dev.num_frames() < 3 {
			dev.receive(&mut rec).unwrap();
		}
		dev.acquisition_stop(&mut rec);
		dev.acquisition_stop(&mut rec);

		assert_eq!(dev.num_frames(), 3);
		assert_eq!(rec.frames(), 4);
		assert_eq!(rec.events.iter().filter(|e| **e == Event::AcquisitionStop).count(), 1);
		assert!(rec.stopped());
		assert_eq!(dev.transport.count(":WAV:YINC?"), 1);
	}

	#[test]
	fn test_nothing_enabled() {
		let mut scope = MockScope::new();
		script_two_channels(&mut scope);
		scope.reply(":CHAN1:DISP?", "0");

		let mut dev = driver(scope, "DSO-X 3012A", 1);
		let mut rec = Recorder::new();
		assert!(matches!(dev.acquisition_start(&mut rec), Err(Error::Config(_))));
		assert!(rec.events.is_empty());
		assert_eq!(dev.acq_state(), AcqState::Idle);
	}

	#[test]
	fn test_failed_config_read_keeps_previous() {
		let mut scope = MockScope::new();
		script_two_channels(&mut scope);
		let mut dev = driver(scope, "DSO-X 3012A", 1);
		dev.transport.reply(":ACQ:SRAT?", "fast");
		assert!(dev.read_config().is_err());
		assert_eq!(dev.state().unwrap().sample_rate, 2.0e9);
	}

	#[test]
	fn test_read_vertical() {
		let mut scope = MockScope::new();
		script_two_channels(&mut scope);
		let mut dev = driver(scope, "DSO-X 3012A", 1);
		dev.transport.reply(":CHAN1:SCAL?", "+2.0E+00");
		dev.read_vertical().unwrap();
		assert_eq!(dev.state().unwrap().analog[0].vdiv, 2.0);
	}

	#[test]
	fn test_config_set_waits_for_opc() {
		let mut scope = MockScope::new();
		script_two_channels(&mut scope);
		let mut dev = driver(scope, "DSO-X 3012A", 1);
		dev.transport.reply("*OPC?", "0");
		assert!(matches!(dev.config_set(":WAV:FORM BYTE"), Err(Error::Protocol(_))));
	}
}
