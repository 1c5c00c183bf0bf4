use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::mem;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use serde::{Deserialize, Serialize};

use keysight_dso::Error;
use keysight_dso::devices::keysight3000::{AcqState, Keysight3000};
use keysight_dso::devices::keysight3000::config::{AcquisitionConfig, ScopeState};
use keysight_dso::devices::keysight3000::models::Model;
use keysight_dso::scpi::vxi11::{Identity, Vxi11Transport};
use keysight_dso::session::{Event, Packet, SessionBus};
use keysight_dso::vxi11::Vxi11Options;

/// Capture frames from a Keysight InfiniiVision oscilloscope over VXI-11
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
	/// Hostname or IP address of the scope
	host: String,

	/// Number of frames to capture, 0 to keep going until interrupted
	#[clap(short, long)]
	frames: Option<u64>,

	/// JSON file with acquisition and link settings
	#[clap(short, long)]
	config: Option<PathBuf>,

	/// Where to write the capture (one JSON object per line), stdout if omitted
	#[clap(short, long)]
	output: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Settings {
	acquisition: AcquisitionConfig,
	link: Vxi11Options,
}

#[derive(Serialize)]
struct Header<'a> {
	identity: &'a Identity,
	model: &'a Model,
	state: Option<&'a ScopeState>,
}

#[derive(Serialize)]
struct Frame<'a> {
	frame: u64,
	events: &'a [Event],
}

// Each frame goes out as one JSON line the moment it ends, so only the frame in progress is held
// in memory.  Write errors are kept until the acquisition loop collects them.
struct FrameWriter<W: Write> {
	out: W,
	events: Vec<Event>,
	frames: u64,
	error: Option<io::Error>,
}

impl<W: Write> FrameWriter<W> {
	fn new(out:W) -> Self {
		FrameWriter { out, events: Vec::new(), frames: 0, error: None }
	}

	fn write_line<T: Serialize>(&mut self, value:&T) -> io::Result<()> {
		serde_json::to_writer(&mut self.out, value)?;
		self.out.write_all(b"\n")?;
		self.out.flush()
	}

	fn take_error(&mut self) -> Option<io::Error> {
		self.error.take()
	}
}

impl<W: Write> SessionBus for FrameWriter<W> {
	fn frame_begin(&mut self) {
		self.events.clear();
	}

	fn frame_end(&mut self) {
		let mut events = mem::take(&mut self.events);
		let result = self.write_line(&Frame { frame: self.frames, events: &events });
		if let Err(e) = result {
			self.error.get_or_insert(e);
		}
		self.frames += 1;

		events.clear();
		self.events = events;
	}

	fn send_packet(&mut self, packet:Packet<'_>) {
		self.events.push(Event::from(packet));
	}

	fn acquisition_stop(&mut self) {
		log::debug!("wrote {} frames", self.frames);
	}
}

fn load_settings(args:&Args) -> Result<Settings, Error> {
	let mut settings = match &args.config {
		Some(path) => {
			let text = fs::read_to_string(path)?;
			serde_json::from_str(&text)
				.map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?
		},
		None => Settings::default(),
	};

	if let Some(frames) = args.frames {
		settings.acquisition.limit_frames = frames;
	}

	Ok(settings)
}

fn run(args:&Args) -> Result<(), Error> {
	let settings = load_settings(args)?;
	log::debug!("settings: {:?}", settings);

	let out:Box<dyn Write> = match &args.output {
		Some(path) => Box::new(BufWriter::new(File::create(path)?)),
		None => Box::new(io::stdout()),
	};

	let mut transport = Vxi11Transport::connect(&args.host, settings.link)?;
	let identity = transport.identify()?;

	let model = Model::find(&identity.model)
		.ok_or_else(|| Error::Config(format!("unsupported model '{}'", identity.model)))?;

	let mut scope = Keysight3000::new(transport, model, settings.acquisition);
	scope.read_config()?;

	let mut writer = FrameWriter::new(out);
	writer.write_line(&Header { identity: &identity, model, state: scope.state() })?;

	if settings.acquisition.limit_frames == 0 {
		log::info!("no frame limit set, capturing until interrupted");
	}

	scope.acquisition_start(&mut writer)?;

	while scope.acq_state() != AcqState::Idle {
		scope.receive(&mut writer)?;
		if let Some(e) = writer.take_error() {
			scope.acquisition_stop(&mut writer);
			return Err(e.into());
		}
	}

	log::info!("captured {} frames", scope.num_frames());
	Ok(())
}

fn main() {
	env_logger::init();

	let args = Args::parse();

	if let Err(e) = run(&args) {
		eprintln!("{}", e);
		process::exit(1);
	}
}
