// Scripted stand-in for a scope on the other end of the transport

use std::collections::{HashMap, VecDeque};
use std::io;

use crate::{Error, Result};
use super::ScpiTransport;

pub(crate) struct MockScope {
	replies: HashMap<String, String>,
	waveforms: HashMap<String, Vec<u8>>,
	raw_blocks: HashMap<String, Vec<u8>>,
	source: String,
	pending: VecDeque<Option<String>>,
	data: VecDeque<u8>,
	chunk: usize,
	available: Option<usize>,
	fail_reads: bool,
	commands: Vec<String>,
}

impl MockScope {
	pub fn new() -> MockScope {
		MockScope {
			replies: HashMap::new(),
			waveforms: HashMap::new(),
			raw_blocks: HashMap::new(),
			source: String::new(),
			pending: VecDeque::new(),
			data: VecDeque::new(),
			chunk: usize::MAX,
			available: None,
			fail_reads: false,
			commands: Vec::new(),
		}
	}

	pub fn reply(&mut self, query:&str, response:&str) {
		self.replies.insert(query.to_owned(), response.to_owned());
	}

	// Payload served for `:WAV:DATA?` while `source` is selected, wrapped in a `#8` block.
	pub fn waveform(&mut self, source:&str, payload:Vec<u8>) {
		self.waveforms.insert(source.to_owned(), payload);
	}

	// Exact bytes served for `:WAV:DATA?`, header and terminator included.
	pub fn raw_block(&mut self, source:&str, bytes:&[u8]) {
		self.raw_blocks.insert(source.to_owned(), bytes.to_vec());
	}

	// Largest number of bytes a single `read_data` hands out.
	pub fn chunk_size(&mut self, chunk:usize) {
		self.chunk = chunk;
	}

	// From now on `read_data` only hands out bytes released with `make_available`.
	pub fn trickle(&mut self) {
		self.available = Some(0);
	}

	pub fn make_available(&mut self, count:usize) {
		self.available = Some(self.available.unwrap_or(0) + count);
	}

	// Puts bytes straight into the binary response stream.
	pub fn load(&mut self, bytes:&[u8]) {
		self.data.extend(bytes.iter().copied());
	}

	pub fn fail_reads(&mut self) {
		self.fail_reads = true;
	}

	pub fn commands(&self) -> &[String] {
		&self.commands
	}

	pub fn count(&self, command:&str) -> usize {
		self.commands.iter().filter(|c| c.split(';').any(|part| part == command)).count()
	}

	fn query(&mut self, query:&str) -> Option<String> {
		if let Some(reply) = self.replies.get(query) {
			return Some(reply.clone())
		}
		match query {
			"*OPC?" => Some("1".to_owned()),
			":WAV:POIN?" => self.waveforms.get(&self.source).map(|w| w.len().to_string()),
			_ => None,
		}
	}
}

impl ScpiTransport for MockScope {
	fn send(&mut self, command:&str) -> Result<()> {
		self.commands.push(command.to_owned());
		for part in command.split(';') {
			if let Some(source) = part.strip_prefix(":WAV:SOUR ") {
				self.source = source.to_owned();
			} else if part == ":WAV:DATA?" {
				let bytes = match (self.raw_blocks.get(&self.source), self.waveforms.get(&self.source)) {
					(Some(raw), _) => raw.clone(),
					(None, Some(payload)) => {
						let mut block = format!("#8{:08}", payload.len()).into_bytes();
						block.extend_from_slice(payload);
						block.push(b'\n');
						block
					}
					(None, None) => Vec::new(),
				};
				self.data = bytes.into_iter().collect();
			} else if part.ends_with('?') {
				let reply = self.query(part);
				self.pending.push_back(reply);
			}
		}
		Ok(())
	}

	fn receive(&mut self) -> Result<String> {
		match self.pending.pop_front() {
			Some(Some(reply)) => Ok(format!("{}\n", reply)),
			_ => Err(Error::Transport(io::Error::new(io::ErrorKind::TimedOut, "no reply"))),
		}
	}

	fn read_begin(&mut self) -> Result<()> {
		Ok(())
	}

	fn read_data(&mut self, buf:&mut [u8]) -> Result<usize> {
		if self.fail_reads {
			return Err(Error::Transport(io::Error::new(io::ErrorKind::ConnectionReset, "link lost")))
		}
		let count = buf.len().min(self.chunk).min(self.data.len()).min(self.available.unwrap_or(usize::MAX));
		if let Some(available) = self.available.as_mut() {
			*available -= count;
		}
		for (slot, byte) in buf.iter_mut().zip(self.data.drain(..count)) {
			*slot = byte;
		}
		Ok(count)
	}

	fn read_complete(&self) -> bool {
		self.data.is_empty()
	}
}
