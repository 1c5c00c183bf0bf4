// `ScpiTransport` over a VXI-11 link.

use std::str;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{Error, Result};
use crate::vxi11::{CoreClient, Vxi11Options};
use super::ScpiTransport;

lazy_static! {
	static ref IDN_RE: Regex = Regex::new("([^,]+),([^,]+),([^,]+),([^,\\s]+)").unwrap();
}

// Identification string as returned by `*IDN?`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Identity {
	pub manufacturer: String,
	pub model: String,
	pub serial_num: String,
	pub fw_version: String,
}

impl Identity {
	pub fn parse(idn:&str) -> Result<Identity> {
		let caps = IDN_RE.captures(idn.trim())
			.ok_or_else(|| Error::Protocol(format!("unrecognized *IDN? reply '{}'", idn.trim())))?;
		Ok(Identity {
			manufacturer: caps[1].trim().to_owned(),
			model: caps[2].trim().to_owned(),
			serial_num: caps[3].trim().to_owned(),
			fw_version: caps[4].trim().to_owned(),
		})
	}
}

pub struct Vxi11Transport {
	core: CoreClient,
	pending: Vec<u8>,
	offset: usize,
	end_seen: bool,
}

impl Vxi11Transport {
	pub fn connect(host:&str, options:Vxi11Options) -> Result<Vxi11Transport> {
		let mut core = CoreClient::new(host, options)?;
		core.create_link("inst0")?;
		log::info!("connected to {}", host);
		Ok(Vxi11Transport { core, pending: Vec::new(), offset: 0, end_seen: true })
	}

	pub fn identify(&mut self) -> Result<Identity> {
		let idn = self.get_string("*IDN?")?;
		let identity = Identity::parse(&idn)?;
		log::info!("found {} {} (serial {}, firmware {})",
			identity.manufacturer, identity.model, identity.serial_num, identity.fw_version);
		Ok(identity)
	}

	fn fill(&mut self) -> Result<()> {
		let (chunk, end) = self.core.read()?;
		self.pending = chunk;
		self.offset = 0;
		self.end_seen = end;
		Ok(())
	}
}

impl ScpiTransport for Vxi11Transport {
	fn send(&mut self, command:&str) -> Result<()> {
		log::trace!("send {:?}", command);
		Ok(self.core.write(command.as_bytes())?)
	}

	fn receive(&mut self) -> Result<String> {
		let mut response = Vec::new();
		loop {
			let (chunk, end) = self.core.read()?;
			response.extend_from_slice(&chunk);
			if end { break }
		}
		String::from_utf8(response)
			.map_err(|_| Error::Protocol("unable to parse response as UTF-8".to_owned()))
	}

	fn read_begin(&mut self) -> Result<()> {
		self.pending.clear();
		self.offset = 0;
		self.end_seen = false;
		Ok(())
	}

	fn read_data(&mut self, buf:&mut [u8]) -> Result<usize> {
		if self.offset == self.pending.len() {
			if self.end_seen {
				return Ok(0)
			}
			self.fill()?;
		}
		let count = buf.len().min(self.pending.len() - self.offset);
		buf[..count].copy_from_slice(&self.pending[self.offset..][..count]);
		self.offset += count;
		Ok(count)
	}

	fn read_complete(&self) -> bool {
		self.end_seen && self.offset == self.pending.len()
	}
}
