// Device core
pub const DEVICE_CORE_PROG:u32  = 0x0607af;
pub const DEVICE_CORE_VERS:u32  = 1;
pub const CREATE_LINK:u32       = 10;
pub const DEVICE_WRITE:u32      = 11;
pub const DEVICE_READ:u32       = 12;
pub const DESTROY_LINK:u32      = 23;

pub const CLIENT_ID:i32 = 3333;

const READ_REPLY_OVERHEAD:usize = 1024;

pub const OPERATION_FLAGS_END:i32 = 8;

// Reason bits in a device_read reply
pub const REASON_REQCNT:i32 = 1;
pub const REASON_CHR:i32    = 2;
pub const REASON_END:i32    = 4;

use std::io::{self, Error, ErrorKind};
use std::ops::Drop;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::rpc::port_mapping::{TcpPortMapperClient, Mapping};
use crate::rpc::tcp_clients::TcpClient;

fn err(msg:&str) -> io::Error { Error::new(ErrorKind::Other, msg) }

fn device_error(code:i32) -> io::Result<()> {
	match code {
		0  => Ok(()),
		1  => Err(err("Syntax error")),
		3  => Err(err("Device not accessible")),
		4  => Err(err("Invalid link identifier")),
		5  => Err(err("Parameter error")),
		6  => Err(err("Channel not established")),
		8  => Err(err("Operation not supported")),
		9  => Err(err("Out of resources")),
		11 => Err(err("Device locked by another link")),
		12 => Err(err("No lock held by this link")),
		15 => Err(Error::new(ErrorKind::TimedOut, "I/O timeout")),
		17 => Err(err("I/O error")),
		21 => Err(err("Invalid address")),
		23 => Err(Error::new(ErrorKind::Interrupted, "Abort")),
		29 => Err(err("Channel already established")),
		_  => Err(Error::new(ErrorKind::Other, format!("Unknown device error {}", code))),
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Vxi11Options {
	pub io_timeout_ms: u32,
	pub lock_timeout_ms: u32,
	pub max_read_size: u32,
}

impl Default for Vxi11Options {
	fn default() -> Self {
		Vxi11Options{ io_timeout_ms: 10000, lock_timeout_ms: 10000, max_read_size: 64 * 1024 }
	}
}

pub struct Link {
	pub link_id: i32,
	pub abort_port: u32,
	pub max_recv_size: u32,
}

pub struct CoreClient {
	client: TcpClient,
	options: Vxi11Options,
	opt_link: Option<Link>,
}

impl CoreClient {

	fn get_link(&self) -> io::Result<i32> {
		match self.opt_link {
			Some(Link{ link_id, .. }) => Ok(link_id),
			None => Err(err("No link")),
		}
	}

	pub fn new(host:&str, options:Vxi11Options) -> io::Result<Self> {
		// Find the port to use for the core program
		let port = TcpPortMapperClient::new(host)?
			.get_port(&Mapping::tcp(DEVICE_CORE_PROG, DEVICE_CORE_VERS))?;

		let mut client = TcpClient::connect((host, port), DEVICE_CORE_PROG, DEVICE_CORE_VERS)?;

		// Give the socket some slack beyond the timeout the instrument itself enforces
		let slack = Duration::from_millis(options.io_timeout_ms as u64 + options.lock_timeout_ms as u64 + 1000);
		client.set_timeout(Some(slack))?;

		// A device_read reply is the data plus the reply header and a few words of results
		client.set_max_record(options.max_read_size as usize + READ_REPLY_OVERHEAD);

		Ok(CoreClient{ client, options, opt_link: None })
	}

	pub fn create_link(&mut self, device:&str) -> io::Result<()> {
		if self.opt_link.is_some() {
			return Err(err("Already connected to a link"));
		}

		self.client.start_call(CREATE_LINK)?;
		xdr_pack::pack_create_link_parms(&mut self.client.packer, CLIENT_ID, false, self.options.lock_timeout_ms, device)?;
		self.client.do_call()?;

		let error:i32         = self.client.unpacker.unpack_i32()?;
		let link_id:i32       = self.client.unpacker.unpack_i32()?;
		let abort_port:u32    = self.client.unpacker.unpack_u32()?;
		let max_recv_size:u32 = self.client.unpacker.unpack_u32()?;

		device_error(error)?;

		log::debug!("vxi11: link {} to {} established, max_recv_size={}", link_id, device, max_recv_size);
		self.opt_link = Some(Link{ link_id, abort_port, max_recv_size });
		Ok(())
	}

	pub fn write(&mut self, data:&[u8]) -> io::Result<()> {
		let link_id:i32 = self.get_link()?;
		let max_recv_size = self.opt_link.as_ref().map(|l| l.max_recv_size).unwrap_or(0);
		if max_recv_size != 0 && data.len() > max_recv_size as usize {
			return Err(err("Message exceeds the device's maximum receive size"));
		}

		self.client.start_call(DEVICE_WRITE)?;
		xdr_pack::pack_device_write_parms(&mut self.client.packer, link_id, self.options.io_timeout_ms,
			self.options.lock_timeout_ms, OPERATION_FLAGS_END, data)?;
		self.client.do_call()?;

		let error:i32 = self.client.unpacker.unpack_i32()?;
		let size:u32  = self.client.unpacker.unpack_u32()?;
		device_error(error)?;

		if size as usize != data.len() {
			return Err(err("Number of bytes in confirmation doesn't match number of bytes sent"));
		}
		Ok(())
	}

	// Returns one chunk of the response and whether it was the last one
	pub fn read(&mut self) -> io::Result<(Vec<u8>, bool)> {
		let link_id:i32 = self.get_link()?;

		self.client.start_call(DEVICE_READ)?;
		xdr_pack::pack_device_read_parms(&mut self.client.packer, link_id, self.options.max_read_size,
			self.options.io_timeout_ms, self.options.lock_timeout_ms, 0, 0)?;
		self.client.do_call()?;

		let error:i32    = self.client.unpacker.unpack_i32()?;
		let reason:i32   = self.client.unpacker.unpack_i32()?;
		let data:Vec<u8> = self.client.unpacker.unpack_variable_len_opaque()?;
		device_error(error)?;

		if reason & !(REASON_REQCNT | REASON_CHR | REASON_END) != 0 {
			return Err(err("Bits in reason code that should be zero aren't zero"));
		}

		let end = reason & REASON_END != 0;
		log::trace!("vxi11: read {} bytes, reason={:#b}", data.len(), reason);
		Ok((data, end))
	}

	pub fn destroy_link(&mut self) -> io::Result<()> {
		let link_id:i32 = self.get_link()?;

		self.client.start_call(DESTROY_LINK)?;
		self.client.packer.pack_i32(link_id)?;
		self.client.do_call()?;
		self.opt_link = None;

		device_error(self.client.unpacker.unpack_i32()?)
	}

}

impl Drop for CoreClient {

	fn drop(&mut self) {
		if self.opt_link.is_some() {
			if let Err(e) = self.destroy_link() {
				log::warn!("vxi11: unable to destroy link: {}", e);
			}
		}
	}

}

pub mod xdr_pack;
