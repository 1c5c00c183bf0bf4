use std::io::{self, Read, Write, Error, ErrorKind};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use byteorder::{BigEndian, WriteBytesExt, ReadBytesExt};

use crate::xdr::{Packer, Unpacker};
use super::{xdr_pack, xdr_unpack};

// Record marking: the top bit of each fragment header flags the last fragment of a record
const LAST_FRAGMENT:u32 = 0x8000_0000;

// Largest reply accepted unless the caller raises it; fragment lengths come straight off the wire
pub const DEFAULT_MAX_RECORD:usize = 64 * 1024;

pub struct TcpClient {
	stream: TcpStream,
	pub prog: u32,
	pub vers: u32,
	pub lastxid: u32,
	max_record: usize,
	pub packer: Packer,
	pub unpacker: Unpacker,
}

impl TcpClient {

	pub fn connect<A: ToSocketAddrs>(addr: A, prog: u32, vers: u32) -> io::Result<Self> {
		let stream = TcpStream::connect(addr)?;
		stream.set_nodelay(true)?;
		Ok(Self{ stream, prog, vers, lastxid: 0, max_record: DEFAULT_MAX_RECORD, packer: Packer::new(), unpacker: Unpacker::new() })
	}

	pub fn set_timeout(&mut self, timeout:Option<Duration>) -> io::Result<()> {
		self.stream.set_read_timeout(timeout)?;
		self.stream.set_write_timeout(timeout)
	}

	pub fn set_max_record(&mut self, max_record:usize) {
		self.max_record = max_record;
	}

	// Resets the packer and writes a call header; arguments get packed after this
	pub fn start_call(&mut self, prc:u32) -> io::Result<()> {
		self.lastxid = self.lastxid.wrapping_add(1);
		self.packer.reset();
		xdr_pack::pack_callheader_no_auth(&mut self.packer, self.lastxid, self.prog, self.vers, prc)
	}

	// Sends whatever is in the packer and loads the matching reply's results into the unpacker
	pub fn do_call(&mut self) -> io::Result<()> {
		let call:&[u8] = self.packer.as_bytes();
		let mut send_bytes:Vec<u8> = Vec::with_capacity(call.len() + 4);
		send_bytes.write_u32::<BigEndian>(call.len() as u32 | LAST_FRAGMENT)?;
		send_bytes.extend_from_slice(call);
		self.stream.write_all(&send_bytes)?;
		log::trace!("rpc call xid={} prog={:#x} ({} bytes)", self.lastxid, self.prog, call.len());

		loop {
			let reply = read_record(&mut self.stream, self.max_record)?;
			self.unpacker.reset(reply);

			let (xid, _) = xdr_unpack::unpack_replyheader(&mut self.unpacker)?;
			if xid == self.lastxid {
				return Ok(());
			} else if xid < self.lastxid {
				// A late reply to an earlier call; keep waiting for ours
				log::trace!("discarding stale rpc reply xid={}", xid);
				continue;
			} else {
				return Err(Error::new(ErrorKind::Other, "Somehow got a packet from the future"));
			}
		}
	}

}

fn read_record<R: Read>(rdr:&mut R, max_record:usize) -> io::Result<Vec<u8>> {
	let mut record:Vec<u8> = vec![];

	let mut last:bool = false;
	while !last {
		let x:u32 = rdr.read_u32::<BigEndian>()?;
		last = (x & LAST_FRAGMENT) != 0;

		let start = record.len();
		let len = (x & !LAST_FRAGMENT) as usize;
		if start + len > max_record {
			return Err(Error::new(ErrorKind::InvalidData,
				format!("RPC record of at least {} bytes exceeds the {} byte limit", start + len, max_record)));
		}

		record.resize(start + len, 0);
		rdr.read_exact(&mut record[start..])?;
	}

	Ok(record)
}
