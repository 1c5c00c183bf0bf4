use std::io::{self, Error, ErrorKind};

use super::{IPPROTO_TCP};
use super::xdr_pack;
use super::tcp_clients::TcpClient;

pub const PMAP_PROG:u32 = 100000;
pub const PMAP_VERS:u32 = 2;
pub const PMAP_PORT:u16 = 111;

pub const PMAPPROC_GETPORT:u32 = 3;     // (mapping) -> unsigned int

#[derive(Debug)]
pub struct Mapping {
	pub program: u32,
	pub version: u32,
	pub protocol: u32,
	pub port: u32,				// XDR encodes it as a u32 even though ports are 16 bits
}

impl Mapping {
	pub fn tcp(program:u32, version:u32) -> Self {
		Mapping{ program, version, protocol: IPPROTO_TCP, port: 0 }
	}
}

pub struct TcpPortMapperClient {
	client: TcpClient,
}

impl TcpPortMapperClient {

	pub fn new(host:&str) -> io::Result<Self> {
		let client = TcpClient::connect((host, PMAP_PORT), PMAP_PROG, PMAP_VERS)?;
		Ok(Self{ client })
	}

	pub fn get_port(&mut self, m:&Mapping) -> io::Result<u16> {
		self.client.start_call(PMAPPROC_GETPORT)?;
		xdr_pack::pack_mapping(&mut self.client.packer, m.program, m.version, m.protocol, m.port)?;
		self.client.do_call()?;

		let ans:u32 = self.client.unpacker.unpack_u32()?;
		log::debug!("portmapper: program {:#x} v{} is on port {}", m.program, m.version, ans);

		if !self.client.unpacker.all_data_consumed() {
			Err(Error::new(ErrorKind::Other, "Data unexpectedly left over in unpacker after unpacking port"))
		} else if ans == 0 || ans > u16::MAX as u32 {
			Err(Error::new(ErrorKind::NotFound, "Program is not registered with the portmapper"))
		} else {
			Ok(ans as u16)
		}
	}

}
