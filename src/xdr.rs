use std::io::{self, Cursor, Error, ErrorKind, Read};

use byteorder::{BigEndian, WriteBytesExt, ReadBytesExt};

fn err(msg:&str) -> io::Error { Error::new(ErrorKind::Other, msg) }

fn padding(len:usize) -> usize { (4 - len % 4) % 4 }

pub struct Packer {
	buff: Vec<u8>
}

pub struct Unpacker {
	rdr: Cursor<Vec<u8>>
}

impl Packer {

	pub fn new() -> Self { Packer{ buff: Vec::new() } }

	pub fn reset(&mut self) { self.buff.clear(); }

	pub fn as_bytes(&self) -> &[u8] { &self.buff }

	// Every primitive takes a multiple of four bytes, so alignment only needs fixing after opaque data
	pub fn pack_u32(&mut self, x:u32) -> io::Result<()> { self.buff.write_u32::<BigEndian>(x) }
	pub fn pack_i32(&mut self, x:i32) -> io::Result<()> { self.buff.write_i32::<BigEndian>(x) }
	pub fn pack_enum(&mut self, x:i32) -> io::Result<()> { self.pack_i32(x) }
	pub fn pack_bool(&mut self, b:bool) -> io::Result<()> { self.pack_i32(b as i32) }

	pub fn pack_variable_len_opaque(&mut self, data:&[u8]) -> io::Result<()> {
		self.pack_u32(data.len() as u32)?;
		self.buff.extend_from_slice(data);
		self.buff.resize(self.buff.len() + padding(data.len()), 0);
		Ok(())
	}

}

impl Unpacker {

	pub fn new() -> Self { Unpacker{ rdr: Cursor::new(Vec::new()) } }

	pub fn reset(&mut self, data:Vec<u8>) { self.rdr = Cursor::new(data); }

	pub fn remaining(&self) -> usize {
		self.rdr.get_ref().len().saturating_sub(self.rdr.position() as usize)
	}

	pub fn all_data_consumed(&self) -> bool { self.remaining() == 0 }

	pub fn unpack_u32(&mut self) -> io::Result<u32> { self.rdr.read_u32::<BigEndian>() }
	pub fn unpack_i32(&mut self) -> io::Result<i32> { self.rdr.read_i32::<BigEndian>() }

	// Whether the value belongs to the enumeration depends on the caller, so here it's just an i32
	pub fn unpack_enum(&mut self) -> io::Result<i32> { self.unpack_i32() }

	pub fn unpack_bool(&mut self) -> io::Result<bool> {
		match self.unpack_i32()? {
			0 => Ok(false),
			1 => Ok(true),
			_ => Err(err("Expected 0 or 1 when unpacking a bool")),
		}
	}

	pub fn unpack_variable_len_opaque(&mut self) -> io::Result<Vec<u8>> {
		let n = self.unpack_u32()? as usize;
		if n > self.remaining() {
			return Err(err("Opaque length runs past the end of the buffer"));
		}

		let mut ans:Vec<u8> = vec![0; n];
		self.rdr.read_exact(&mut ans)?;

		// Skip the padding, but tolerate a reply that stops right after the data
		let skip = padding(n).min(self.remaining());
		self.rdr.set_position(self.rdr.position() + skip as u64);
		Ok(ans)
	}

}
