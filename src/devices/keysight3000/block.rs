// Incremental parser for IEEE 488.2 "arbitrary block program data" headers.
//
// A block looks like `#9000001400<1400 bytes>\n`: a hash sign, one ASCII digit `D` in `1..=9`
// giving the number of length digits, `D` ASCII decimal digits giving the number of payload
// bytes, the payload itself, and a line feed. The header may arrive split across any number of
// reads; BlockHeader::read picks up where the previous call left off and never reads past
// the end of the header.

use std::str;

use crate::{Error, Result};
use crate::scpi::ScpiTransport;

// `#`, the digit count, and at most nine length digits.
pub const MAX_HEADER_LENGTH:usize = 2 + 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
	// Not enough bytes yet; try again when the transport has more.
	Pending,
	// Header complete, with the declared payload length in bytes.
	Complete(usize),
}

#[derive(Debug, Default)]
pub struct BlockHeader {
	buf: [u8; MAX_HEADER_LENGTH],
	num_header_bytes: usize,
	terminator_pending: bool,
}

impl BlockHeader {
	pub fn new() -> BlockHeader {
		BlockHeader::default()
	}

	// Bytes of the current header consumed so far.
	pub fn num_header_bytes(&self) -> usize {
		self.num_header_bytes
	}

	// Called once a block's payload has been consumed: swallows the line feed that trails every
	// block (now, or on the next call to `read` if it hasn't arrived yet) and rearms the parser.
	pub fn finish_block<T: ScpiTransport + ?Sized>(&mut self, transport:&mut T) -> Result<()> {
		self.num_header_bytes = 0;
		self.terminator_pending = true;
		self.discard_terminator(transport)
	}

	fn discard_terminator<T: ScpiTransport + ?Sized>(&mut self, transport:&mut T) -> Result<()> {
		let mut byte = [0u8; 1];
		if transport.read_data(&mut byte)? == 1 {
			self.terminator_pending = false;
			if byte[0] != b'\n' {
				return Err(Error::Protocol(format!("expected line feed after data block, got {:#04x}", byte[0])))
			}
		}
		Ok(())
	}

	fn fill<T: ScpiTransport + ?Sized>(&mut self, transport:&mut T, upto:usize) -> Result<bool> {
		if self.num_header_bytes < upto {
			let count = transport.read_data(&mut self.buf[self.num_header_bytes..upto])?;
			self.num_header_bytes += count;
		}
		Ok(self.num_header_bytes == upto)
	}

	pub fn read<T: ScpiTransport + ?Sized>(&mut self, transport:&mut T) -> Result<Header> {
		if self.terminator_pending {
			self.discard_terminator(transport)?;
			if self.terminator_pending {
				return Ok(Header::Pending)
			}
		}

		// Hash sign and length digit.
		if !self.fill(transport, 2)? {
			return Ok(Header::Pending)
		}

		let (hash, digit) = (self.buf[0], self.buf[1]);
		if hash != b'#' || !digit.is_ascii_digit() || digit == b'0' {
			return Err(Error::Protocol(format!("received invalid data block header '{}{}'",
				hash.escape_ascii(), digit.escape_ascii())))
		}

		let header_length = 2 + (digit - b'0') as usize;
		if !self.fill(transport, header_length)? {
			return Ok(Header::Pending)
		}

		let digits = &self.buf[2..header_length];
		let length = str::from_utf8(digits).ok()
			.filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
			.and_then(|s| s.parse::<usize>().ok())
			.ok_or_else(|| Error::Protocol(format!("received invalid data block length '{}'",
				digits.escape_ascii())))?;

		log::debug!("received data block header '{}' -> block length {}",
			self.buf[..header_length].escape_ascii(), length);

		Ok(Header::Complete(length))
	}
}
