// SCPI command/response helpers on top of a byte transport.
//
// SCPI is half-duplex: every query is a `send` followed by a `receive`, and a binary response
// (such as `:WAV:DATA?`) is drained with `read_begin` and repeated `read_data` calls until
// `read_complete` says the instrument has nothing more to give.

use crate::{Error, Result};
use crate::utils;

pub mod vxi11;

#[cfg(test)]
pub(crate) mod mock;

// How many times `*OPC?` is asked before giving up.
const OPC_RETRIES:usize = 10;

pub trait ScpiTransport {
	// Write one command line.
	fn send(&mut self, command:&str) -> Result<()>;

	// Read one complete text response, with the terminator still attached.
	fn receive(&mut self) -> Result<String>;

	// Prepare to stream a binary response.
	fn read_begin(&mut self) -> Result<()>;

	// Read up to `buf.len()` bytes of the current response. Returns `Ok(0)` if nothing is
	// available right now.
	fn read_data(&mut self, buf:&mut [u8]) -> Result<usize>;

	// Whether the current response has been fully drained.
	fn read_complete(&self) -> bool;

	fn get_string(&mut self, command:&str) -> Result<String> {
		self.send(command)?;
		let response = self.receive()?;
		let response = response.trim_end_matches(&['\r', '\n'][..]);
		log::trace!("{} -> {:?}", command, response);
		Ok(response.to_owned())
	}

	fn get_float(&mut self, command:&str) -> Result<f32> {
		let response = self.get_string(command)?;
		utils::parse_float(&response).map_err(|e| protocol(command, e))
	}

	fn get_int(&mut self, command:&str) -> Result<i32> {
		let response = self.get_string(command)?;
		utils::parse_int(&response).map_err(|e| protocol(command, e))
	}

	fn get_bool(&mut self, command:&str) -> Result<bool> {
		let response = self.get_string(command)?;
		utils::parse_bool(&response).map_err(|e| protocol(command, e))
	}

	// Block until the instrument reports all pending operations complete.
	fn get_opc(&mut self) -> Result<()> {
		for _ in 0..OPC_RETRIES {
			if self.get_bool("*OPC?")? {
				return Ok(())
			}
		}
		Err(Error::Protocol(format!("*OPC? did not report completion after {} tries", OPC_RETRIES)))
	}
}

fn protocol(command:&str, message:String) -> Error {
	Error::Protocol(format!("{} in reply to {}", message, command))
}
