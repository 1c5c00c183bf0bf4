use std::io::{self, Error, ErrorKind};

use crate::xdr::Unpacker;
use crate::rpc::{OpaqueAuth, REPLY, MSG_DENIED, RPC_MISMATCH, AUTH_ERROR, MSG_ACCEPTED};
use crate::rpc::{SUCCESS, PROG_UNAVAIL, PROG_MISMATCH, PROC_UNAVAIL, GARBAGE_ARGS};

fn err(msg:&str) -> io::Error { Error::new(ErrorKind::Other, msg) }

pub fn unpack_auth(unpacker:&mut Unpacker) -> io::Result<OpaqueAuth> {
	let flavor:i32    = unpacker.unpack_enum()?;
	let body:Vec<u8>  = unpacker.unpack_variable_len_opaque()?;
	Ok(OpaqueAuth{ flavor, body })
}

// On success the unpacker is left positioned at the procedure's results
pub fn unpack_replyheader(unpacker:&mut Unpacker) -> io::Result<(u32, OpaqueAuth)> {
	let xid:u32 = unpacker.unpack_u32()?;

	if unpacker.unpack_enum()? != REPLY { return Err(err("Expected REPLY message type in reply header")); }

	match unpacker.unpack_enum()? {
		MSG_ACCEPTED => { },
		MSG_DENIED => {
			return match unpacker.unpack_enum()? {
				RPC_MISMATCH => {
					let low  = unpacker.unpack_u32()?;
					let high = unpacker.unpack_u32()?;
					Err(Error::new(ErrorKind::Other, format!("RPC version mismatch, server supports {}..={}", low, high)))
				},
				AUTH_ERROR => {
					let stat = unpacker.unpack_u32()?;
					Err(Error::new(ErrorKind::PermissionDenied, format!("RPC authentication error {}", stat)))
				},
				_ => Err(err("Message denied for an unknown reason")),
			}
		},
		_ => return Err(err("Neither MSG_DENIED nor MSG_ACCEPTED in reply header")),
	}

	let verf = unpack_auth(unpacker)?;

	match unpacker.unpack_enum()? {
		SUCCESS       => Ok((xid, verf)),
		PROG_UNAVAIL  => Err(err("Program unavailable")),
		PROG_MISMATCH => {
			unpacker.unpack_u32()?;	// lowest version supported
			unpacker.unpack_u32()?;	// highest version supported
			Err(err("Program version mismatch"))
		},
		PROC_UNAVAIL  => Err(err("Procedure unavailable")),
		GARBAGE_ARGS  => Err(err("Server could not decode the arguments")),
		_             => Err(err("Call failed for unknown reason")),
	}
}
