use std::fmt;
use std::io;

#[derive(Debug)]
pub enum Error {
	// The link to the instrument failed to send or receive.
	Transport(io::Error),
	// The instrument answered, but with something we can't make sense of.
	Protocol(String),
	// The instrument is configured in a way the driver doesn't support.
	Config(String),
	// The driver reached a state it should never be in.
	Bug(&'static str),
}

impl fmt::Display for Error {
	fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Transport(io_error) =>
				write!(f, "transport error: {}", io_error),
			Self::Protocol(msg) =>
				write!(f, "protocol error: {}", msg),
			Self::Config(msg) =>
				write!(f, "configuration error: {}", msg),
			Self::Bug(msg) =>
				write!(f, "BUG: {}", msg),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			&Self::Transport(ref io_error) => Some(io_error),
			_ => None
		}
	}
}

impl From<io::Error> for Error {
	fn from(error:io::Error) -> Self {
		Error::Transport(error)
	}
}

impl From<Error> for io::Error {
	fn from(error:Error) -> Self {
		match error {
			Error::Transport(io_error) => io_error,
			error => io::Error::new(io::ErrorKind::Other, error.to_string()),
		}
	}
}

pub type Result<T> =
	core::result::Result<T, Error>;
