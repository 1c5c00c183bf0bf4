// Parsers for the plain-text values SCPI instruments reply with

// Whole-string decimal integer that must fit in an i32
pub fn parse_int(s:&str) -> Result<i32, String> {
	let wide:i64 = s.trim().parse::<i64>()
		.map_err(|_| format!("failed to parse integer: '{}'", s))?;

	if wide > i32::MAX as i64 || wide < i32::MIN as i64 {
		return Err(format!("failed to parse integer: '{}', value too large/small", s));
	}

	Ok(wide as i32)
}

pub fn parse_float(s:&str) -> Result<f32, String> {
	s.trim().parse::<f32>().map_err(|_| format!("failed to parse float: '{}'", s))
}

pub fn parse_bool(s:&str) -> Result<bool, String> {
	match s.trim().to_ascii_uppercase().as_str() {
		"1" | "ON" | "TRUE" | "YES"  => Ok(true),
		"0" | "OFF" | "FALSE" | "NO" => Ok(false),
		_ => Err(format!("failed to parse boolean: '{}'", s)),
	}
}

// Some scopes print the probe factor with a trailing X, e.g. "10X"
pub fn trim_probe_factor(s:&str) -> &str {
	let s = s.trim();
	s.strip_suffix('X').unwrap_or(s)
}
