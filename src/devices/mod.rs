// Currently only the Keysight InfiniiVision scopes are supported.  Drivers are organized into
// modules by series, each one talking SCPI through whatever transport it's handed

pub mod keysight3000;
