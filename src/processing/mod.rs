/// Image operations
///
/// Each operation opens a file, runs a fixed recipe chosen by its request
/// parameters and writes a derived file beside the input.

pub mod analysis;
pub mod batch;
pub mod convert;
pub mod enhance;
pub mod filters;
pub mod icons;
pub mod io;
pub mod naming;
pub mod resize;
