/// State held for the lifetime of the process
///
/// This module handles:
/// - API key holders for the remote services (keys.rs)
/// - Custom filter parameters behind the Custom Filters sliders (params.rs)

pub mod keys;
pub mod params;
