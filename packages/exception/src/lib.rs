//! Classified exception values
//!
//! Provides the failure value shared by the faultline crates:
//! - Nature and durability classification fixed at construction
//! - Raw return-address capture (no symbolication)
//! - A context chain narrating each layer the exception passed through
//! - Text rendering of all of the above

pub mod constructors;
pub mod display;
pub mod trace;
pub mod types;

pub use trace::capture_return_addresses;
pub use types::{Context, Contexts, Durability, Exception, Nature, MAX_TRACE};
