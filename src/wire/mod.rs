//! Wire encodings used by the network destinations
//!
//! Kept apart from the destinations so the byte-level formats can be tested
//! without a socket in sight.

pub mod rfc5424;
pub mod ws;
