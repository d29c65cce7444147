//! Smart-protocol transport
//!
//! - `pkt_line`: the length-prefixed line framing used by both exchanges
//! - `client`: blocking HTTP client for ref discovery and pack retrieval

pub mod client;
pub mod pkt_line;
