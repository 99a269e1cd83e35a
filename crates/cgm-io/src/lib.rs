//! # cgm-io: Network document I/O
//!
//! Reads and writes networks (grid fragments as well as merged models) as
//! JSON documents:
//!
//! ```json
//! {
//!   "id": "BE",
//!   "source_format": "cgmes",
//!   "substations": [{ "id": "S1", "country": "BE" }],
//!   "voltage_levels": [
//!     { "id": "VL1", "substation": "S1", "nominal_v": 380.0,
//!       "topology": "bus_breaker", "buses": [{ "id": "B1" }] }
//!   ],
//!   "lines": [],
//!   "dangling_lines": [
//!     { "id": "L1", "r": 1.0, "x": 10.0, "boundary": "XBE_NL",
//!       "terminal": { "voltage_level": "VL1", "bus": "B1", "connected": true } }
//!   ]
//! }
//! ```
//!
//! Loading replays every entity through the validating `Network::add_*`
//! API, so dangling references, duplicate identifiers and topology mismatches
//! are reported with the offending entity instead of producing a corrupt
//! network.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cgm_io::{load_network, write_network};
//!
//! fn main() -> anyhow::Result<()> {
//!     let network = load_network("be.json")?;
//!     println!("{}", network.stats());
//!     write_network(&network, "be-copy.json")?;
//!     Ok(())
//! }
//! ```

pub mod document;

pub use document::{
    load_network, network_from_document, parse_network, parse_network_string, to_document,
    write_network, ImportResult, NetworkDocument,
};
