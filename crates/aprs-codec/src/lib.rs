#![deny(missing_docs)]

//! # APRS codec
//!
//! Frame-level encoding and decoding for APRS over AX.25.
//!
//! ## Frame anatomy
//!
//! ```text
//! Frame
//! ├── source       Callsign
//! ├── destination  Callsign (TOCALL)
//! ├── path         Vec<Callsign>, at most 8 digipeaters
//! └── info         InformationField
//!     ├── data_type    DataType, from the first payload byte
//!     └── payload      raw bytes
//! ```
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`callsign`] | `Callsign` text and AX.25 octet forms, `valid_callsign` |
//! | [`data_type`] | `DataType` table keyed by the identifier byte |
//! | [`information`] | `InformationField`, dialect handlers and their registry |
//! | [`frame`] | `Frame`, `RawFrame`, AX.25 and text encoding |
//! | [`fcs`] | CRC-16 frame check sequence |
//! | [`kiss`] | Flag stripping and KISS byte stuffing |
//! | [`geo`] | Degrees/minutes formatting and position ambiguity |
//! | [`position`] | `PositionReport` builder |
//! | [`error`] | `CodecError` |

pub mod callsign;
pub mod data_type;
pub mod error;
pub mod fcs;
pub mod frame;
pub mod geo;
pub mod information;
pub mod kiss;
pub mod position;

// Re-export public types at crate root; `kiss` stays namespaced.
pub use callsign::*;
pub use data_type::*;
pub use error::*;
pub use fcs::*;
pub use frame::*;
pub use geo::*;
pub use information::*;
pub use position::*;
