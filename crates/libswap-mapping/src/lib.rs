//! libswap Mapping
//!
//! Precomputed mapping from source component / variant group keys to their
//! counterparts in the target library.
//!
//! # Example
//!
//! ```rust,ignore
//! use libswap_mapping::{KeyMapping, LibraryMapping};
//! use libswap_model::Direction;
//!
//! let mapping = LibraryMapping::from_path("mapping.json")?;
//! let target = mapping.lookup(Direction::WebToApp, &key);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod table;

pub use error::MappingError;
pub use table::{KeyMapping, LibraryMapping};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
