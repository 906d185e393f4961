//! libswap Core
//!
//! Migrates component instances between two parallel design-system
//! libraries while keeping their customizations.
//!
//! # Core Concepts
//!
//! - [`capture_overrides`]: Snapshot an instance's overrides
//! - [`resolve_variant`]: Pick the matching member of a target variant group
//! - [`SwapPipeline`]: Capture, resolve, import, swap and reapply one instance
//! - [`Migrator`]: Clone the selected containers and migrate every instance
//! - [`PluginSession`]: Message-driven front end over the migrator
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use libswap_core::prelude::*;
//!
//! let migrator = Migrator::new(document, mapping, MigrationConfig::default());
//! let report = migrator.migrate_selection(Direction::WebToApp).await?;
//! for entry in &report.errors {
//!     eprintln!("{} failed at {}: {}", entry.instance_id, entry.stage, entry.error_message);
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod capture;
pub mod context;
pub mod error;
pub mod export;
pub mod orchestrator;
pub mod pipeline;
pub mod protocol;
pub mod reapply;
pub mod resolver;
pub mod session;
pub mod types;

pub use capture::capture_overrides;
pub use context::{AncestorCache, FontCache, MigrationContext};
pub use error::{MigrationError, PipelineError, SessionError, StageError};
pub use export::export_library;
pub use orchestrator::Migrator;
pub use pipeline::{SwapPipeline, TargetKey};
pub use protocol::{PluginCommand, PluginMessage, UiRequest};
pub use reapply::{filter_variant_props, reapply_overrides, ReapplyStats};
pub use resolver::{resolve_variant, ResolvedVariant, VariantMatch};
pub use session::{PluginSession, SessionState};
pub use types::{
    ClonedContainer, ErrorLogEntry, MigrationConfig, MigrationReport, MigrationSummary,
    SkipReason, Stage, SwapOutcome,
};

/// Commonly used types
pub mod prelude {
    pub use crate::error::{MigrationError, SessionError};
    pub use crate::orchestrator::Migrator;
    pub use crate::protocol::{PluginCommand, PluginMessage, UiRequest};
    pub use crate::session::PluginSession;
    pub use crate::types::{ErrorLogEntry, MigrationConfig, MigrationReport, Stage};
    pub use libswap_document::{DocumentStore, InMemoryDocument, Scene};
    pub use libswap_mapping::{KeyMapping, LibraryMapping};
    pub use libswap_model::Direction;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
