//! tfplug - Terraform provider framework for Rust
//!
//! The trait surface a provider implements (provider, resources, data
//! sources), the dynamic value and schema types that flow through it, and an
//! in-process harness that drives a provider the way a host would.

// Core modules
pub mod context;
pub mod error;
pub mod schema;
pub mod types;

// Provider API modules
pub mod data_source;
pub mod provider;
pub mod resource;

// Helper modules
pub mod import;
pub mod logging;
pub mod plan_modifier;
pub mod testing;

// Re-exports for convenience
pub use context::Context;
pub use data_source::{DataSource, DataSourceWithConfigure};
pub use error::{Result, TfplugError};
pub use import::{import_state_composite_id, import_state_passthrough_id};
pub use logging::try_init_logging;
pub use plan_modifier::{PlanModifier, RequiresReplace, UseStateForUnknown};
pub use provider::{DataSourceFactory, Provider, ResourceFactory};
pub use resource::{Resource, ResourceWithConfigure};
pub use schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
pub use testing::{HarnessError, ProviderHarness};
pub use types::{Diagnostic, Dynamic, DynamicValue};
