//! Creator Core - Shared library for layered project scaffolding
//!
//! A project is created by composing one or more template directories. Each
//! template may inherit from others; the resolved ancestors are applied first
//! and the selected template last, with `{{key}}` placeholders substituted in
//! text files, `+name` entries deep-merged into existing JSON/YAML files and
//! `-name` entries removing paths produced by earlier layers.
//!
//! # Architecture
//!
//! - **Layer 1: Core Operations** - Template discovery, inheritance resolution,
//!   substitution, structured merge and materialization (`templates`)
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait, configuration
//!   mapping and `create_project`
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use creator_core::{templates, ConfigBuilder, TemplateRegistry};
//!
//! let registry = TemplateRegistry::discover("templates")?;
//! let config = ConfigBuilder::new().project_name("my-app").build();
//! let report = templates::create_project(&registry, "static", "my-app".as_ref(), &config).await?;
//! ```

pub mod config;
pub mod error;
pub mod product;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{ConfigBuilder, ConfigValue, Configuration};
pub use error::{CreatorError, MergeError, Result};
pub use product::ProductConfig;
pub use templates::{
    create_project, materialize, MaterializeReport, Template, TemplateManifest, TemplateRegistry,
};

#[cfg(feature = "tui")]
pub use tui::run;
