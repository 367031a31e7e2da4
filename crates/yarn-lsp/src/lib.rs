pub mod config;
pub mod document;
pub mod handlers;
pub mod quick_fix;
pub mod server;

// Re-export from yarn-core
pub use yarn_core::{Result, YarnError};

pub use config::EngineConfiguration;
pub use document::{Project, Workspace};
pub use quick_fix::{FixContext, ProposedFix, resolve_quick_fixes};
pub use server::Backend;
