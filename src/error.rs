//! Error types for egui-drag-menu

use thiserror::Error;

/// Errors reported by menu buttons
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    /// The host never supplied a surface to present the panel on
    #[error("menu \"{title}\" has no presentation surface to open on")]
    MissingSurface {
        /// Title of the menu that failed to open
        title: String,
    },

    /// A close transition was completed that is not pending on this button
    #[error("no pending close transition with id {0}")]
    UnknownTransition(u64),
}

/// Result type for menu operations
pub type Result<T> = std::result::Result<T, MenuError>;
