//! # UI Error Types
//!
//! All errors that can occur in the UI system.

use crate::config::ConfigError;
use crate::current::ContextHandle;
use crate::font::FontError;
use crate::tree::ElementId;
use thiserror::Error;

/// Errors that can occur in the UI system.
#[derive(Error, Debug)]
pub enum UiError {
    /// The handle does not name a live element.
    #[error("element not found: {0:?}")]
    ElementNotFound(ElementId),

    /// The element is already attached somewhere else.
    #[error("element {child:?} already has parent {parent:?}")]
    AlreadyParented {
        /// The element being attached.
        child: ElementId,
        /// Its current parent.
        parent: ElementId,
    },

    /// Attaching would make an element its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCycle {
        /// The element being attached.
        child: ElementId,
        /// The requested parent.
        parent: ElementId,
    },

    /// The operation is not permitted on the root element.
    #[error("operation not permitted on the root element")]
    RootElement,

    /// No context is current on this thread.
    #[error("no current context")]
    NoCurrentContext,

    /// The handle does not name a live context.
    #[error("context not found: {0:?}")]
    ContextNotFound(ContextHandle),

    /// The context is already borrowed, e.g. from inside a click callback.
    #[error("context is busy (re-entrant access)")]
    ContextBusy,

    /// Invalid font description.
    #[error(transparent)]
    Font(#[from] FontError),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for UI operations.
pub type UiResult<T> = Result<T, UiError>;
