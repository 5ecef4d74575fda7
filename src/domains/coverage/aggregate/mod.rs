pub mod plan;
pub mod types;
pub mod workspace;

// Re-export all public types for convenience
pub use plan::*;
pub use types::*;
pub use workspace::*;
