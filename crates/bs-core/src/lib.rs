pub mod brick;
pub mod data;
pub mod error;
pub mod formula;
pub mod header;
pub mod ids;
pub mod script;
pub mod sprite;

pub use brick::*;
pub use data::*;
pub use error::{BrickScopeError, RenameFailure, ScopeConflict, StorageError};
pub use formula::*;
pub use header::*;
pub use ids::*;
pub use script::*;
pub use sprite::*;
