use std::path::PathBuf;

use thiserror::Error;

use crate::ids::{DataTier, ScopeOwner, SpriteId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct BrickScopeError {
    pub code: String,
    pub message: String,
}

impl BrickScopeError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScopeConflict {
    #[error("{tier} \"{name}\" already exists in the local scope of {} sprite(s)", .owners.len())]
    LocalCollision {
        tier: DataTier,
        name: String,
        owners: Vec<SpriteId>,
    },
    #[error("{tier} \"{name}\" already exists in {scope}")]
    DuplicateName {
        tier: DataTier,
        scope: ScopeOwner,
        name: String,
    },
}

impl ScopeConflict {
    pub fn name(&self) -> &str {
        match self {
            Self::LocalCollision { name, .. } | Self::DuplicateName { name, .. } => name,
        }
    }

    pub fn tier(&self) -> DataTier {
        match self {
            Self::LocalCollision { tier, .. } | Self::DuplicateName { tier, .. } => *tier,
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("scene directory {} does not exist", .path.display())]
    Missing { path: PathBuf },
    #[error("scene directory {} already exists", .path.display())]
    TargetExists { path: PathBuf },
    #[error("failed to move {} to {}: {source}", .from.display(), .to.display())]
    Io {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum RenameFailure {
    #[error("scene name must not be empty")]
    EmptyName,
    #[error("scene \"{name}\" does not exist in project \"{project}\"")]
    SceneNotFound { project: String, name: String },
    #[error("project \"{project}\" already has a scene named \"{name}\"")]
    NameTaken { project: String, name: String },
    #[error("could not rename scene \"{old}\" to \"{new}\": {source}")]
    Storage {
        old: String,
        new: String,
        source: StorageError,
    },
}

impl From<ScopeConflict> for BrickScopeError {
    fn from(conflict: ScopeConflict) -> Self {
        let code = match conflict {
            ScopeConflict::LocalCollision { .. } => "SCOPE_LOCAL_COLLISION",
            ScopeConflict::DuplicateName { .. } => "SCOPE_DUPLICATE_NAME",
        };
        Self::new(code, conflict.to_string())
    }
}

impl From<RenameFailure> for BrickScopeError {
    fn from(failure: RenameFailure) -> Self {
        let code = match failure {
            RenameFailure::EmptyName => "RENAME_EMPTY_NAME",
            RenameFailure::SceneNotFound { .. } => "RENAME_SCENE_NOT_FOUND",
            RenameFailure::NameTaken { .. } => "RENAME_NAME_TAKEN",
            RenameFailure::Storage { .. } => "RENAME_STORAGE",
        };
        Self::new(code, failure.to_string())
    }
}
