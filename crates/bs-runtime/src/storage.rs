use std::fs;
use std::path::{Path, PathBuf};

use bs_core::StorageError;
use tracing::debug;

pub const SCENES_DIR: &str = "scenes";

/// Persistent side of a scene rename. A failed call must leave the
/// persisted scene where it was.
pub trait SceneStorage: Send + Sync {
    fn rename_persisted_scene(
        &self,
        project_name: &str,
        old_name: &str,
        new_name: &str,
    ) -> Result<(), StorageError>;
}

/// Scenes stored as `<projects_root>/<project>/scenes/<scene>/`.
#[derive(Debug, Clone)]
pub struct FsSceneStorage {
    projects_root: PathBuf,
}

impl FsSceneStorage {
    pub fn new(projects_root: impl Into<PathBuf>) -> Self {
        Self {
            projects_root: projects_root.into(),
        }
    }

    pub fn projects_root(&self) -> &Path {
        &self.projects_root
    }

    pub fn scene_path(&self, project_name: &str, scene_name: &str) -> PathBuf {
        self.projects_root
            .join(project_name)
            .join(SCENES_DIR)
            .join(scene_name)
    }
}

impl SceneStorage for FsSceneStorage {
    fn rename_persisted_scene(
        &self,
        project_name: &str,
        old_name: &str,
        new_name: &str,
    ) -> Result<(), StorageError> {
        let from = self.scene_path(project_name, old_name);
        let to = self.scene_path(project_name, new_name);
        if !from.is_dir() {
            return Err(StorageError::Missing { path: from });
        }
        // A case-only rename points at the same directory on case-insensitive
        // file systems.
        let case_only = old_name.eq_ignore_ascii_case(new_name);
        if to.exists() && !case_only {
            return Err(StorageError::TargetExists { path: to });
        }
        fs::rename(&from, &to).map_err(|source| StorageError::Io {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;
        debug!(from = %from.display(), to = %to.display(), "moved scene directory");
        Ok(())
    }
}

/// Storage for projects that exist only in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedStorage;

impl SceneStorage for DetachedStorage {
    fn rename_persisted_scene(
        &self,
        _project_name: &str,
        _old_name: &str,
        _new_name: &str,
    ) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
mod storage_tests {
    use super::*;

    fn temp_root(label: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "brickscope-storage-{}-{}",
            label,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&root);
        root
    }

    #[test]
    fn renames_scene_directory() {
        let root = temp_root("rename");
        let storage = FsSceneStorage::new(&root);
        let old = storage.scene_path("Game", "Intro");
        fs::create_dir_all(&old).expect("create scene dir");
        fs::write(old.join("scene.json"), "{}").expect("write scene");

        storage
            .rename_persisted_scene("Game", "Intro", "Title")
            .expect("rename should pass");
        assert!(!old.exists());
        assert!(storage.scene_path("Game", "Title").join("scene.json").is_file());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_source_and_existing_target_fail() {
        let root = temp_root("fail");
        let storage = FsSceneStorage::new(&root);
        let error = storage
            .rename_persisted_scene("Game", "Intro", "Title")
            .expect_err("missing source");
        assert!(matches!(error, StorageError::Missing { .. }));

        fs::create_dir_all(storage.scene_path("Game", "Intro")).expect("intro");
        fs::create_dir_all(storage.scene_path("Game", "Title")).expect("title");
        let error = storage
            .rename_persisted_scene("Game", "Intro", "Title")
            .expect_err("existing target");
        assert!(matches!(error, StorageError::TargetExists { .. }));
        assert!(storage.scene_path("Game", "Intro").is_dir());
        let _ = fs::remove_dir_all(&root);
    }
}
