use std::sync::Arc;

use bs_core::{BrickScopeError, ProjectHeader, RenameFailure};
use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

use crate::scene::Scene;
use crate::storage::SceneStorage;

/// Ordered scenes of one project. Scene renames are serialized per project
/// so that the uniqueness check and the rename happen as one step.
#[derive(Debug)]
pub struct Project {
    header: ProjectHeader,
    scenes: Vec<Arc<Scene>>,
    rename_lock: Mutex<()>,
}

impl Project {
    pub fn new(header: ProjectHeader) -> Self {
        Self {
            header,
            scenes: Vec::new(),
            rename_lock: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn header(&self) -> &ProjectHeader {
        &self.header
    }

    pub fn scenes(&self) -> &[Arc<Scene>] {
        &self.scenes
    }

    pub fn scene(&self, name: &str) -> Option<Arc<Scene>> {
        self.scenes.iter().find(|scene| scene.name() == name).cloned()
    }

    pub fn scene_names(&self) -> Vec<String> {
        self.scenes.iter().map(|scene| scene.name()).collect()
    }

    pub fn add_scene(&mut self, scene: Scene) -> Result<Arc<Scene>, BrickScopeError> {
        let name = scene.name();
        if name.is_empty() {
            return Err(BrickScopeError::new(
                "PROJECT_SCENE_NAME_EMPTY",
                "Scene name must not be empty.",
            ));
        }
        if self.scene(&name).is_some() {
            return Err(BrickScopeError::new(
                "PROJECT_SCENE_DUPLICATE",
                format!("Project \"{}\" already has a scene named \"{}\".", self.name(), name),
            ));
        }
        let scene = Arc::new(scene);
        self.scenes.push(scene.clone());
        debug!(project = self.name(), scene = %name, "added scene");
        Ok(scene)
    }

    /// Adds a new scene sized to the project screen, holding a background.
    pub fn create_scene(&mut self, name: &str) -> Result<Arc<Scene>, BrickScopeError> {
        let scene = Scene::new(name, self.header.screen_width, self.header.screen_height);
        self.add_scene(scene)
    }

    pub fn remove_scene(&mut self, name: &str) -> Option<Arc<Scene>> {
        let index = self.scenes.iter().position(|scene| scene.name() == name)?;
        Some(self.scenes.remove(index))
    }

    pub fn rename_scene(
        &self,
        old_name: &str,
        new_name: &str,
        storage: &dyn SceneStorage,
    ) -> Result<(), RenameFailure> {
        let scene = self
            .scene(old_name)
            .ok_or_else(|| RenameFailure::SceneNotFound {
                project: self.name().to_string(),
                name: old_name.to_string(),
            })?;
        scene.rename(new_name, self, storage)
    }

    /// Runs `read` while no scene rename is in flight, so scene names and
    /// scene start/transition targets agree across the whole project.
    pub fn with_renames_settled<R>(&self, read: impl FnOnce(&Self) -> R) -> R {
        let _renames = self.lock_renames();
        read(self)
    }

    pub(crate) fn lock_renames(&self) -> MutexGuard<'_, ()> {
        self.rename_lock.lock()
    }
}

#[cfg(test)]
mod project_tests {
    use super::*;
    use crate::storage::DetachedStorage;
    use bs_core::{Brick, Script, ScriptTrigger, Sprite, StorageError};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingStorage {
        calls: AtomicUsize,
    }

    impl SceneStorage for FailingStorage {
        fn rename_persisted_scene(
            &self,
            _project_name: &str,
            old_name: &str,
            _new_name: &str,
        ) -> Result<(), StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::Missing {
                path: PathBuf::from(old_name),
            })
        }
    }

    fn jumper(name: &str, start: &str, transition: &str) -> Sprite {
        Sprite::with_scripts(
            name,
            vec![Script::with_bricks(
                ScriptTrigger::WhenTapped,
                vec![
                    Brick::SceneStart {
                        scene: start.to_string(),
                    },
                    Brick::SceneTransition {
                        scene: transition.to_string(),
                    },
                ],
            )],
        )
    }

    fn scene_refs(scene: &Scene) -> Vec<String> {
        scene
            .all_bricks()
            .iter()
            .filter_map(|brick| brick.scene_ref().map(|(_, name)| name.to_string()))
            .collect()
    }

    fn project_with_scenes(names: &[&str]) -> Project {
        let mut project = Project::new(ProjectHeader::new("Demo"));
        for name in names {
            project.create_scene(name).expect("unique scene");
        }
        project
    }

    #[test]
    fn scene_names_are_unique_and_ordered() {
        let mut project = project_with_scenes(&["Intro", "Level"]);
        let error = project.create_scene("Intro").expect_err("duplicate");
        assert_eq!(error.code, "PROJECT_SCENE_DUPLICATE");
        assert_eq!(project.scene_names(), vec!["Intro", "Level"]);

        let level = project.scene("Level").expect("level");
        assert_eq!(level.original_width(), project.header().screen_width);
        assert!(project.remove_scene("Intro").is_some());
        assert!(project.remove_scene("Intro").is_none());
        assert_eq!(project.scene_names(), vec!["Level"]);
    }

    #[test]
    fn rename_rewrites_references_in_every_scene() {
        let project = project_with_scenes(&["Intro", "Level", "Outro"]);
        project
            .scene("Intro")
            .expect("intro")
            .add_sprite(jumper("Start", "Level", "Outro"));
        project
            .scene("Outro")
            .expect("outro")
            .add_sprite(jumper("Back", "Level", "Level"));
        project
            .scene("Level")
            .expect("level")
            .add_sprite(jumper("Self", "Level", "Intro"));

        project
            .rename_scene("Level", "Stage 1", &DetachedStorage)
            .expect("rename");

        assert_eq!(project.scene_names(), vec!["Intro", "Stage 1", "Outro"]);
        let intro = project.scene("Intro").expect("intro");
        assert_eq!(scene_refs(&intro), vec!["Stage 1", "Outro"]);
        let outro = project.scene("Outro").expect("outro");
        assert_eq!(scene_refs(&outro), vec!["Stage 1", "Stage 1"]);
        let renamed = project.scene("Stage 1").expect("renamed");
        assert_eq!(scene_refs(&renamed), vec!["Stage 1", "Intro"]);
        for scene in project.scenes() {
            assert!(!scene_refs(scene).iter().any(|name| name == "Level"));
        }
    }

    #[test]
    fn rename_rejects_empty_taken_and_unknown_names() {
        let project = project_with_scenes(&["Intro", "Level"]);
        assert!(matches!(
            project.rename_scene("Intro", "", &DetachedStorage),
            Err(RenameFailure::EmptyName)
        ));
        assert!(matches!(
            project.rename_scene("Intro", "Level", &DetachedStorage),
            Err(RenameFailure::NameTaken { .. })
        ));
        assert!(matches!(
            project.rename_scene("Missing", "Other", &DetachedStorage),
            Err(RenameFailure::SceneNotFound { .. })
        ));
        project
            .rename_scene("Intro", "Intro", &DetachedStorage)
            .expect("same name is a no-op");
        assert_eq!(project.scene_names(), vec!["Intro", "Level"]);
    }

    #[test]
    fn storage_failure_leaves_names_and_references_unchanged() {
        let project = project_with_scenes(&["Intro", "Level"]);
        project
            .scene("Intro")
            .expect("intro")
            .add_sprite(jumper("Start", "Level", "Level"));
        let storage = FailingStorage {
            calls: AtomicUsize::new(0),
        };

        let failure = project
            .rename_scene("Level", "Stage 1", &storage)
            .expect_err("storage fails");
        assert!(matches!(failure, RenameFailure::Storage { .. }));
        assert_eq!(storage.calls.load(Ordering::SeqCst), 1);
        assert_eq!(project.scene_names(), vec!["Intro", "Level"]);
        let intro = project.scene("Intro").expect("intro");
        assert_eq!(scene_refs(&intro), vec!["Level", "Level"]);
    }

    #[test]
    fn concurrent_renames_to_one_name_admit_a_single_winner() {
        let project = Arc::new(project_with_scenes(&["A", "B", "C", "D"]));
        let handles: Vec<_> = ["A", "B", "C", "D"]
            .into_iter()
            .map(|name| {
                let project = Arc::clone(&project);
                std::thread::spawn(move || {
                    project
                        .rename_scene(name, "Final", &DetachedStorage)
                        .is_ok()
                })
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|handle| handle.join().expect("worker thread"))
            .filter(|ok| *ok)
            .count();
        assert_eq!(winners, 1);
        let names = project.scene_names();
        assert_eq!(names.iter().filter(|name| *name == "Final").count(), 1);
    }

    #[test]
    fn settled_reads_never_see_a_half_propagated_rename() {
        let project = Arc::new(project_with_scenes(&["Intro", "Level"]));
        project
            .scene("Intro")
            .expect("intro")
            .add_sprite(jumper("Start", "Level", "Level"));
        let level = project.scene("Level").expect("level");

        let renamer = {
            let project = Arc::clone(&project);
            let level = Arc::clone(&level);
            std::thread::spawn(move || {
                for round in 0..200 {
                    let target = if round % 2 == 0 { "Stage" } else { "Level" };
                    level
                        .rename(target, &project, &DetachedStorage)
                        .expect("rename");
                }
            })
        };
        for _ in 0..200 {
            project.with_renames_settled(|project| {
                let intro = project.scene("Intro").expect("intro");
                assert_eq!(scene_refs(&intro), vec![level.name(), level.name()]);
            });
        }
        renamer.join().expect("renamer thread");
        assert_eq!(project.scene_names(), vec!["Intro", "Level"]);
    }
}
