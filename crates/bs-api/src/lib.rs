mod document;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use bs_core::BrickScopeError;
use bs_runtime::{Project, ReferenceReport, Scene, SCENES_DIR};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

pub use document::{DataDocument, ListEntry, ProjectManifest, SceneDocument, VariableEntry};

pub const PROJECT_FILE: &str = "project.json";
pub const SCENE_FILE: &str = "scene.json";

pub fn project_file_path(project_dir: &Path) -> PathBuf {
    project_dir.join(PROJECT_FILE)
}

pub fn scene_file_path(project_dir: &Path, scene_name: &str) -> PathBuf {
    project_dir.join(SCENES_DIR).join(scene_name).join(SCENE_FILE)
}

pub fn read_project_manifest(project_dir: &Path) -> Result<ProjectManifest, BrickScopeError> {
    let manifest: ProjectManifest = read_json(
        &project_file_path(project_dir),
        "API_PROJECT_READ",
        "API_PROJECT_PARSE",
    )?;
    manifest.validate()?;
    Ok(manifest)
}

pub fn read_scene_document(
    project_dir: &Path,
    scene_name: &str,
) -> Result<SceneDocument, BrickScopeError> {
    let document: SceneDocument = read_json(
        &scene_file_path(project_dir, scene_name),
        "API_SCENE_READ",
        "API_SCENE_PARSE",
    )?;
    document.validate()?;
    if document.name != scene_name {
        return Err(BrickScopeError::new(
            "API_SCENE_NAME_MISMATCH",
            format!(
                "Scene directory \"{}\" holds a document named \"{}\".",
                scene_name, document.name
            ),
        ));
    }
    Ok(document)
}

/// Loads every scene listed in the manifest, in manifest order, and
/// rehydrates its references. Scene directories the manifest does not list
/// are reported and skipped.
pub fn load_project_from_dir(project_dir: &Path) -> Result<Project, BrickScopeError> {
    let manifest = read_project_manifest(project_dir)?;
    for orphan in find_orphan_scene_dirs(project_dir, &manifest)? {
        warn!(
            project = %manifest.header.name,
            scene = %orphan,
            "scene directory not listed in project.json"
        );
    }

    let mut project = Project::new(manifest.header.clone());
    for scene_name in &manifest.scenes {
        let document = read_scene_document(project_dir, scene_name)?;
        let scene = scene_from_document(&project, document)?;
        project.add_scene(scene)?;
    }
    debug!(
        project = project.name(),
        scenes = project.scenes().len(),
        "loaded project"
    );
    Ok(project)
}

/// Builds a scene sized to the project and resolves its references.
pub fn scene_from_document(
    project: &Project,
    document: SceneDocument,
) -> Result<Scene, BrickScopeError> {
    let (name, sprites, store) = document.into_parts()?;
    let header = project.header();
    let scene = Scene::from_parts(name, header.screen_width, header.screen_height, sprites, store);
    log_dangling(&scene, scene.rehydrate_references());
    Ok(scene)
}

/// Replaces the sprites and store of `scene` with the document's and
/// rehydrates every cached reference against the new store.
pub fn reload_scene(
    scene: &Scene,
    document: SceneDocument,
) -> Result<ReferenceReport, BrickScopeError> {
    let scene_name = scene.name();
    if document.name != scene_name {
        return Err(BrickScopeError::new(
            "API_SCENE_NAME_MISMATCH",
            format!(
                "Cannot reload scene \"{}\" from a document named \"{}\".",
                scene_name, document.name
            ),
        ));
    }
    let (_, sprites, store) = document.into_parts()?;
    scene.set_sprites(sprites);
    scene.set_data(store);
    let report = scene.rehydrate_references();
    log_dangling(scene, report);
    Ok(report)
}

/// Writes `project.json` and one `scene.json` per scene.
pub fn save_project_to_dir(project: &Project, project_dir: &Path) -> Result<(), BrickScopeError> {
    let manifest = ProjectManifest::new(project.header().clone(), project.scene_names());
    write_json(&project_file_path(project_dir), &manifest, "API_PROJECT_WRITE")?;
    for scene in project.scenes() {
        save_scene_to_dir(scene, project_dir)?;
    }
    debug!(project = project.name(), dir = %project_dir.display(), "saved project");
    Ok(())
}

pub fn save_scene_to_dir(scene: &Scene, project_dir: &Path) -> Result<(), BrickScopeError> {
    let document = SceneDocument::from_scene(scene);
    write_json(
        &scene_file_path(project_dir, &document.name),
        &document,
        "API_SCENE_WRITE",
    )
}

/// Directories under `scenes/` holding a scene file but absent from the
/// manifest.
pub fn find_orphan_scene_dirs(
    project_dir: &Path,
    manifest: &ProjectManifest,
) -> Result<Vec<String>, BrickScopeError> {
    let scenes_dir = project_dir.join(SCENES_DIR);
    if !scenes_dir.is_dir() {
        return Ok(Vec::new());
    }
    let listed = manifest.scenes.iter().map(String::as_str).collect::<BTreeSet<_>>();

    let mut orphans = Vec::new();
    for entry in WalkDir::new(&scenes_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(|error| {
            BrickScopeError::new(
                "API_SCENES_SCAN",
                format!("Failed to scan {}: {}", scenes_dir.display(), error),
            )
        })?;
        if !entry.file_type().is_dir() || !entry.path().join(SCENE_FILE).is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if !listed.contains(name.as_str()) {
            orphans.push(name);
        }
    }
    Ok(orphans)
}

fn log_dangling(scene: &Scene, report: ReferenceReport) {
    let dangling = report.data.dangling + report.sprites.dangling;
    if dangling > 0 {
        warn!(scene = %scene.name(), dangling, "references left unresolved");
    }
}

fn read_json<T: DeserializeOwned>(
    path: &Path,
    read_code: &str,
    parse_code: &str,
) -> Result<T, BrickScopeError> {
    let text = fs::read_to_string(path).map_err(|error| {
        BrickScopeError::new(
            read_code,
            format!("Failed to read {}: {}", path.display(), error),
        )
    })?;
    serde_json::from_str(&text).map_err(|error| {
        BrickScopeError::new(
            parse_code,
            format!("Failed to parse {}: {}", path.display(), error),
        )
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T, code: &str) -> Result<(), BrickScopeError> {
    let io_error = |error: std::io::Error| {
        BrickScopeError::new(code, format!("Failed to write {}: {}", path.display(), error))
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let mut text = serde_json::to_string_pretty(value).map_err(|error| {
        BrickScopeError::new(
            code,
            format!("Failed to serialize {}: {}", path.display(), error),
        )
    })?;
    text.push('\n');
    fs::write(path, text).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bs_core::{DataTier, NamedEntity, SceneRefKind, ScopeOwner};
    use bs_runtime::{FsSceneStorage, ReferencedNameSweep};
    use bs_test_fixtures::{copy_fixture_to_temp, fixture_dir, SAMPLE_PROJECT};

    #[test]
    fn load_project_follows_manifest_order() {
        let project = load_project_from_dir(&fixture_dir(SAMPLE_PROJECT)).expect("fixture loads");
        assert_eq!(project.name(), SAMPLE_PROJECT);
        assert_eq!(project.scene_names(), vec!["Title", "Level1", "Finale"]);
        let level = project.scene("Level1").expect("level");
        assert_eq!(level.original_width(), 720);
        assert!(level.project_variable_with_name("score").is_some());
    }

    #[test]
    fn load_rehydrates_local_before_global() {
        let project = load_project_from_dir(&fixture_dir(SAMPLE_PROJECT)).expect("fixture loads");
        let level = project.scene("Level1").expect("level");
        let rocket = level.sprite_by_name("Rocket").expect("rocket");
        let fuel = level
            .with_data(|data| {
                data.lookup(DataTier::Variable, ScopeOwner::Sprite(rocket.id()), "fuel")
            })
            .expect("rocket owns fuel");
        let cached = rocket
            .all_bricks()
            .filter_map(|brick| brick.variable_ref())
            .find(|reference| reference.name == "fuel")
            .and_then(|reference| reference.cached());
        assert_eq!(cached, Some(fuel));
        assert_eq!(level.sprite_by_user_variable(fuel), Some(rocket.id()));
    }

    #[test]
    fn orphan_scene_directories_are_reported_not_loaded() {
        let dir = fixture_dir(SAMPLE_PROJECT);
        let manifest = read_project_manifest(&dir).expect("manifest");
        assert_eq!(
            find_orphan_scene_dirs(&dir, &manifest).expect("scan"),
            vec!["Draft"]
        );
        let project = load_project_from_dir(&dir).expect("fixture loads");
        assert!(project.scene("Draft").is_none());
    }

    #[test]
    fn save_then_load_keeps_structure_and_values() {
        let project_dir = copy_fixture_to_temp(SAMPLE_PROJECT, "api-save");
        let project = load_project_from_dir(&project_dir).expect("load");
        let finale = project.scene("Finale").expect("finale");
        let report = finale
            .promote_referenced_names_to_global_scope()
            .expect("no local names in Finale");
        assert_eq!(report.created_lists, vec!["stars"]);
        assert!(report.created_variables.is_empty());
        save_project_to_dir(&project, &project_dir).expect("save");

        let reloaded = load_project_from_dir(&project_dir).expect("reload");
        assert_eq!(reloaded.scene_names(), project.scene_names());
        let finale = reloaded.scene("Finale").expect("finale");
        assert!(finale.project_list_with_name("stars").is_some());
        let score = finale.project_variable_with_name("score").expect("score");
        assert_eq!(score.name(), "score");
        assert_eq!(score.value, bs_core::DataValue::Number(0.0));
    }

    #[test]
    fn promotion_in_scene_with_local_names_is_rejected() {
        let project = load_project_from_dir(&fixture_dir(SAMPLE_PROJECT)).expect("load");
        let level = project.scene("Level1").expect("level");
        let conflict = level
            .promote_referenced_names_to_global_scope()
            .expect_err("fuel is local to Rocket");
        assert_eq!(conflict.name(), "fuel");
        assert!(level.project_variable_with_name("fuel").is_none());
    }

    #[test]
    fn rename_then_save_moves_scene_directory() {
        let project_dir = copy_fixture_to_temp(SAMPLE_PROJECT, "api-rename");
        let project = load_project_from_dir(&project_dir).expect("load");
        let storage = FsSceneStorage::new(project_dir.parent().expect("temp parent"));
        project
            .rename_scene("Level1", "Asteroids", &storage)
            .expect("rename");
        save_project_to_dir(&project, &project_dir).expect("save");

        assert!(!project_dir.join(SCENES_DIR).join("Level1").exists());
        let reloaded = load_project_from_dir(&project_dir).expect("reload");
        assert_eq!(reloaded.scene_names(), vec!["Title", "Asteroids", "Finale"]);
        let title = reloaded.scene("Title").expect("title");
        let targets = title
            .all_bricks()
            .iter()
            .filter_map(|brick| match brick.scene_ref() {
                Some((SceneRefKind::Start, name)) => Some(name.to_string()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(targets, vec!["Asteroids"]);
    }

    #[test]
    fn reload_scene_replaces_store_and_rehydrates() {
        let project = load_project_from_dir(&fixture_dir(SAMPLE_PROJECT)).expect("load");
        let level = project.scene("Level1").expect("level");
        let rocket_before = level.sprite_by_name("Rocket").expect("rocket").id();
        let clone = level.spawn_clone(rocket_before).expect("clone");
        level.teardown_clones(&ReferencedNameSweep);
        assert!(level.sprite(clone).is_none());

        let document = read_scene_document(&fixture_dir(SAMPLE_PROJECT), "Level1").expect("doc");
        let report = reload_scene(&level, document).expect("reload");
        assert_eq!(report.data.dangling, 0);
        let rocket_after = level.sprite_by_name("Rocket").expect("rocket").id();
        assert_ne!(rocket_before, rocket_after);

        let other = read_scene_document(&fixture_dir(SAMPLE_PROJECT), "Title").expect("doc");
        let error = reload_scene(&level, other).expect_err("name mismatch");
        assert_eq!(error.code, "API_SCENE_NAME_MISMATCH");
    }

    #[test]
    fn missing_project_file_maps_to_read_error() {
        let error = load_project_from_dir(Path::new("/definitely/not/here")).expect_err("missing");
        assert_eq!(error.code, "API_PROJECT_READ");
    }
}
