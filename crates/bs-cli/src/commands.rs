use std::path::{Path, PathBuf};
use std::sync::Arc;

use bs_api::{
    find_orphan_scene_dirs, load_project_from_dir, read_project_manifest, save_project_to_dir,
    save_scene_to_dir,
};
use bs_core::BrickScopeError;
use bs_runtime::{
    DetachedStorage, FsSceneStorage, GlobalSweep, KeepGlobals, Project, ReferencedNameSweep, Scene,
};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{
    map_cli_output, map_cli_project_path, MergeArgs, ProjectArgs, RenameSceneArgs,
    SceneFilterArgs, TeardownArgs,
};

pub(crate) fn run_inspect(args: ProjectArgs) -> Result<Vec<String>, BrickScopeError> {
    let project_dir = resolve_project_dir(&args.project_dir)?;
    let manifest = read_project_manifest(&project_dir)?;
    let project = load_project_from_dir(&project_dir)?;

    let mut lines = vec![
        "RESULT:OK".to_string(),
        format!("PROJECT:{}", project.name()),
    ];
    for scene in project.scenes() {
        let sprites = scene.with_sprites(|sprites| {
            sprites.iter().map(|sprite| sprite.name.clone()).collect::<Vec<_>>()
        });
        let name = scene.name();
        let summary = scene.with_data(|data| {
            json!({
                "name": name,
                "sprites": sprites,
                "projectVariables": data.project_variables().len(),
                "projectLists": data.project_lists().len(),
                "localScopes": data.local_scope_owners().len(),
            })
        });
        lines.push(json_line("SCENE_JSON", &summary)?);
    }
    for orphan in find_orphan_scene_dirs(&project_dir, &manifest)? {
        lines.push(format!("ORPHAN_SCENE:{}", orphan));
    }
    Ok(lines)
}

pub(crate) fn run_merge(args: MergeArgs) -> Result<Vec<String>, BrickScopeError> {
    let project_dir = resolve_project_dir(&args.project.project_dir)?;
    let project = load_project_from_dir(&project_dir)?;
    let scene = find_scene(&project, &args.scene)?;

    let report = scene.promote_referenced_names_to_global_scope()?;
    if !args.dry_run {
        save_scene_to_dir(&scene, &project_dir)?;
    }
    info!(scene = %args.scene, dry_run = args.dry_run, "merged scene names");

    Ok(vec![
        "RESULT:OK".to_string(),
        json_line("CREATED_VARIABLES_JSON", &report.created_variables)?,
        json_line("CREATED_LISTS_JSON", &report.created_lists)?,
        format!("SAVED:{}", !args.dry_run),
    ])
}

pub(crate) fn run_rename_scene(args: RenameSceneArgs) -> Result<Vec<String>, BrickScopeError> {
    let project_dir = resolve_project_dir(&args.project.project_dir)?;
    let project = load_project_from_dir(&project_dir)?;

    if args.dry_run {
        project.rename_scene(&args.scene, &args.to, &DetachedStorage)?;
    } else {
        let storage = project_storage(&project_dir, &project)?;
        project.rename_scene(&args.scene, &args.to, &storage)?;
        save_project_to_dir(&project, &project_dir)?;
    }

    Ok(vec![
        "RESULT:OK".to_string(),
        json_line("RENAMED_JSON", &json!({ "from": args.scene, "to": args.to }))?,
        json_line("SCENES_JSON", &project.scene_names())?,
        format!("SAVED:{}", !args.dry_run),
    ])
}

pub(crate) fn run_rehydrate(args: SceneFilterArgs) -> Result<Vec<String>, BrickScopeError> {
    let project_dir = resolve_project_dir(&args.project.project_dir)?;
    let project = load_project_from_dir(&project_dir)?;

    let mut lines = vec!["RESULT:OK".to_string()];
    for scene in selected_scenes(&project, args.scene.as_deref())? {
        let report = scene.rehydrate_references();
        lines.push(json_line(
            "REHYDRATED_JSON",
            &json!({
                "scene": scene.name(),
                "dataResolved": report.data.resolved,
                "dataDangling": report.data.dangling,
                "spritesResolved": report.sprites.resolved,
                "spritesDangling": report.sprites.dangling,
            }),
        )?);
    }
    Ok(lines)
}

pub(crate) fn run_teardown_clones(args: TeardownArgs) -> Result<Vec<String>, BrickScopeError> {
    let project_dir = resolve_project_dir(&args.project.project_dir)?;
    let project = load_project_from_dir(&project_dir)?;
    let scene = find_scene(&project, &args.scene)?;

    let mut spawned = 0;
    for name in &args.spawn {
        let original = scene.sprite_by_name(name).ok_or_else(|| {
            BrickScopeError::new(
                "CLI_SPRITE_NOT_FOUND",
                format!("Scene \"{}\" has no sprite named \"{}\".", args.scene, name),
            )
        })?;
        if scene.spawn_clone(original.id()).is_some() {
            spawned += 1;
        }
    }

    let sweep: &dyn GlobalSweep = if args.keep_globals {
        &KeepGlobals
    } else {
        &ReferencedNameSweep
    };
    let report = scene.teardown_clones(sweep);

    Ok(vec![
        "RESULT:OK".to_string(),
        format!("SPAWNED:{}", spawned),
        json_line(
            "TEARDOWN_JSON",
            &json!({
                "removedSprites": report.removed_sprites.len(),
                "removedVariables": report.removed_variables,
                "removedLists": report.removed_lists,
                "removedGlobals": report.removed_globals,
            }),
        )?,
        format!("SPRITES:{}", scene.sprite_count()),
    ])
}

pub(crate) fn run_messages(args: SceneFilterArgs) -> Result<Vec<String>, BrickScopeError> {
    let project_dir = resolve_project_dir(&args.project.project_dir)?;
    let project = load_project_from_dir(&project_dir)?;

    let mut lines = vec!["RESULT:OK".to_string()];
    for scene in selected_scenes(&project, args.scene.as_deref())? {
        lines.push(json_line(
            "MESSAGES_JSON",
            &json!({
                "scene": scene.name(),
                "messages": scene.collect_broadcast_message_names(),
            }),
        )?);
    }
    Ok(lines)
}

pub(crate) fn resolve_project_dir(project_dir: &str) -> Result<PathBuf, BrickScopeError> {
    let path = PathBuf::from(project_dir);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(map_cli_project_path)?
            .join(path)
    };

    if !absolute.exists() {
        return Err(BrickScopeError::new(
            "CLI_PROJECT_NOT_FOUND",
            format!("project-dir does not exist: {}", absolute.display()),
        ));
    }
    if !absolute.is_dir() {
        return Err(BrickScopeError::new(
            "CLI_PROJECT_NOT_DIR",
            format!("project-dir is not a directory: {}", absolute.display()),
        ));
    }
    Ok(absolute)
}

/// Filesystem storage rooted at the directory holding the project. The
/// project directory must carry the project's name.
pub(crate) fn project_storage(
    project_dir: &Path,
    project: &Project,
) -> Result<FsSceneStorage, BrickScopeError> {
    let dir_name = project_dir
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    if dir_name != project.name() {
        return Err(BrickScopeError::new(
            "CLI_PROJECT_NAME_MISMATCH",
            format!(
                "project-dir \"{}\" does not match project name \"{}\".",
                dir_name,
                project.name()
            ),
        ));
    }
    let root = project_dir.parent().unwrap_or(project_dir);
    Ok(FsSceneStorage::new(root))
}

fn find_scene(project: &Project, name: &str) -> Result<Arc<Scene>, BrickScopeError> {
    project.scene(name).ok_or_else(|| {
        BrickScopeError::new(
            "CLI_SCENE_NOT_FOUND",
            format!("Project \"{}\" has no scene named \"{}\".", project.name(), name),
        )
    })
}

fn selected_scenes(
    project: &Project,
    name: Option<&str>,
) -> Result<Vec<Arc<Scene>>, BrickScopeError> {
    match name {
        Some(name) => Ok(vec![find_scene(project, name)?]),
        None => Ok(project.scenes().to_vec()),
    }
}

fn json_line(key: &str, value: &impl Serialize) -> Result<String, BrickScopeError> {
    let encoded = serde_json::to_string(value).map_err(map_cli_output)?;
    Ok(format!("{}:{}", key, encoded))
}
