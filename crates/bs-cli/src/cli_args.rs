use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "brickscope")]
#[command(about = "Scope resolution and reference maintenance for brick projects")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Summarize scenes, sprites and data of a project.
    Inspect(ProjectArgs),
    /// Promote every referenced variable and list of a scene to global scope.
    Merge(MergeArgs),
    RenameScene(RenameSceneArgs),
    /// Re-resolve cached references and report dangling ones.
    Rehydrate(SceneFilterArgs),
    TeardownClones(TeardownArgs),
    /// List broadcast message names in first-use order.
    Messages(SceneFilterArgs),
}

#[derive(Debug, Args)]
pub(crate) struct ProjectArgs {
    #[arg(long = "project-dir")]
    pub(crate) project_dir: String,
}

#[derive(Debug, Args)]
pub(crate) struct MergeArgs {
    #[command(flatten)]
    pub(crate) project: ProjectArgs,
    #[arg(long = "scene")]
    pub(crate) scene: String,
    #[arg(long = "dry-run")]
    pub(crate) dry_run: bool,
}

#[derive(Debug, Args)]
pub(crate) struct RenameSceneArgs {
    #[command(flatten)]
    pub(crate) project: ProjectArgs,
    #[arg(long = "scene")]
    pub(crate) scene: String,
    #[arg(long = "to")]
    pub(crate) to: String,
    #[arg(long = "dry-run")]
    pub(crate) dry_run: bool,
}

#[derive(Debug, Args)]
pub(crate) struct SceneFilterArgs {
    #[command(flatten)]
    pub(crate) project: ProjectArgs,
    #[arg(long = "scene")]
    pub(crate) scene: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct TeardownArgs {
    #[command(flatten)]
    pub(crate) project: ProjectArgs,
    #[arg(long = "scene")]
    pub(crate) scene: String,
    /// Spawn one clone of the named sprite before tearing clones down.
    #[arg(long = "spawn")]
    pub(crate) spawn: Vec<String>,
    #[arg(long = "keep-globals")]
    pub(crate) keep_globals: bool,
}
