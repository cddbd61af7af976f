pub mod engine;
pub mod physics;
pub mod project;
pub mod scene;
pub mod storage;
pub mod store;

pub use engine::{
    collect_broadcast_message_names, collect_referenced_names,
    promote_referenced_names_to_global_scope, propagate_scene_rename, rehydrate_data_references,
    rehydrate_sprite_references, teardown_clones, GlobalSweep, KeepGlobals, PromotionReport,
    ReferencedNameSweep, ReferencedNames, RehydrationReport, TeardownReport,
};
pub use physics::{PhysicsWorld, DEFAULT_GRAVITY};
pub use project::Project;
pub use scene::{ReferenceReport, Scene};
pub use storage::{DetachedStorage, FsSceneStorage, SceneStorage, SCENES_DIR};
pub use store::NamedScopeStore;
