use std::sync::Arc;

use bs_core::{
    Brick, DataTier, EntityId, NamedEntity, RenameFailure, ScopeConflict, ScopeOwner, Sprite,
    SpriteId, UserList, UserVariable, BACKGROUND_SPRITE_NAME,
};
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::engine::{
    collect_broadcast_message_names, promote_referenced_names_to_global_scope,
    propagate_scene_rename, rehydrate_data_references, rehydrate_sprite_references,
    teardown_clones, GlobalSweep, PromotionReport, RehydrationReport, TeardownReport,
};
use crate::physics::PhysicsWorld;
use crate::project::Project;
use crate::storage::SceneStorage;
use crate::store::NamedScopeStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReferenceReport {
    pub data: RehydrationReport,
    pub sprites: RehydrationReport,
}

#[derive(Debug)]
struct SceneState {
    name: String,
    sprites: Vec<Sprite>,
    data: NamedScopeStore,
}

/// One stage of a project: an ordered sprite list (the first sprite is the
/// background) and the scope store those sprites resolve against. All
/// mutation goes through the scene lock.
#[derive(Debug)]
pub struct Scene {
    original_width: u32,
    original_height: u32,
    state: Mutex<SceneState>,
    physics_world: Mutex<Option<Arc<PhysicsWorld>>>,
}

impl Scene {
    /// New scene holding only an empty background sprite.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        let scene = Self::from_parts(name, width, height, Vec::new(), NamedScopeStore::new());
        scene.add_sprite(Sprite::new(BACKGROUND_SPRITE_NAME));
        scene
    }

    pub fn from_parts(
        name: impl Into<String>,
        width: u32,
        height: u32,
        sprites: Vec<Sprite>,
        data: NamedScopeStore,
    ) -> Self {
        Self {
            original_width: width,
            original_height: height,
            state: Mutex::new(SceneState {
                name: name.into(),
                sprites,
                data,
            }),
            physics_world: Mutex::new(None),
        }
    }

    pub fn name(&self) -> String {
        self.state.lock().name.clone()
    }

    pub fn original_width(&self) -> u32 {
        self.original_width
    }

    pub fn original_height(&self) -> u32 {
        self.original_height
    }

    /// Appends `sprite` unless a sprite with the same identity is present.
    pub fn add_sprite(&self, sprite: Sprite) -> bool {
        let mut state = self.state.lock();
        if state.sprites.iter().any(|existing| existing.id() == sprite.id()) {
            return false;
        }
        state.sprites.push(sprite);
        true
    }

    pub fn remove_sprite(&self, sprite: SpriteId) -> bool {
        let mut state = self.state.lock();
        let Some(index) = state.sprites.iter().position(|existing| existing.id() == sprite) else {
            return false;
        };
        state.sprites.remove(index);
        true
    }

    pub fn set_sprites(&self, sprites: Vec<Sprite>) {
        self.state.lock().sprites = sprites;
    }

    pub fn sprites(&self) -> Vec<Sprite> {
        self.state.lock().sprites.clone()
    }

    pub fn sprite_count(&self) -> usize {
        self.state.lock().sprites.len()
    }

    pub fn sprite(&self, id: SpriteId) -> Option<Sprite> {
        self.with_sprites(|sprites| sprites.iter().find(|sprite| sprite.id() == id).cloned())
    }

    pub fn sprite_by_name(&self, name: &str) -> Option<Sprite> {
        self.with_sprites(|sprites| sprites.iter().find(|sprite| sprite.name == name).cloned())
    }

    /// Runs `f` under the scene lock; `f` must not call back into the scene.
    pub fn with_sprites<R>(&self, f: impl FnOnce(&[Sprite]) -> R) -> R {
        f(&self.state.lock().sprites)
    }

    pub fn all_bricks(&self) -> Vec<Brick> {
        self.with_sprites(|sprites| {
            sprites
                .iter()
                .flat_map(|sprite| sprite.all_bricks())
                .cloned()
                .collect()
        })
    }

    pub fn data(&self) -> NamedScopeStore {
        self.state.lock().data.clone()
    }

    /// Runs `f` under the scene lock; `f` must not call back into the scene.
    pub fn with_data<R>(&self, f: impl FnOnce(&NamedScopeStore) -> R) -> R {
        f(&self.state.lock().data)
    }

    pub fn with_data_mut<R>(&self, f: impl FnOnce(&mut NamedScopeStore) -> R) -> R {
        f(&mut self.state.lock().data)
    }

    /// Swaps in a new store and returns the previous one. Cached references
    /// are stale until [`Scene::rehydrate_references`] runs.
    pub fn set_data(&self, data: NamedScopeStore) -> NamedScopeStore {
        std::mem::replace(&mut self.state.lock().data, data)
    }

    pub fn reset_data(&self) -> NamedScopeStore {
        self.set_data(NamedScopeStore::new())
    }

    pub fn promote_referenced_names_to_global_scope(
        &self,
    ) -> Result<PromotionReport, ScopeConflict> {
        let mut state = self.state.lock();
        let SceneState { sprites, data, .. } = &mut *state;
        promote_referenced_names_to_global_scope(sprites, data)
    }

    /// Renames this scene inside `project`. The persisted copy is moved
    /// first; only when that succeeds does the name change and every scene
    /// start/transition brick of the project follow it.
    ///
    /// The new name is visible before other scenes' bricks are rewritten.
    /// Readers that need names and brick targets to agree go through
    /// [`Project::with_renames_settled`].
    pub fn rename(
        &self,
        new_name: &str,
        project: &Project,
        storage: &dyn SceneStorage,
    ) -> Result<(), RenameFailure> {
        if new_name.is_empty() {
            return Err(RenameFailure::EmptyName);
        }
        let _renames = project.lock_renames();

        let old_name = self.name();
        if old_name == new_name {
            return Ok(());
        }
        let is_sibling = |scene: &Arc<Scene>| !std::ptr::eq(scene.as_ref(), self);
        if project
            .scenes()
            .iter()
            .any(|scene| is_sibling(scene) && scene.name() == new_name)
        {
            return Err(RenameFailure::NameTaken {
                project: project.name().to_string(),
                name: new_name.to_string(),
            });
        }

        {
            let mut state = self.state.lock();
            if let Err(source) = storage.rename_persisted_scene(project.name(), &old_name, new_name)
            {
                warn!(old = %old_name, new = new_name, error = %source, "scene rename failed");
                return Err(RenameFailure::Storage {
                    old: old_name,
                    new: new_name.to_string(),
                    source,
                });
            }
            state.name = new_name.to_string();
        }

        let mut rewritten = 0;
        let mut visited_self = false;
        for scene in project.scenes() {
            visited_self |= !is_sibling(scene);
            rewritten +=
                propagate_scene_rename(&mut scene.state.lock().sprites, &old_name, new_name);
        }
        if !visited_self {
            rewritten +=
                propagate_scene_rename(&mut self.state.lock().sprites, &old_name, new_name);
        }

        info!(
            project = project.name(),
            old = %old_name,
            new = new_name,
            rewritten,
            "renamed scene"
        );
        Ok(())
    }

    /// Rebuilds every cached variable, list and sprite reference from the
    /// stored names.
    pub fn rehydrate_references(&self) -> ReferenceReport {
        let mut state = self.state.lock();
        let SceneState { sprites, data, .. } = &mut *state;
        ReferenceReport {
            data: rehydrate_data_references(sprites, data),
            sprites: rehydrate_sprite_references(sprites),
        }
    }

    pub fn teardown_clones(&self, sweep: &dyn GlobalSweep) -> TeardownReport {
        let mut state = self.state.lock();
        let SceneState { sprites, data, .. } = &mut *state;
        teardown_clones(sprites, data, sweep)
    }

    pub fn collect_broadcast_message_names(&self) -> Vec<String> {
        self.with_sprites(collect_broadcast_message_names)
    }

    /// Appends a runtime clone of `original` with its own copy of the
    /// original's local variables and lists.
    pub fn spawn_clone(&self, original: SpriteId) -> Option<SpriteId> {
        let mut state = self.state.lock();
        let mut clone = state
            .sprites
            .iter()
            .find(|sprite| sprite.id() == original)?
            .spawn_clone();
        state.data.copy_local_scope(original, clone.id());
        rehydrate_data_references(std::slice::from_mut(&mut clone), &state.data);
        let id = clone.id();
        state.sprites.push(clone);
        Some(id)
    }

    pub fn project_variable_with_name(&self, name: &str) -> Option<UserVariable> {
        self.with_data(|data| {
            data.project_variables()
                .iter()
                .find(|variable| variable.name() == name)
                .cloned()
        })
    }

    pub fn project_list_with_name(&self, name: &str) -> Option<UserList> {
        self.with_data(|data| {
            data.project_lists()
                .iter()
                .find(|list| list.name() == name)
                .cloned()
        })
    }

    pub fn exist_project_variable(&self, id: EntityId) -> bool {
        self.owner_of(DataTier::Variable, id) == Some(ScopeOwner::Global)
    }

    pub fn exist_project_list(&self, id: EntityId) -> bool {
        self.owner_of(DataTier::List, id) == Some(ScopeOwner::Global)
    }

    pub fn exist_sprite_variable(&self, id: EntityId, sprite: SpriteId) -> bool {
        self.sprite_by_user_variable(id) == Some(sprite)
    }

    pub fn exist_sprite_list(&self, id: EntityId, sprite: SpriteId) -> bool {
        self.sprite_by_user_list(id) == Some(sprite)
    }

    /// Sprite of this scene whose local scope owns the variable.
    pub fn sprite_by_user_variable(&self, id: EntityId) -> Option<SpriteId> {
        self.local_owner_in_scene(DataTier::Variable, id)
    }

    pub fn sprite_by_user_list(&self, id: EntityId) -> Option<SpriteId> {
        self.local_owner_in_scene(DataTier::List, id)
    }

    fn owner_of(&self, tier: DataTier, id: EntityId) -> Option<ScopeOwner> {
        self.with_data(|data| data.owner_of(tier, id))
    }

    fn local_owner_in_scene(&self, tier: DataTier, id: EntityId) -> Option<SpriteId> {
        let state = self.state.lock();
        match state.data.owner_of(tier, id)? {
            ScopeOwner::Sprite(sprite) if state.sprites.iter().any(|s| s.id() == sprite) => {
                Some(sprite)
            }
            _ => None,
        }
    }

    /// Physics world sized to this scene, created on first access.
    pub fn physics_world(&self) -> Arc<PhysicsWorld> {
        let mut world = self.physics_world.lock();
        world
            .get_or_insert_with(|| {
                Arc::new(PhysicsWorld::new(self.original_width, self.original_height))
            })
            .clone()
    }

    pub fn reset_physics_world(&self) -> Arc<PhysicsWorld> {
        let world = Arc::new(PhysicsWorld::new(self.original_width, self.original_height));
        *self.physics_world.lock() = Some(world.clone());
        world
    }
}
