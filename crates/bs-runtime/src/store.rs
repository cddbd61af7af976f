use std::collections::BTreeMap;

use bs_core::{
    DataTier, EntityId, NamedEntity, ScopeConflict, ScopeOwner, SpriteId, UserList, UserVariable,
};

use crate::engine::ReferencedNames;

#[derive(Debug, Clone, PartialEq)]
struct ScopedEntities<T> {
    global: Vec<T>,
    local: BTreeMap<SpriteId, Vec<T>>,
}

impl<T> Default for ScopedEntities<T> {
    fn default() -> Self {
        Self {
            global: Vec::new(),
            local: BTreeMap::new(),
        }
    }
}

impl<T: NamedEntity> ScopedEntities<T> {
    fn scope(&self, owner: ScopeOwner) -> &[T] {
        match owner {
            ScopeOwner::Global => &self.global,
            ScopeOwner::Sprite(sprite) => self.local.get(&sprite).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    fn lookup(&self, owner: ScopeOwner, name: &str) -> Option<&T> {
        self.scope(owner).iter().find(|entity| entity.name() == name)
    }

    fn local_owners(&self, name: &str, sprites: &[SpriteId]) -> Vec<SpriteId> {
        let mut owners = Vec::new();
        for sprite in sprites {
            if owners.contains(sprite) {
                continue;
            }
            if self.lookup(ScopeOwner::Sprite(*sprite), name).is_some() {
                owners.push(*sprite);
            }
        }
        owners
    }

    fn insert(
        &mut self,
        tier: DataTier,
        owner: ScopeOwner,
        entity: T,
    ) -> Result<EntityId, ScopeConflict> {
        if self.lookup(owner, entity.name()).is_some() {
            return Err(ScopeConflict::DuplicateName {
                tier,
                scope: owner,
                name: entity.name().to_string(),
            });
        }
        let id = entity.id();
        match owner {
            ScopeOwner::Global => self.global.push(entity),
            ScopeOwner::Sprite(sprite) => self.local.entry(sprite).or_default().push(entity),
        }
        Ok(id)
    }

    fn remove(&mut self, owner: ScopeOwner, name: &str) -> Option<T> {
        let position = |entities: &[T]| entities.iter().position(|entity| entity.name() == name);
        match owner {
            ScopeOwner::Global => {
                let index = position(self.global.as_slice())?;
                Some(self.global.remove(index))
            }
            ScopeOwner::Sprite(sprite) => {
                let entities = self.local.get_mut(&sprite)?;
                let index = position(entities.as_slice())?;
                let removed = entities.remove(index);
                if entities.is_empty() {
                    self.local.remove(&sprite);
                }
                Some(removed)
            }
        }
    }

    fn get(&self, id: EntityId) -> Option<&T> {
        self.global
            .iter()
            .chain(self.local.values().flatten())
            .find(|entity| entity.id() == id)
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.global
            .iter_mut()
            .chain(self.local.values_mut().flatten())
            .find(|entity| entity.id() == id)
    }

    fn owner_of(&self, id: EntityId) -> Option<ScopeOwner> {
        if self.global.iter().any(|entity| entity.id() == id) {
            return Some(ScopeOwner::Global);
        }
        self.local
            .iter()
            .find(|(_, entities)| entities.iter().any(|entity| entity.id() == id))
            .map(|(sprite, _)| ScopeOwner::Sprite(*sprite))
    }

    fn copy_local(&mut self, from: SpriteId, to: SpriteId) -> usize {
        let copies = self
            .local
            .get(&from)
            .map(|entities| entities.iter().map(T::duplicate).collect::<Vec<_>>())
            .unwrap_or_default();
        let count = copies.len();
        if count > 0 {
            self.local.insert(to, copies);
        }
        count
    }
}

/// Named-scope store of one scene: a global scope plus one local scope per
/// sprite, independently for variables and lists. Names are unique within
/// each scope of each tier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedScopeStore {
    variables: ScopedEntities<UserVariable>,
    lists: ScopedEntities<UserList>,
}

impl NamedScopeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists_global(&self, tier: DataTier, name: &str) -> bool {
        self.lookup(tier, ScopeOwner::Global, name).is_some()
    }

    pub fn exists_local(&self, tier: DataTier, sprite: SpriteId, name: &str) -> bool {
        self.lookup(tier, ScopeOwner::Sprite(sprite), name).is_some()
    }

    pub fn exists_local_under_any_sprite(
        &self,
        tier: DataTier,
        name: &str,
        sprites: &[SpriteId],
    ) -> bool {
        !self.local_owners(tier, name, sprites).is_empty()
    }

    /// Sprites among `sprites` whose local scope holds `name`, each listed once.
    pub fn local_owners(&self, tier: DataTier, name: &str, sprites: &[SpriteId]) -> Vec<SpriteId> {
        match tier {
            DataTier::Variable => self.variables.local_owners(name, sprites),
            DataTier::List => self.lists.local_owners(name, sprites),
        }
    }

    pub fn insert_global(&mut self, tier: DataTier, name: &str) -> Result<EntityId, ScopeConflict> {
        self.insert(tier, ScopeOwner::Global, name)
    }

    pub fn insert_local(
        &mut self,
        tier: DataTier,
        sprite: SpriteId,
        name: &str,
    ) -> Result<EntityId, ScopeConflict> {
        self.insert(tier, ScopeOwner::Sprite(sprite), name)
    }

    pub fn insert(
        &mut self,
        tier: DataTier,
        owner: ScopeOwner,
        name: &str,
    ) -> Result<EntityId, ScopeConflict> {
        match tier {
            DataTier::Variable => self.add_variable(owner, UserVariable::create(name)),
            DataTier::List => self.add_list(owner, UserList::create(name)),
        }
    }

    pub fn add_variable(
        &mut self,
        owner: ScopeOwner,
        variable: UserVariable,
    ) -> Result<EntityId, ScopeConflict> {
        self.variables.insert(DataTier::Variable, owner, variable)
    }

    pub fn add_list(
        &mut self,
        owner: ScopeOwner,
        list: UserList,
    ) -> Result<EntityId, ScopeConflict> {
        self.lists.insert(DataTier::List, owner, list)
    }

    /// Exact lookup within one scope.
    pub fn lookup(&self, tier: DataTier, owner: ScopeOwner, name: &str) -> Option<EntityId> {
        match tier {
            DataTier::Variable => self.variables.lookup(owner, name).map(|entity| entity.id()),
            DataTier::List => self.lists.lookup(owner, name).map(|entity| entity.id()),
        }
    }

    /// Lookup as seen from a sprite: its local scope shadows the global one.
    pub fn resolve(&self, tier: DataTier, sprite: SpriteId, name: &str) -> Option<EntityId> {
        self.lookup(tier, ScopeOwner::Sprite(sprite), name)
            .or_else(|| self.lookup(tier, ScopeOwner::Global, name))
    }

    /// Drops the whole local scope of `sprite` for one tier and returns how
    /// many entities it held.
    pub fn remove_all_local(&mut self, tier: DataTier, sprite: SpriteId) -> usize {
        let removed = match tier {
            DataTier::Variable => self.variables.local.remove(&sprite).map(|v| v.len()),
            DataTier::List => self.lists.local.remove(&sprite).map(|v| v.len()),
        };
        removed.unwrap_or(0)
    }

    pub fn remove_global(&mut self, tier: DataTier, name: &str) -> bool {
        self.remove(tier, ScopeOwner::Global, name)
    }

    /// Removes the global entity unless `referenced` still mentions its name.
    pub fn remove_global_if_unreferenced(
        &mut self,
        tier: DataTier,
        name: &str,
        referenced: &ReferencedNames,
    ) -> bool {
        !referenced.contains(tier, name) && self.remove_global(tier, name)
    }

    pub fn remove_local(&mut self, tier: DataTier, sprite: SpriteId, name: &str) -> bool {
        self.remove(tier, ScopeOwner::Sprite(sprite), name)
    }

    fn remove(&mut self, tier: DataTier, owner: ScopeOwner, name: &str) -> bool {
        match tier {
            DataTier::Variable => self.variables.remove(owner, name).is_some(),
            DataTier::List => self.lists.remove(owner, name).is_some(),
        }
    }

    pub fn owner_of(&self, tier: DataTier, id: EntityId) -> Option<ScopeOwner> {
        match tier {
            DataTier::Variable => self.variables.owner_of(id),
            DataTier::List => self.lists.owner_of(id),
        }
    }

    pub fn variable(&self, id: EntityId) -> Option<&UserVariable> {
        self.variables.get(id)
    }

    pub fn variable_mut(&mut self, id: EntityId) -> Option<&mut UserVariable> {
        self.variables.get_mut(id)
    }

    pub fn list(&self, id: EntityId) -> Option<&UserList> {
        self.lists.get(id)
    }

    pub fn list_mut(&mut self, id: EntityId) -> Option<&mut UserList> {
        self.lists.get_mut(id)
    }

    pub fn project_variables(&self) -> &[UserVariable] {
        &self.variables.global
    }

    pub fn project_lists(&self) -> &[UserList] {
        &self.lists.global
    }

    pub fn sprite_variables(&self, sprite: SpriteId) -> &[UserVariable] {
        self.variables.scope(ScopeOwner::Sprite(sprite))
    }

    pub fn sprite_lists(&self, sprite: SpriteId) -> &[UserList] {
        self.lists.scope(ScopeOwner::Sprite(sprite))
    }

    /// Sprites that own at least one local variable or list.
    pub fn local_scope_owners(&self) -> Vec<SpriteId> {
        let mut owners = self.variables.local.keys().copied().collect::<Vec<_>>();
        for sprite in self.lists.local.keys() {
            if !owners.contains(sprite) {
                owners.push(*sprite);
            }
        }
        owners
    }

    /// Gives `to` a copy of every local variable and list of `from`, under
    /// new identities. Returns the number of entities copied.
    pub fn copy_local_scope(&mut self, from: SpriteId, to: SpriteId) -> usize {
        self.variables.copy_local(from, to) + self.lists.copy_local(from, to)
    }
}
