use std::collections::HashMap;

use bs_core::{DataTier, Sprite, SpriteId};
use tracing::debug;

use crate::store::NamedScopeStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RehydrationReport {
    pub resolved: usize,
    pub dangling: usize,
}

impl RehydrationReport {
    fn record(&mut self, found: bool) {
        if found {
            self.resolved += 1;
        } else {
            self.dangling += 1;
        }
    }
}

/// Re-resolves the cached identity of every variable and list reference from
/// its stored name, as seen from the owning sprite. Names that resolve to
/// nothing leave the reference dangling.
pub fn rehydrate_data_references(
    sprites: &mut [Sprite],
    store: &NamedScopeStore,
) -> RehydrationReport {
    let mut report = RehydrationReport::default();
    for sprite in sprites.iter_mut() {
        let owner = sprite.id();
        for brick in sprite.all_bricks_mut() {
            if let Some(variable) = brick.variable_ref_mut() {
                let id = store.resolve(DataTier::Variable, owner, &variable.name);
                variable.set_cached(id);
                report.record(id.is_some());
            }
            if let Some(list) = brick.list_ref_mut() {
                let id = store.resolve(DataTier::List, owner, &list.name);
                list.set_cached(id);
                report.record(id.is_some());
            }
        }
    }
    debug!(
        resolved = report.resolved,
        dangling = report.dangling,
        "rehydrated data references"
    );
    report
}

/// Re-resolves every configured sprite target by name against the first
/// sprite carrying that name.
pub fn rehydrate_sprite_references(sprites: &mut [Sprite]) -> RehydrationReport {
    let mut by_name: HashMap<String, SpriteId> = HashMap::new();
    for sprite in sprites.iter() {
        by_name.entry(sprite.name.clone()).or_insert(sprite.id());
    }

    let mut report = RehydrationReport::default();
    for sprite in sprites.iter_mut() {
        for brick in sprite.all_bricks_mut() {
            if let Some(target) = brick.sprite_ref_mut() {
                let id = by_name.get(&target.name).copied();
                target.set_cached(id);
                report.record(id.is_some());
            }
        }
    }
    debug!(
        resolved = report.resolved,
        dangling = report.dangling,
        "rehydrated sprite references"
    );
    report
}
