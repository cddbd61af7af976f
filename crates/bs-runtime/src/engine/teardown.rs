use bs_core::{DataTier, Sprite, SpriteId};
use tracing::{debug, info};

use crate::engine::promote::collect_referenced_names;
use crate::store::NamedScopeStore;

/// Project-level cleanup of global entities, run while clones are torn
/// down. Decides which globals are no longer wanted; the engine only
/// triggers it.
pub trait GlobalSweep {
    /// Returns the number of global entities removed.
    fn sweep(
        &self,
        store: &mut NamedScopeStore,
        removed: &[Sprite],
        survivors: &[&Sprite],
    ) -> usize;
}

/// Removes globals that were referenced by a removed clone and are not
/// referenced by any surviving non-clone sprite.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferencedNameSweep;

impl GlobalSweep for ReferencedNameSweep {
    fn sweep(
        &self,
        store: &mut NamedScopeStore,
        removed: &[Sprite],
        survivors: &[&Sprite],
    ) -> usize {
        let candidates = collect_referenced_names(removed);
        let still_referenced = collect_referenced_names(
            survivors.iter().copied().filter(|sprite| !sprite.is_clone()),
        );

        let mut count = 0;
        for tier in [DataTier::Variable, DataTier::List] {
            for name in candidates.names(tier) {
                if store.remove_global_if_unreferenced(tier, name, &still_referenced) {
                    debug!(%tier, name = %name, "removed global no longer referenced");
                    count += 1;
                }
            }
        }
        count
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeepGlobals;

impl GlobalSweep for KeepGlobals {
    fn sweep(
        &self,
        _store: &mut NamedScopeStore,
        _removed: &[Sprite],
        _survivors: &[&Sprite],
    ) -> usize {
        0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub removed_sprites: Vec<SpriteId>,
    pub removed_variables: usize,
    pub removed_lists: usize,
    pub removed_globals: usize,
}

/// Removes every clone from `sprites` together with its local scope. The
/// clone set is fixed before anything is removed.
pub fn teardown_clones(
    sprites: &mut Vec<Sprite>,
    store: &mut NamedScopeStore,
    sweep: &dyn GlobalSweep,
) -> TeardownReport {
    let clones = sprites
        .iter()
        .filter(|sprite| sprite.is_clone())
        .cloned()
        .collect::<Vec<_>>();
    let mut report = TeardownReport::default();
    if clones.is_empty() {
        return report;
    }

    for clone in &clones {
        report.removed_variables += store.remove_all_local(DataTier::Variable, clone.id());
        report.removed_lists += store.remove_all_local(DataTier::List, clone.id());
    }

    let survivors = sprites
        .iter()
        .filter(|sprite| !sprite.is_clone())
        .collect::<Vec<_>>();
    report.removed_globals = sweep.sweep(store, &clones, &survivors);

    report.removed_sprites = clones.iter().map(Sprite::id).collect();
    sprites.retain(|sprite| !report.removed_sprites.contains(&sprite.id()));

    info!(
        clones = report.removed_sprites.len(),
        variables = report.removed_variables,
        lists = report.removed_lists,
        globals = report.removed_globals,
        "tore down clones"
    );
    report
}

#[cfg(test)]
mod teardown_tests {
    use super::*;
    use crate::engine::engine_test_support::*;

    #[test]
    fn removes_clones_and_their_local_scope_only() {
        let cat = sprite("Cat", vec![set_variable("a", "0")]);
        let clone = cat.spawn_clone();
        let mut store = NamedScopeStore::new();
        store.insert_local(DataTier::Variable, clone.id(), "a").expect("a");
        store.insert_local(DataTier::Variable, clone.id(), "b").expect("b");
        store.insert_local(DataTier::List, clone.id(), "c").expect("c");
        let sibling_a = store
            .insert_local(DataTier::Variable, cat.id(), "a")
            .expect("sibling a");
        store.insert_global(DataTier::Variable, "g").expect("g");
        let mut sprites = vec![cat.clone(), clone.clone()];

        let report = teardown_clones(&mut sprites, &mut store, &ReferencedNameSweep);
        assert_eq!(report.removed_sprites, vec![clone.id()]);
        assert_eq!(report.removed_variables, 2);
        assert_eq!(report.removed_lists, 1);
        assert_eq!(report.removed_globals, 0);
        assert_eq!(sprites.len(), 1);
        assert_eq!(sprites[0].id(), cat.id());
        assert!(store.sprite_variables(clone.id()).is_empty());
        assert!(store.sprite_lists(clone.id()).is_empty());
        assert_eq!(
            store.lookup(DataTier::Variable, bs_core::ScopeOwner::Sprite(cat.id()), "a"),
            Some(sibling_a)
        );
        assert!(store.exists_global(DataTier::Variable, "g"));
    }

    #[test]
    fn adjacent_clones_are_all_removed() {
        let cat = sprite("Cat", Vec::new());
        let mut sprites = vec![
            cat.clone(),
            cat.spawn_clone(),
            cat.spawn_clone(),
            sprite("Dog", Vec::new()),
            cat.spawn_clone(),
        ];
        let mut store = NamedScopeStore::new();

        let report = teardown_clones(&mut sprites, &mut store, &KeepGlobals);
        assert_eq!(report.removed_sprites.len(), 3);
        let names = sprites
            .iter()
            .map(|sprite| sprite.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Cat", "Dog"]);
    }

    #[test]
    fn sweep_drops_globals_only_clones_referenced() {
        let cat = sprite("Cat", vec![set_variable("shared", "0")]);
        let mut orphaned = cat.spawn_clone();
        orphaned.add_script(bs_core::Script::with_bricks(
            bs_core::ScriptTrigger::WhenCloneStarts,
            vec![add_item("trail", "1")],
        ));
        let mut store = NamedScopeStore::new();
        store.insert_global(DataTier::Variable, "shared").expect("shared");
        store.insert_global(DataTier::List, "trail").expect("trail");
        store.insert_global(DataTier::List, "unused").expect("unused");
        let mut sprites = vec![cat, orphaned];

        let report = teardown_clones(&mut sprites, &mut store, &ReferencedNameSweep);
        assert_eq!(report.removed_globals, 1);
        assert!(store.exists_global(DataTier::Variable, "shared"));
        assert!(!store.exists_global(DataTier::List, "trail"));
        assert!(store.exists_global(DataTier::List, "unused"));
    }

    #[test]
    fn no_clones_is_a_no_op() {
        let mut sprites = vec![sprite("Cat", Vec::new())];
        let mut store = NamedScopeStore::new();
        store.insert_global(DataTier::List, "trail").expect("trail");
        let before = store.clone();

        let report = teardown_clones(&mut sprites, &mut store, &ReferencedNameSweep);
        assert_eq!(report, TeardownReport::default());
        assert_eq!(store, before);
        assert_eq!(sprites.len(), 1);
    }
}
