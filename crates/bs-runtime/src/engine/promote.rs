use bs_core::{push_unique, DataTier, ScopeConflict, Sprite, SpriteId};
use tracing::{debug, warn};

use crate::store::NamedScopeStore;

/// Variable and list names mentioned anywhere in a set of sprites, in first
/// discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferencedNames {
    pub variables: Vec<String>,
    pub lists: Vec<String>,
}

impl ReferencedNames {
    pub fn names(&self, tier: DataTier) -> &[String] {
        match tier {
            DataTier::Variable => &self.variables,
            DataTier::List => &self.lists,
        }
    }

    pub fn contains(&self, tier: DataTier, name: &str) -> bool {
        self.names(tier).iter().any(|existing| existing == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromotionReport {
    pub created_variables: Vec<String>,
    pub created_lists: Vec<String>,
}

pub fn collect_referenced_names<'a>(
    sprites: impl IntoIterator<Item = &'a Sprite>,
) -> ReferencedNames {
    let mut names = ReferencedNames::default();
    for sprite in sprites {
        for brick in sprite.all_bricks() {
            if let Some(variable) = brick.variable_ref() {
                push_unique(&mut names.variables, &variable.name);
            }
            if let Some(list) = brick.list_ref() {
                push_unique(&mut names.lists, &list.name);
            }
            for formula in brick.formulas() {
                formula.collect_variable_and_list_names(&mut names.variables, &mut names.lists);
            }
        }
    }
    names
}

/// Makes every referenced variable and list name available in the global
/// scope. Fails without touching the store when any name already lives in
/// the local scope of a sprite; names that are already global are kept.
pub fn promote_referenced_names_to_global_scope(
    sprites: &[Sprite],
    store: &mut NamedScopeStore,
) -> Result<PromotionReport, ScopeConflict> {
    let names = collect_referenced_names(sprites);
    let sprite_ids = sprites.iter().map(Sprite::id).collect::<Vec<SpriteId>>();

    for tier in [DataTier::Variable, DataTier::List] {
        for name in names.names(tier) {
            let owners = store.local_owners(tier, name, &sprite_ids);
            if !owners.is_empty() {
                warn!(%tier, name = %name, owners = owners.len(), "promotion rejected");
                return Err(ScopeConflict::LocalCollision {
                    tier,
                    name: name.clone(),
                    owners,
                });
            }
        }
    }

    let mut report = PromotionReport::default();
    for tier in [DataTier::Variable, DataTier::List] {
        for name in names.names(tier) {
            if store.exists_global(tier, name) {
                continue;
            }
            store.insert_global(tier, name)?;
            match tier {
                DataTier::Variable => report.created_variables.push(name.clone()),
                DataTier::List => report.created_lists.push(name.clone()),
            }
        }
    }

    debug!(
        variables = report.created_variables.len(),
        lists = report.created_lists.len(),
        "promoted referenced names to global scope"
    );
    Ok(report)
}
