//! Scope resolution and reference integrity over a scene's sprites and its
//! named-scope store. Every pass takes the sprite list and the store
//! explicitly; locking is the caller's concern.

mod messages;
mod promote;
mod rehydrate;
mod rename;
mod teardown;

pub use messages::collect_broadcast_message_names;
pub use promote::{
    collect_referenced_names, promote_referenced_names_to_global_scope, PromotionReport,
    ReferencedNames,
};
pub use rehydrate::{rehydrate_data_references, rehydrate_sprite_references, RehydrationReport};
pub use rename::propagate_scene_rename;
pub use teardown::{teardown_clones, GlobalSweep, KeepGlobals, ReferencedNameSweep, TeardownReport};

#[cfg(test)]
pub(crate) mod engine_test_support {
    use bs_core::{Brick, DataRef, Formula, Script, ScriptTrigger, Sprite};

    pub(crate) fn set_variable(name: &str, value: &str) -> Brick {
        Brick::SetVariable {
            variable: DataRef::new(name),
            value: Formula::new(value),
        }
    }

    pub(crate) fn add_item(list: &str, item: &str) -> Brick {
        Brick::AddItemToList {
            list: DataRef::new(list),
            item: Formula::new(item),
        }
    }

    pub(crate) fn sprite(name: &str, bricks: Vec<Brick>) -> Sprite {
        Sprite::with_scripts(name, vec![Script::with_bricks(ScriptTrigger::Start, bricks)])
    }
}
