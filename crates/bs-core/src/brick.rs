use serde::{Deserialize, Serialize};

use crate::formula::Formula;
use crate::ids::{EntityId, SpriteId};

/// Reference from a brick to a variable or list. The name is what gets
/// persisted; the cached id is only valid until the next structural reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRef {
    pub name: String,
    #[serde(skip)]
    cached: Option<EntityId>,
}

impl DataRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cached: None,
        }
    }

    pub fn resolved(name: impl Into<String>, id: EntityId) -> Self {
        Self {
            name: name.into(),
            cached: Some(id),
        }
    }

    pub fn cached(&self) -> Option<EntityId> {
        self.cached
    }

    pub fn set_cached(&mut self, id: Option<EntityId>) {
        self.cached = id;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteRef {
    pub name: String,
    #[serde(skip)]
    cached: Option<SpriteId>,
}

impl SpriteRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cached: None,
        }
    }

    pub fn resolved(name: impl Into<String>, id: SpriteId) -> Self {
        Self {
            name: name.into(),
            cached: Some(id),
        }
    }

    pub fn cached(&self) -> Option<SpriteId> {
        self.cached
    }

    pub fn set_cached(&mut self, id: Option<SpriteId>) {
        self.cached = id;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneRefKind {
    Start,
    Transition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Brick {
    SetVariable {
        variable: DataRef,
        value: Formula,
    },
    ChangeVariableBy {
        variable: DataRef,
        delta: Formula,
    },
    ShowVariable {
        variable: DataRef,
        x: Formula,
        y: Formula,
    },
    HideVariable {
        variable: DataRef,
    },
    AddItemToList {
        list: DataRef,
        item: Formula,
    },
    DeleteItemOfList {
        list: DataRef,
        index: Formula,
    },
    InsertItemIntoList {
        list: DataRef,
        index: Formula,
        item: Formula,
    },
    ReplaceItemInList {
        list: DataRef,
        index: Formula,
        item: Formula,
    },
    SceneStart {
        scene: String,
    },
    SceneTransition {
        scene: String,
    },
    Broadcast {
        message: String,
    },
    BroadcastWait {
        message: String,
    },
    PointTo {
        #[serde(default)]
        sprite: Option<SpriteRef>,
    },
    /// `None` clones the sprite running the script.
    CloneSprite {
        #[serde(default)]
        sprite: Option<SpriteRef>,
    },
    SetX {
        x: Formula,
    },
    SetY {
        y: Formula,
    },
    Wait {
        seconds: Formula,
    },
    Repeat {
        times: Formula,
    },
    IfLogicBegin {
        condition: Formula,
    },
    IfLogicElse,
    IfLogicEnd,
    LoopEnd,
    Forever,
    Show,
    Hide,
    DeleteThisClone,
}

impl Brick {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::SetVariable { .. } => "setVariable",
            Self::ChangeVariableBy { .. } => "changeVariableBy",
            Self::ShowVariable { .. } => "showVariable",
            Self::HideVariable { .. } => "hideVariable",
            Self::AddItemToList { .. } => "addItemToList",
            Self::DeleteItemOfList { .. } => "deleteItemOfList",
            Self::InsertItemIntoList { .. } => "insertItemIntoList",
            Self::ReplaceItemInList { .. } => "replaceItemInList",
            Self::SceneStart { .. } => "sceneStart",
            Self::SceneTransition { .. } => "sceneTransition",
            Self::Broadcast { .. } => "broadcast",
            Self::BroadcastWait { .. } => "broadcastWait",
            Self::PointTo { .. } => "pointTo",
            Self::CloneSprite { .. } => "cloneSprite",
            Self::SetX { .. } => "setX",
            Self::SetY { .. } => "setY",
            Self::Wait { .. } => "wait",
            Self::Repeat { .. } => "repeat",
            Self::IfLogicBegin { .. } => "ifLogicBegin",
            Self::IfLogicElse => "ifLogicElse",
            Self::IfLogicEnd => "ifLogicEnd",
            Self::LoopEnd => "loopEnd",
            Self::Forever => "forever",
            Self::Show => "show",
            Self::Hide => "hide",
            Self::DeleteThisClone => "deleteThisClone",
        }
    }

    pub fn variable_ref(&self) -> Option<&DataRef> {
        match self {
            Self::SetVariable { variable, .. }
            | Self::ChangeVariableBy { variable, .. }
            | Self::ShowVariable { variable, .. }
            | Self::HideVariable { variable } => Some(variable),
            _ => None,
        }
    }

    pub fn variable_ref_mut(&mut self) -> Option<&mut DataRef> {
        match self {
            Self::SetVariable { variable, .. }
            | Self::ChangeVariableBy { variable, .. }
            | Self::ShowVariable { variable, .. }
            | Self::HideVariable { variable } => Some(variable),
            _ => None,
        }
    }

    pub fn list_ref(&self) -> Option<&DataRef> {
        match self {
            Self::AddItemToList { list, .. }
            | Self::DeleteItemOfList { list, .. }
            | Self::InsertItemIntoList { list, .. }
            | Self::ReplaceItemInList { list, .. } => Some(list),
            _ => None,
        }
    }

    pub fn list_ref_mut(&mut self) -> Option<&mut DataRef> {
        match self {
            Self::AddItemToList { list, .. }
            | Self::DeleteItemOfList { list, .. }
            | Self::InsertItemIntoList { list, .. }
            | Self::ReplaceItemInList { list, .. } => Some(list),
            _ => None,
        }
    }

    /// The sprite target, when the brick has one configured.
    pub fn sprite_ref(&self) -> Option<&SpriteRef> {
        match self {
            Self::PointTo { sprite } | Self::CloneSprite { sprite } => sprite.as_ref(),
            _ => None,
        }
    }

    pub fn sprite_ref_mut(&mut self) -> Option<&mut SpriteRef> {
        match self {
            Self::PointTo { sprite } | Self::CloneSprite { sprite } => sprite.as_mut(),
            _ => None,
        }
    }

    pub fn scene_ref(&self) -> Option<(SceneRefKind, &str)> {
        match self {
            Self::SceneStart { scene } => Some((SceneRefKind::Start, scene.as_str())),
            Self::SceneTransition { scene } => Some((SceneRefKind::Transition, scene.as_str())),
            _ => None,
        }
    }

    pub fn scene_ref_mut(&mut self) -> Option<(SceneRefKind, &mut String)> {
        match self {
            Self::SceneStart { scene } => Some((SceneRefKind::Start, scene)),
            Self::SceneTransition { scene } => Some((SceneRefKind::Transition, scene)),
            _ => None,
        }
    }

    pub fn formulas(&self) -> Vec<&Formula> {
        match self {
            Self::SetVariable { value, .. } => vec![value],
            Self::ChangeVariableBy { delta, .. } => vec![delta],
            Self::ShowVariable { x, y, .. } => vec![x, y],
            Self::AddItemToList { item, .. } => vec![item],
            Self::DeleteItemOfList { index, .. } => vec![index],
            Self::InsertItemIntoList { index, item, .. }
            | Self::ReplaceItemInList { index, item, .. } => vec![index, item],
            Self::SetX { x } => vec![x],
            Self::SetY { y } => vec![y],
            Self::Wait { seconds } => vec![seconds],
            Self::Repeat { times } => vec![times],
            Self::IfLogicBegin { condition } => vec![condition],
            _ => Vec::new(),
        }
    }

    pub fn broadcast_message(&self) -> Option<&str> {
        match self {
            Self::Broadcast { message } | Self::BroadcastWait { message } => Some(message.as_str()),
            _ => None,
        }
    }
}
