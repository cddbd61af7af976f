use serde::{Deserialize, Serialize};

use crate::brick::Brick;
use crate::ids::SpriteId;
use crate::script::{Script, UserBrick};

/// An actor of a scene. Identity is the [`SpriteId`], not the name: clones
/// carry their original's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprite {
    #[serde(skip, default = "SpriteId::fresh")]
    id: SpriteId,
    pub name: String,
    #[serde(default)]
    pub scripts: Vec<Script>,
    #[serde(default)]
    pub user_bricks: Vec<UserBrick>,
    #[serde(skip)]
    is_clone: bool,
}

impl Sprite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SpriteId::fresh(),
            name: name.into(),
            scripts: Vec::new(),
            user_bricks: Vec::new(),
            is_clone: false,
        }
    }

    pub fn with_scripts(name: impl Into<String>, scripts: Vec<Script>) -> Self {
        let mut sprite = Self::new(name);
        sprite.scripts = scripts;
        sprite
    }

    pub fn id(&self) -> SpriteId {
        self.id
    }

    pub fn is_clone(&self) -> bool {
        self.is_clone
    }

    /// Runtime copy under a new identity, flagged as a clone.
    pub fn spawn_clone(&self) -> Self {
        Self {
            id: SpriteId::fresh(),
            name: self.name.clone(),
            scripts: self.scripts.clone(),
            user_bricks: self.user_bricks.clone(),
            is_clone: true,
        }
    }

    pub fn number_of_scripts(&self) -> usize {
        self.scripts.len()
    }

    pub fn add_script(&mut self, script: Script) {
        self.scripts.push(script);
    }

    pub fn add_user_brick(&mut self, user_brick: UserBrick) {
        self.user_bricks.push(user_brick);
    }

    /// Bricks of every script followed by the bricks of every user brick
    /// definition.
    pub fn all_bricks(&self) -> impl Iterator<Item = &Brick> {
        self.scripts
            .iter()
            .flat_map(|script| script.bricks.iter())
            .chain(
                self.user_bricks
                    .iter()
                    .flat_map(|user_brick| user_brick.definition.bricks.iter()),
            )
    }

    pub fn all_bricks_mut(&mut self) -> impl Iterator<Item = &mut Brick> {
        self.scripts
            .iter_mut()
            .flat_map(|script| script.bricks.iter_mut())
            .chain(
                self.user_bricks
                    .iter_mut()
                    .flat_map(|user_brick| user_brick.definition.bricks.iter_mut()),
            )
    }
}
