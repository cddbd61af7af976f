use serde::{Deserialize, Serialize};

pub const PROJECT_SCHEMA_V1: &str = "brickscope-project.v1";
pub const SCENE_SCHEMA_V1: &str = "brickscope-scene.v1";
pub const BACKGROUND_SPRITE_NAME: &str = "Background";
pub const DEFAULT_SCREEN_WIDTH: u32 = 480;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 800;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectHeader {
    pub name: String,
    #[serde(default = "default_screen_width")]
    pub screen_width: u32,
    #[serde(default = "default_screen_height")]
    pub screen_height: u32,
}

impl ProjectHeader {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
        }
    }
}

fn default_screen_width() -> u32 {
    DEFAULT_SCREEN_WIDTH
}

fn default_screen_height() -> u32 {
    DEFAULT_SCREEN_HEIGHT
}

#[cfg(test)]
mod header_tests {
    use super::*;

    #[test]
    fn header_deserialize_applies_screen_defaults() {
        let header: ProjectHeader =
            serde_json::from_str(r#"{"name":"Pong"}"#).expect("header should deserialize");
        assert_eq!(header, ProjectHeader::new("Pong"));
        assert_eq!(header.screen_width, 480);
        assert_eq!(header.screen_height, 800);
    }
}
