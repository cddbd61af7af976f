use std::collections::{BTreeMap, BTreeSet};

use bs_core::{
    BrickScopeError, DataValue, NamedEntity, ProjectHeader, ScopeOwner, Sprite, SpriteId,
    UserList, UserVariable, PROJECT_SCHEMA_V1, SCENE_SCHEMA_V1,
};
use bs_runtime::{NamedScopeStore, Scene};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// `project.json`: header plus the ordered scene names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectManifest {
    pub schema_version: String,
    #[serde(flatten)]
    pub header: ProjectHeader,
    #[serde(default)]
    pub scenes: Vec<String>,
}

impl ProjectManifest {
    pub fn new(header: ProjectHeader, scenes: Vec<String>) -> Self {
        Self {
            schema_version: PROJECT_SCHEMA_V1.to_string(),
            header,
            scenes,
        }
    }

    pub fn validate(&self) -> Result<(), BrickScopeError> {
        check_schema(&self.schema_version, PROJECT_SCHEMA_V1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableEntry {
    pub name: String,
    #[serde(default)]
    pub value: DataValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    pub name: String,
    #[serde(default)]
    pub items: Vec<DataValue>,
}

/// Persisted form of a scene store. Local scopes are keyed by sprite name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataDocument {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub project_variables: Vec<VariableEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub project_lists: Vec<ListEntry>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sprite_variables: BTreeMap<String, Vec<VariableEntry>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sprite_lists: BTreeMap<String, Vec<ListEntry>>,
}

/// `scenes/<scene>/scene.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    pub schema_version: String,
    pub name: String,
    #[serde(default)]
    pub sprites: Vec<Sprite>,
    #[serde(default)]
    pub data: DataDocument,
}

impl SceneDocument {
    pub fn new(name: impl Into<String>, sprites: Vec<Sprite>, data: DataDocument) -> Self {
        Self {
            schema_version: SCENE_SCHEMA_V1.to_string(),
            name: name.into(),
            sprites,
            data,
        }
    }

    /// Snapshot of a scene as it would be persisted. Clones are runtime
    /// only and are left out together with their local scope.
    pub fn from_scene(scene: &Scene) -> Self {
        let name = scene.name();
        let sprites = scene
            .sprites()
            .into_iter()
            .filter(|sprite| !sprite.is_clone())
            .collect::<Vec<_>>();
        let data = scene.with_data(|store| {
            let mut data = DataDocument {
                project_variables: store.project_variables().iter().map(variable_entry).collect(),
                project_lists: store.project_lists().iter().map(list_entry).collect(),
                ..DataDocument::default()
            };
            let mut seen = BTreeSet::new();
            for sprite in &sprites {
                if !seen.insert(sprite.name.as_str()) {
                    if !store.sprite_variables(sprite.id()).is_empty()
                        || !store.sprite_lists(sprite.id()).is_empty()
                    {
                        warn!(
                            scene = %name,
                            sprite = %sprite.name,
                            "locals of a same-named sprite not saved"
                        );
                    }
                    continue;
                }
                let variables = store.sprite_variables(sprite.id());
                if !variables.is_empty() {
                    data.sprite_variables.insert(
                        sprite.name.clone(),
                        variables.iter().map(variable_entry).collect(),
                    );
                }
                let lists = store.sprite_lists(sprite.id());
                if !lists.is_empty() {
                    data.sprite_lists
                        .insert(sprite.name.clone(), lists.iter().map(list_entry).collect());
                }
            }
            data
        });
        Self::new(name, sprites, data)
    }

    pub fn validate(&self) -> Result<(), BrickScopeError> {
        check_schema(&self.schema_version, SCENE_SCHEMA_V1)
    }

    /// Sprites and a freshly built store. Local scopes attach to the first
    /// sprite carrying the recorded name.
    pub fn into_parts(self) -> Result<(String, Vec<Sprite>, NamedScopeStore), BrickScopeError> {
        self.validate()?;
        let mut by_name: BTreeMap<&str, SpriteId> = BTreeMap::new();
        for sprite in &self.sprites {
            by_name.entry(sprite.name.as_str()).or_insert(sprite.id());
        }
        let owner_of = |sprite_name: &str| {
            by_name
                .get(sprite_name)
                .map(|id| ScopeOwner::Sprite(*id))
                .ok_or_else(|| {
                    BrickScopeError::new(
                        "API_SCENE_UNKNOWN_SPRITE",
                        format!(
                            "Scene \"{}\" stores data for missing sprite \"{}\".",
                            self.name, sprite_name
                        ),
                    )
                })
        };

        let mut store = NamedScopeStore::new();
        for entry in &self.data.project_variables {
            store.add_variable(
                ScopeOwner::Global,
                UserVariable::with_value(&entry.name, entry.value.clone()),
            )?;
        }
        for entry in &self.data.project_lists {
            store.add_list(
                ScopeOwner::Global,
                UserList::with_items(&entry.name, entry.items.clone()),
            )?;
        }
        for (sprite_name, entries) in &self.data.sprite_variables {
            let owner = owner_of(sprite_name)?;
            for entry in entries {
                store.add_variable(
                    owner,
                    UserVariable::with_value(&entry.name, entry.value.clone()),
                )?;
            }
        }
        for (sprite_name, entries) in &self.data.sprite_lists {
            let owner = owner_of(sprite_name)?;
            for entry in entries {
                store.add_list(owner, UserList::with_items(&entry.name, entry.items.clone()))?;
            }
        }

        let name = self.name.clone();
        Ok((name, self.sprites, store))
    }
}

fn variable_entry(variable: &UserVariable) -> VariableEntry {
    VariableEntry {
        name: variable.name().to_string(),
        value: variable.value.clone(),
    }
}

fn list_entry(list: &UserList) -> ListEntry {
    ListEntry {
        name: list.name().to_string(),
        items: list.items.clone(),
    }
}

fn check_schema(found: &str, expected: &str) -> Result<(), BrickScopeError> {
    if found == expected {
        return Ok(());
    }
    Err(BrickScopeError::new(
        "API_SCHEMA_UNSUPPORTED",
        format!("Unsupported schemaVersion \"{}\", expected \"{}\".", found, expected),
    ))
}
