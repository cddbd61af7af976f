use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Default for DataValue {
    fn default() -> Self {
        Self::Number(0.0)
    }
}

/// Common surface of the two data tiers, used by the scope store to keep one
/// implementation for variables and lists.
pub trait NamedEntity: Clone {
    fn create(name: &str) -> Self;
    fn id(&self) -> EntityId;
    fn name(&self) -> &str;

    /// Copy carrying the same name and contents under a new identity.
    fn duplicate(&self) -> Self;
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserVariable {
    id: EntityId,
    name: String,
    pub value: DataValue,
}

impl UserVariable {
    pub fn with_value(name: &str, value: DataValue) -> Self {
        Self {
            id: EntityId::fresh(),
            name: name.to_string(),
            value,
        }
    }
}

impl NamedEntity for UserVariable {
    fn create(name: &str) -> Self {
        Self::with_value(name, DataValue::default())
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn duplicate(&self) -> Self {
        Self::with_value(&self.name, self.value.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserList {
    id: EntityId,
    name: String,
    pub items: Vec<DataValue>,
}

impl UserList {
    pub fn with_items(name: &str, items: Vec<DataValue>) -> Self {
        Self {
            id: EntityId::fresh(),
            name: name.to_string(),
            items,
        }
    }
}

impl NamedEntity for UserList {
    fn create(name: &str) -> Self {
        Self::with_items(name, Vec::new())
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn duplicate(&self) -> Self {
        Self::with_items(&self.name, self.items.clone())
    }
}
