use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// The nutrient keys every catalog starts with. These cannot be deleted.
const BUILTINS: [(&str, &str); 6] = [
    ("protein", "Protein"),
    ("fat", "Fat"),
    ("fiber", "Fiber"),
    ("calcium", "Calcium"),
    ("umami", "Umami"),
    ("amino", "Amino acids"),
];

/// A single nutrient column of the feed profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutrientDef {
    pub key: String,
    pub label: String,
    pub builtin: bool,
    pub visible: bool,
}

/// The open, ordered set of nutrient keys that feed profiles carry.
///
/// Keys are not fixed at compile time: custom nutrients can be added and
/// removed at runtime. Aggregations iterate over `visible_keys()` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutrientCatalog {
    nutrients: Vec<NutrientDef>,
}

/// Derives the catalog key for a display name: lowercased, with each run of
/// whitespace replaced by a single underscore.
pub fn nutrient_key(name: &str) -> String {
    name.trim()
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

impl NutrientCatalog {
    /// A catalog holding only the built-in nutrients, all visible.
    pub fn with_builtins() -> Self {
        let nutrients = BUILTINS
            .iter()
            .map(|(key, label)| NutrientDef {
                key: key.to_string(),
                label: label.to_string(),
                builtin: true,
                visible: true,
            })
            .collect();
        Self { nutrients }
    }

    pub fn iter(&self) -> impl Iterator<Item = &NutrientDef> {
        self.nutrients.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nutrients.iter().map(|n| n.key.as_str())
    }

    pub fn visible_keys(&self) -> impl Iterator<Item = &str> {
        self.nutrients
            .iter()
            .filter(|n| n.visible)
            .map(|n| n.key.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&NutrientDef> {
        self.nutrients.iter().find(|n| n.key == key)
    }

    /// The display label for `key`, falling back to the key itself.
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).map(|n| n.label.as_str()).unwrap_or(key)
    }

    /// Registers a custom nutrient and returns its derived key.
    pub fn add_custom(&mut self, name: &str) -> Result<String, CoreError> {
        let key = nutrient_key(name);
        if key.is_empty() {
            return Err(CoreError::InvalidInput(
                "nutrient name".to_string(),
                "must not be empty".to_string(),
            ));
        }
        if self.contains(&key) {
            return Err(CoreError::NutrientExists(key));
        }
        self.nutrients.push(NutrientDef {
            key: key.clone(),
            label: name.trim().to_string(),
            builtin: false,
            visible: true,
        });
        Ok(key)
    }

    /// Removes a custom nutrient. Built-in nutrients are refused.
    pub fn remove(&mut self, key: &str) -> Result<NutrientDef, CoreError> {
        let index = self
            .nutrients
            .iter()
            .position(|n| n.key == key)
            .ok_or_else(|| CoreError::NutrientNotFound(key.to_string()))?;
        if self.nutrients[index].builtin {
            return Err(CoreError::BuiltinNutrient(key.to_string()));
        }
        Ok(self.nutrients.remove(index))
    }

    /// Flips the visibility of `key` and returns the new state.
    pub fn toggle_visibility(&mut self, key: &str) -> Result<bool, CoreError> {
        let nutrient = self
            .nutrients
            .iter_mut()
            .find(|n| n.key == key)
            .ok_or_else(|| CoreError::NutrientNotFound(key.to_string()))?;
        nutrient.visible = !nutrient.visible;
        Ok(nutrient.visible)
    }
}

impl Default for NutrientCatalog {
    fn default() -> Self {
        Self::with_builtins()
    }
}
