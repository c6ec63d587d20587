//! Wire-shape aggregate shared by both repository adapters and the HTTP
//! layer. A restaurant owns its dish list; the dish back-reference to its
//! restaurant exists only as `dish::Model::restaurant_id` and is never
//! serialized outward.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{dish, errors::ModelError, restaurant};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Absent on creation; assigned by the store.
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub plats: Vec<Plat>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plat {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub price: f64,
    /// Absent means the dish is orderable.
    #[serde(default)]
    pub disponible: Option<bool>,
}

impl Restaurant {
    /// Assemble the aggregate from its rows.
    pub fn from_rows(row: restaurant::Model, dishes: Vec<dish::Model>) -> Self {
        Self {
            id: Some(row.id),
            name: row.name,
            plats: dishes.into_iter().map(Plat::from_row).collect(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::Validation("restaurant name is required".into()));
        }
        let mut seen = HashSet::new();
        for plat in &self.plats {
            plat.validate()?;
            if let Some(id) = plat.id {
                if !seen.insert(id) {
                    return Err(ModelError::Validation(format!("duplicate dish id {id}")));
                }
            }
        }
        Ok(())
    }
}

impl Plat {
    pub fn from_row(row: dish::Model) -> Self {
        Self { id: Some(row.id), name: row.name, price: row.price, disponible: row.disponible }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::Validation("dish name is required".into()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ModelError::Validation("dish price must be a non-negative number".into()));
        }
        Ok(())
    }

    pub fn is_available(&self) -> bool {
        self.disponible.unwrap_or(true)
    }
}
