//! Product catalog models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single product row from the `SalesLT.Product` table.
///
/// Value object with no identity beyond its fields; built per result row and
/// discarded after serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product display name.
    pub name: String,

    /// Manufacturer product number.
    pub product_number: String,
}

impl Product {
    /// Creates a new product record.
    pub fn new(name: impl Into<String>, product_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            product_number: product_number.into(),
        }
    }
}
