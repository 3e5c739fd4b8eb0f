use serde::{Deserialize, Serialize};

use winkel_core::{Amount, ImageId, ProductId};

/// Product status lifecycle.
///
/// Customers only ever see `Available` products; `Draft` and `Unavailable`
/// are reachable through the management permission alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    #[default]
    Draft,
    Available,
    Unavailable,
}

impl core::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ProductStatus::Draft => f.write_str("DRAFT"),
            ProductStatus::Available => f.write_str("AVAILABLE"),
            ProductStatus::Unavailable => f.write_str("UNAVAILABLE"),
        }
    }
}

/// Product photo reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: ImageId,
    pub alt_text: String,
    pub image_url: String,
}

/// A catalog product.
///
/// `price` is in the smallest currency unit (e.g. cents). Orders snapshot
/// name/description/price at purchase time, so later edits to a product never
/// change historical orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub photo: Option<ProductImage>,
    pub status: ProductStatus,
    pub price: Amount,
}
