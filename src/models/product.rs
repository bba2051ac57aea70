//! Product listings and the typed request bodies that create or edit them.

use super::object_id::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use url::Url;

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 1000;
pub const CLASSIFIER_MAX_LEN: usize = 100;

/// Lifecycle state of a listing. Anything else is rejected on input and by
/// the table's CHECK constraint.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Available,
    Sold,
    Reserved,
}

impl ProductStatus {
    /// Reserved and sold listings are what the seller sees as orders.
    pub fn is_order(self) -> bool {
        matches!(self, ProductStatus::Reserved | ProductStatus::Sold)
    }
}

/// A persisted listing.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Assigned on insert, never changed.
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub price: f64,

    /// Image URLs in display order.
    #[sqlx(json)]
    pub images: Vec<String>,

    /// Owning user.
    pub seller_id: ObjectId,

    pub status: ProductStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Field rule violated by a request body.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub &'static str);

/// Body of `POST /api/product`.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub images: Vec<String>,
    pub seller_id: ObjectId,
    #[serde(default)]
    pub status: Option<ProductStatus>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_name(&self.name)?;
        check_price(self.price)?;
        check_images(&self.images)?;
        check_optional_fields(
            self.description.as_deref(),
            self.category.as_deref(),
            self.location.as_deref(),
        )
    }
}

/// Body of `PUT /api/product/{id}`: only the supplied fields change.
///
/// `_id`, `createdAt` and `updatedAt` are not accepted here; sending them is
/// a malformed request.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub images: Option<Vec<String>>,
    pub seller_id: Option<ObjectId>,
    pub status: Option<ProductStatus>,
    pub category: Option<String>,
    pub location: Option<String>,
}

impl ProductPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            check_name(name)?;
        }
        if let Some(price) = self.price {
            check_price(price)?;
        }
        if let Some(images) = &self.images {
            check_images(images)?;
        }
        check_optional_fields(
            self.description.as_deref(),
            self.category.as_deref(),
            self.location.as_deref(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.images.is_none()
            && self.seller_id.is_none()
            && self.status.is_none()
            && self.category.is_none()
            && self.location.is_none()
    }
}

fn check_name(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        return Err(ValidationError(
            "name must be between 2 and 100 characters",
        ));
    }
    Ok(())
}

fn check_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ValidationError("price must be a non-negative number"));
    }
    Ok(())
}

fn check_images(images: &[String]) -> Result<(), ValidationError> {
    if images.is_empty() {
        return Err(ValidationError("images must contain at least one url"));
    }
    if images.iter().any(|img| Url::parse(img).is_err()) {
        return Err(ValidationError("images must be valid urls"));
    }
    Ok(())
}

fn check_optional_fields(
    description: Option<&str>,
    category: Option<&str>,
    location: Option<&str>,
) -> Result<(), ValidationError> {
    if description.is_some_and(|d| d.chars().count() > DESCRIPTION_MAX_LEN) {
        return Err(ValidationError(
            "description must be at most 1000 characters",
        ));
    }
    if category.is_some_and(|c| c.chars().count() > CLASSIFIER_MAX_LEN) {
        return Err(ValidationError("category must be at most 100 characters"));
    }
    if location.is_some_and(|l| l.chars().count() > CLASSIFIER_MAX_LEN) {
        return Err(ValidationError("location must be at most 100 characters"));
    }
    Ok(())
}
