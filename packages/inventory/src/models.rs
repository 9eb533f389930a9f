//! Product records and form-draft validation.
//!
//! [`ProductDraft`] is the raw form input, exactly as typed. Validation turns
//! it into a typed request ([`NewProduct`] / [`UpdateProduct`]) or reports a
//! [`ValidationError`] before anything touches the network. Price is a
//! [`Decimal`], so a persisted product can never carry a not-a-number value.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A persisted product row. Field names match the table's columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub comments: String,
    /// Path of the uploaded image inside the storage bucket.
    pub image_url: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// An image picked in the form, read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl ImageUpload {
    /// Wrap a picked file, deriving the MIME type from its extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            bytes,
            content_type,
        }
    }
}

/// MIME type for an image file name, by extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Why a draft was rejected before any request was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a product name")]
    MissingName,
    #[error("Please enter a price")]
    MissingPrice,
    #[error("Please enter a valid price")]
    InvalidPrice,
    #[error("Please enter a comment")]
    MissingComments,
    #[error("Please select an image")]
    MissingImage,
}

/// A validated create request. The image is mandatory here.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub comments: String,
    pub image: ImageUpload,
}

/// A validated update. `new_image: None` keeps the stored object.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProduct {
    pub name: String,
    pub price: Decimal,
    pub comments: String,
    pub new_image: Option<ImageUpload>,
}

/// Raw form state for both the create and the edit form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: String,
    pub comments: String,
    pub image: Option<ImageUpload>,
}

impl ProductDraft {
    /// Prefill from an existing product (edit form).
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.to_string(),
            comments: product.comments.clone(),
            image: None,
        }
    }

    fn parsed_fields(&self) -> Result<(String, Decimal, String), ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        let price_text = self.price.trim();
        if price_text.is_empty() {
            return Err(ValidationError::MissingPrice);
        }
        let price: Decimal = price_text
            .parse()
            .map_err(|_| ValidationError::InvalidPrice)?;
        if price.is_sign_negative() {
            return Err(ValidationError::InvalidPrice);
        }
        let comments = self.comments.trim();
        if comments.is_empty() {
            return Err(ValidationError::MissingComments);
        }
        Ok((name.to_string(), price, comments.to_string()))
    }

    /// Validate for creation: every field plus the image is required.
    pub fn validate_new(&self) -> Result<NewProduct, ValidationError> {
        let (name, price, comments) = self.parsed_fields()?;
        let image = self.image.clone().ok_or(ValidationError::MissingImage)?;
        Ok(NewProduct {
            name,
            price,
            comments,
            image,
        })
    }

    /// Validate for update: omitting the image keeps the stored one.
    pub fn validate_update(&self) -> Result<UpdateProduct, ValidationError> {
        let (name, price, comments) = self.parsed_fields()?;
        Ok(UpdateProduct {
            name,
            price,
            comments,
            new_image: self.image.clone(),
        })
    }
}
