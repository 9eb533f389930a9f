//! # ProductCatalog — owner-scoped product CRUD
//!
//! Every operation takes the caller's [`Session`] explicitly; the owner id in
//! that session scopes each query, and its access token authenticates the
//! request. Writes that span storage and database follow a fixed order with a
//! compensating cleanup:
//!
//! | Operation | Sequence |
//! |-----------|----------|
//! | [`fetch`](ProductCatalog::fetch) | select rows owned by the session's user, newest first |
//! | [`create`](ProductCatalog::create) | upload image → insert row; a failed insert deletes the upload again |
//! | [`update`](ProductCatalog::update) | optionally swap the image → patch the row; a failed patch deletes the fresh upload |
//! | [`delete`](ProductCatalog::delete) | remove the object (best effort) → delete the row |
//!
//! The cleanup paths exist because the two writes are not transactional:
//! without them a failure between upload and insert would strand an object
//! nothing references. Failures of the cleanup itself are logged, not
//! surfaced; at that point the user already has an error to deal with.

use client::{Backend, Error, Query, Session};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::{ImageUpload, NewProduct, Product, UpdateProduct};

/// Database table holding product rows.
const PRODUCTS_TABLE: &str = "products";
/// Storage bucket holding product images.
const IMAGE_BUCKET: &str = "productimages";

/// Product operations against a [`Backend`].
#[derive(Clone)]
pub struct ProductCatalog<B: Backend> {
    backend: B,
    bucket: String,
}

impl<B: Backend> ProductCatalog<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            bucket: IMAGE_BUCKET.to_string(),
        }
    }

    /// Use a different storage bucket (staging projects, tests).
    pub fn with_bucket(backend: B, bucket: impl Into<String>) -> Self {
        Self {
            backend,
            bucket: bucket.into(),
        }
    }

    /// All products owned by the session's user, newest first.
    pub async fn fetch(&self, session: &Session) -> Result<Vec<Product>, Error> {
        let query = Query::new()
            .eq("user_id", session.user.id.as_str())
            .order_desc("created_at");
        let rows = self
            .backend
            .select_rows(PRODUCTS_TABLE, &query, &session.access_token)
            .await?;
        rows.into_iter().map(decode_product).collect()
    }

    /// Create a product: upload the image, then insert the row referencing
    /// it. If the insert fails the uploaded object is removed again.
    pub async fn create(&self, session: &Session, new: NewProduct) -> Result<Product, Error> {
        let token = &session.access_token;
        let NewProduct {
            name,
            price,
            comments,
            image,
        } = new;
        let ImageUpload {
            file_name,
            bytes,
            content_type,
        } = image;

        let key = object_key(&file_name);
        let path = self
            .backend
            .upload_object(&self.bucket, &key, bytes, &content_type, token)
            .await?;

        let row = json!({
            "name": name,
            "price": price,
            "comments": comments,
            "image_url": path,
            "user_id": session.user.id,
        });
        match self.backend.insert_row(PRODUCTS_TABLE, row, token).await {
            Ok(stored) => {
                tracing::info!(name = %name, "product created");
                decode_product(stored)
            }
            Err(err) => {
                if let Err(cleanup) = self
                    .backend
                    .remove_objects(&self.bucket, &[path.clone()], token)
                    .await
                {
                    tracing::warn!(%path, %cleanup, "orphaned image left behind after failed insert");
                }
                Err(err)
            }
        }
    }

    /// Update a product's fields, optionally replacing its image. The
    /// replaced object is removed best-effort before the new upload; if the
    /// row patch fails, the fresh upload is removed again.
    pub async fn update(
        &self,
        session: &Session,
        product: &Product,
        changes: UpdateProduct,
    ) -> Result<(), Error> {
        let token = &session.access_token;
        let UpdateProduct {
            name,
            price,
            comments,
            new_image,
        } = changes;

        let mut fresh_path = None;
        if let Some(image) = new_image {
            // Losing this delete only costs storage space; the row still
            // points at the new object afterwards.
            if let Err(err) = self
                .backend
                .remove_objects(&self.bucket, &[product.image_url.clone()], token)
                .await
            {
                tracing::warn!(path = %product.image_url, %err, "could not remove replaced image");
            }
            let ImageUpload {
                file_name,
                bytes,
                content_type,
            } = image;
            let key = object_key(&file_name);
            fresh_path = Some(
                self.backend
                    .upload_object(&self.bucket, &key, bytes, &content_type, token)
                    .await?,
            );
        }

        let mut patch = json!({
            "name": name,
            "price": price,
            "comments": comments,
        });
        if let Some(path) = &fresh_path {
            patch["image_url"] = Value::from(path.clone());
        }

        let query = Query::new()
            .eq("id", product.id)
            .eq("user_id", session.user.id.as_str());
        match self
            .backend
            .update_rows(PRODUCTS_TABLE, patch, &query, token)
            .await
        {
            Ok(()) => {
                tracing::info!(id = product.id, "product updated");
                Ok(())
            }
            Err(err) => {
                if let Some(path) = fresh_path {
                    if let Err(cleanup) = self
                        .backend
                        .remove_objects(&self.bucket, &[path], token)
                        .await
                    {
                        tracing::warn!(%cleanup, "orphaned image left behind after failed update");
                    }
                }
                Err(err)
            }
        }
    }

    /// Delete a product: remove its stored image, then the row. A storage
    /// failure does not stop the row deletion; the orphan is logged.
    pub async fn delete(&self, session: &Session, id: i64, image_ref: &str) -> Result<(), Error> {
        let token = &session.access_token;
        if let Err(err) = self
            .backend
            .remove_objects(&self.bucket, &[image_ref.to_string()], token)
            .await
        {
            tracing::warn!(path = %image_ref, %err, "image removal failed, deleting row anyway");
        }
        let query = Query::new()
            .eq("id", id)
            .eq("user_id", session.user.id.as_str());
        self.backend
            .delete_rows(PRODUCTS_TABLE, &query, token)
            .await?;
        tracing::info!(id, "product deleted");
        Ok(())
    }

    /// Public URL of a product's image, for rendering.
    pub fn image_url(&self, product: &Product) -> String {
        self.backend
            .public_object_url(&self.bucket, &product.image_url)
    }
}

fn decode_product(row: Value) -> Result<Product, Error> {
    serde_json::from_value(row).map_err(|e| Error::Decode(e.to_string()))
}

/// Random object key that keeps the original extension, so the stored file
/// stays recognisable by type.
fn object_key(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!("{}.{ext}", Uuid::new_v4()),
        _ => Uuid::new_v4().to_string(),
    }
}
