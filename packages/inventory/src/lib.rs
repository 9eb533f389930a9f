pub mod catalog;
pub mod list;
pub mod models;

pub use catalog::ProductCatalog;
pub use list::{search_products, ProductSet};
pub use models::{
    content_type_for, ImageUpload, NewProduct, Product, ProductDraft, UpdateProduct,
    ValidationError,
};

pub use rust_decimal::Decimal;
