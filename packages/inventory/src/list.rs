//! Client-side filtering over an already-fetched product set.
//!
//! Search never touches the backend: it is a pure function over the rows the
//! last fetch returned, so typing in the search box stays instant and
//! re-running the same query cannot change the result.

use crate::models::Product;

/// Case-insensitive substring match on the product name.
fn name_matches(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
}

/// Products whose name contains `query`, ignoring case and preserving the
/// input order. An empty query returns everything.
pub fn search_products(products: &[Product], query: &str) -> Vec<Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.to_vec();
    }
    products
        .iter()
        .filter(|product| name_matches(product, &needle))
        .cloned()
        .collect()
}

/// The products the last fetch returned, in display order.
///
/// Holding them in one value makes the two empty states distinguishable:
/// [`is_empty`](ProductSet::is_empty) means the user owns nothing, while an
/// empty [`search`](ProductSet::search) result on a non-empty set means
/// nothing matched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductSet {
    products: Vec<Product>,
}

impl ProductSet {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Swap in the result of a fresh fetch.
    pub fn replace(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    /// Drop one product locally, after the backend confirmed its deletion.
    pub fn remove(&mut self, id: i64) {
        self.products.retain(|product| product.id != id);
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn search(&self, query: &str) -> Vec<Product> {
        search_products(&self.products, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn product(id: i64, name: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            price: Decimal::new(999, 2),
            comments: String::new(),
            image_url: format!("{id}.png"),
            user_id: "user-1".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let products = vec![
            product(1, "Blue Widget"),
            product(2, "Gadget"),
            product(3, "widget pro"),
        ];

        let hits = search_products(&products, "WIDGET");
        let names: Vec<&str> = hits.iter().map(|p| p.name.as_str()).collect();
        // Matches anywhere in the name, original order preserved.
        assert_eq!(names, vec!["Blue Widget", "widget pro"]);
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let products = vec![product(1, "Widget"), product(2, "Gadget")];
        assert_eq!(search_products(&products, ""), products);
        assert_eq!(search_products(&products, "   "), products);
    }

    #[test]
    fn test_search_is_idempotent() {
        let products = vec![
            product(1, "Widget"),
            product(2, "Gadget"),
            product(3, "Widget Mini"),
        ];

        let once = search_products(&products, "widget");
        let twice = search_products(&once, "widget");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_match_differs_from_empty_set() {
        let empty = ProductSet::default();
        assert!(empty.is_empty());

        let set = ProductSet::new(vec![product(1, "Widget")]);
        assert!(!set.is_empty());
        // Nothing matched, but the user does own products.
        assert!(set.search("zzz").is_empty());
    }

    #[test]
    fn test_remove_drops_only_that_product() {
        let mut set = ProductSet::new(vec![
            product(1, "Widget"),
            product(2, "Gadget"),
            product(3, "Widget Mini"),
        ]);

        set.remove(2);
        assert_eq!(set.len(), 2);
        assert!(set.all().iter().all(|p| p.id != 2));

        // Search views reflect the removal immediately.
        let hits = set.search("widget");
        assert_eq!(hits.len(), 2);
    }
}
