//! Listing filters over a fetched catalog.

use serde::Deserialize;

use crate::types::Product;

/// Search text plus optional category, as entered on the listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductFilter {
    #[serde(default, rename = "q")]
    search: String,
    #[serde(default)]
    category: Option<String>,
}

impl ProductFilter {
    /// Build a filter. An empty category means "all categories".
    #[must_use]
    pub fn new(search: impl Into<String>, category: Option<String>) -> Self {
        Self {
            search: search.into(),
            category,
        }
    }

    /// The search text as entered.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// The selected category, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    /// True when no filter is applied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.category().is_none()
    }

    /// Name contains the search text (case-insensitive) and the category matches.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let matches_query = product
            .name
            .to_lowercase()
            .contains(&self.search.to_lowercase());
        let matches_category = self
            .category()
            .is_none_or(|selected| product.category.as_deref() == Some(selected));
        matches_query && matches_category
    }

    /// Products passing the filter, in catalog order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Distinct non-empty categories, in the order they first appear.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for category in products.iter().filter_map(Product::category) {
        if !seen.contains(&category) {
            seen.push(category);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Money, ProductId};

    fn product(id: i64, name: &str, category: Option<&str>) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Money::from_cents(100),
            description: String::new(),
            image: String::new(),
            category: category.map(String::from),
            extra: serde_json::Map::new(),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Hex Bolt M8", Some("Fasteners")),
            product(2, "Spur Gear 20T", Some("Gears")),
            product(3, "Carriage BOLT", Some("Hardware")),
            product(4, "Wing Nut", Some("Fasteners")),
            product(5, "Bolt Cutter", None),
            product(6, "Shim", Some("")),
        ]
    }

    fn ids(products: &[&Product]) -> Vec<i64> {
        products.iter().map(|p| p.id.as_i64()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let products = catalog();
        let filter = ProductFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&products).len(), products.len());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let products = catalog();
        let filter = ProductFilter::new("bolt", None);
        assert_eq!(ids(&filter.apply(&products)), vec![1, 3, 5]);
    }

    #[test]
    fn test_search_and_category_must_both_hold() {
        let products = catalog();
        let filter = ProductFilter::new("bolt", Some("Fasteners".to_string()));
        assert_eq!(ids(&filter.apply(&products)), vec![1]);
    }

    #[test]
    fn test_category_alone() {
        let products = catalog();
        let filter = ProductFilter::new("", Some("Fasteners".to_string()));
        assert_eq!(ids(&filter.apply(&products)), vec![1, 4]);
    }

    #[test]
    fn test_blank_category_means_all() {
        let products = catalog();
        let filter = ProductFilter::new("", Some(String::new()));
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&products).len(), products.len());
    }

    #[test]
    fn test_no_match() {
        let products = catalog();
        assert!(ProductFilter::new("sprocket", None).apply(&products).is_empty());
    }

    #[test]
    fn test_categories_first_seen_order_without_blanks() {
        let products = catalog();
        assert_eq!(
            categories(&products),
            vec!["Fasteners", "Gears", "Hardware"]
        );
    }
}
