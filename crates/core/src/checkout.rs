//! Checkout totals and the order submission gate.
//!
//! # Totals
//!
//! ```text
//! subtotal = Σ price × quantity
//! tax      = subtotal × province rate   (0 when no province is selected)
//! total    = subtotal + tax + delivery fee
//! ```
//!
//! Nothing is rounded until display.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart;
use crate::types::{CartItem, Money};

/// Flat delivery fee charged on every order.
pub const DELIVERY_FEE: Money = Money::from_dollars(10);

/// Error parsing a province name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown province: {0}")]
pub struct ProvinceError(pub String);

/// Provinces the store ships to, each with its sales tax rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Province {
    Ontario,
    Quebec,
    #[serde(rename = "British Columbia")]
    BritishColumbia,
    Alberta,
}

impl Province {
    /// All provinces in the order they are offered.
    pub const ALL: [Self; 4] = [
        Self::Ontario,
        Self::Quebec,
        Self::BritishColumbia,
        Self::Alberta,
    ];

    /// Display name, also used as the form value.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ontario => "Ontario",
            Self::Quebec => "Quebec",
            Self::BritishColumbia => "British Columbia",
            Self::Alberta => "Alberta",
        }
    }

    /// Sales tax rate as a fraction (0.13 for 13%).
    #[must_use]
    pub fn tax_rate(self) -> Decimal {
        match self {
            Self::Ontario => Decimal::new(13, 2),
            Self::Quebec => Decimal::new(15, 2),
            Self::BritishColumbia => Decimal::new(12, 2),
            Self::Alberta => Decimal::new(5, 2),
        }
    }

    /// Look up a province by form value. Blank or unknown names select nothing.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Province {
    type Err = ProvinceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| ProvinceError(s.to_string()))
    }
}

/// Tax rate for an optional province selection.
#[must_use]
pub fn tax_rate(province: Option<Province>) -> Decimal {
    province.map_or(Decimal::ZERO, Province::tax_rate)
}

/// Shipping and payment fields collected on the checkout form.
///
/// Free text, validated only for non-emptiness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub card_expiry: String,
    #[serde(default)]
    pub card_cvv: String,
}

impl CustomerInfo {
    fn fields(&self) -> [&str; 5] {
        [
            &self.name,
            &self.address,
            &self.card_number,
            &self.card_expiry,
            &self.card_cvv,
        ]
    }

    /// True when every field has non-whitespace content.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.fields().iter().all(|field| !field.trim().is_empty())
    }
}

/// Whether an order may be placed: all customer fields filled and a province chosen.
#[must_use]
pub fn can_submit(info: &CustomerInfo, province: Option<Province>) -> bool {
    info.is_complete() && province.is_some()
}

/// Computed order totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub province: Option<Province>,
    pub subtotal: Money,
    pub tax: Money,
    pub delivery_fee: Money,
    pub total: Money,
}

impl CheckoutSummary {
    /// Compute totals for a cart and a province selection.
    #[must_use]
    pub fn compute(items: &[CartItem], province: Option<Province>) -> Self {
        Self::from_subtotal(cart::subtotal(items), province)
    }

    /// Compute totals from an already-known subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Money, province: Option<Province>) -> Self {
        let tax = subtotal.scale(tax_rate(province));
        Self {
            province,
            subtotal,
            tax,
            delivery_fee: DELIVERY_FEE,
            total: subtotal + tax + DELIVERY_FEE,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Product, ProductId, Quantity};

    fn item(id: i64, cents: u32, quantity: u32) -> CartItem {
        CartItem::new(
            Product {
                id: ProductId::new(id),
                name: format!("Part {id}"),
                price: Money::from_cents(cents),
                description: String::new(),
                image: String::new(),
                category: None,
                extra: serde_json::Map::new(),
            },
            Quantity::new(quantity).unwrap(),
        )
    }

    fn complete_info() -> CustomerInfo {
        CustomerInfo {
            name: "Bob".to_string(),
            address: "1 Main St".to_string(),
            card_number: "4111 1111 1111 1111".to_string(),
            card_expiry: "2027-04".to_string(),
            card_cvv: "123".to_string(),
        }
    }

    #[test]
    fn test_province_round_trips_names() {
        for province in Province::ALL {
            assert_eq!(Province::lookup(province.name()), Some(province));
        }
    }

    #[test]
    fn test_unknown_province_has_zero_tax() {
        assert_eq!(Province::lookup("Nunavut"), None);
        assert_eq!(Province::lookup(""), None);
        assert_eq!(tax_rate(Province::lookup("Nunavut")), Decimal::ZERO);
        let summary = CheckoutSummary::from_subtotal(Money::from_cents(10000), None);
        assert_eq!(summary.tax, Money::ZERO);
    }

    #[test]
    fn test_ontario_tax_on_hundred() {
        let summary =
            CheckoutSummary::from_subtotal(Money::from_cents(10000), Some(Province::Ontario));
        assert_eq!(summary.tax.display(), "$13.00");
    }

    #[test]
    fn test_alberta_example_order() {
        let items = [item(1, 1000, 2), item(2, 500, 1)];
        let summary = CheckoutSummary::compute(&items, Some(Province::Alberta));
        assert_eq!(summary.subtotal.display(), "$25.00");
        assert_eq!(summary.tax.display(), "$1.25");
        assert_eq!(summary.delivery_fee.display(), "$10.00");
        assert_eq!(summary.total.display(), "$36.25");
    }

    #[test]
    fn test_empty_cart_still_charges_delivery() {
        let summary = CheckoutSummary::compute(&[], Some(Province::Quebec));
        assert_eq!(summary.total, DELIVERY_FEE);
    }

    #[test]
    fn test_rates_table() {
        assert_eq!(Province::Quebec.tax_rate(), Decimal::new(15, 2));
        assert_eq!(Province::BritishColumbia.tax_rate(), Decimal::new(12, 2));
    }

    #[test]
    fn test_can_submit_requires_every_field_and_province() {
        let info = complete_info();
        assert!(can_submit(&info, Some(Province::Ontario)));
        assert!(!can_submit(&info, None));

        let blanks: [fn(&mut CustomerInfo); 5] = [
            |i| i.name.clear(),
            |i| i.address = "   ".to_string(),
            |i| i.card_number.clear(),
            |i| i.card_expiry.clear(),
            |i| i.card_cvv.clear(),
        ];
        for blank in blanks {
            let mut partial = complete_info();
            blank(&mut partial);
            assert!(!can_submit(&partial, Some(Province::Ontario)));
        }
    }

    #[test]
    fn test_default_customer_info_is_incomplete() {
        assert!(!CustomerInfo::default().is_complete());
    }
}
