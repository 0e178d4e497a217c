use crate::{PriceBracket, Product};

const MID_FLOOR: f64 = 700.0;
const HIGH_FLOOR: f64 = 1000.0;

/// Whether `product` falls within `bracket`.
///
/// Bounds are half-open so every non-negative rate lands in exactly one of
/// `Low`, `Mid` and `High`; for whole rand amounts this is the same as the
/// inclusive ranges 0-699, 700-999 and 1000+.
pub fn matches(product: &Product, bracket: PriceBracket) -> bool {
    rate_in_bracket(product.product_rate, bracket)
}

pub fn rate_in_bracket(rate: f64, bracket: PriceBracket) -> bool {
    match bracket {
        PriceBracket::Any => true,
        PriceBracket::Low => rate < MID_FLOOR,
        PriceBracket::Mid => (MID_FLOOR..HIGH_FLOOR).contains(&rate),
        PriceBracket::High => rate >= HIGH_FLOOR,
    }
}

/// Products within `bracket`, input order preserved.
pub fn filter_products(products: &[Product], bracket: PriceBracket) -> Vec<Product> {
    products
        .iter()
        .filter(|product| matches(product, bracket))
        .cloned()
        .collect()
}
