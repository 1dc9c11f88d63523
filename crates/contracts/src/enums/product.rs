use serde::{Deserialize, Serialize};
use std::fmt;

/// Product lines. Declaration order is the canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Product {
    #[serde(rename = "Product A")]
    ProductA,
    #[serde(rename = "Product B")]
    ProductB,
    #[serde(rename = "Product C")]
    ProductC,
}

impl Product {
    pub fn display_name(&self) -> &'static str {
        match self {
            Product::ProductA => "Product A",
            Product::ProductB => "Product B",
            Product::ProductC => "Product C",
        }
    }

    /// All products in canonical order
    pub fn all() -> Vec<Product> {
        vec![Product::ProductA, Product::ProductB, Product::ProductC]
    }

    /// Parse from a display name, e.g. "Product B" or "product b"
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Product::all()
            .into_iter()
            .find(|p| p.display_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_display_name() {
        let json = serde_json::to_string(&Product::ProductB).unwrap();
        assert_eq!(json, "\"Product B\"");
        let back: Product = serde_json::from_str("\"Product C\"").unwrap();
        assert_eq!(back, Product::ProductC);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Product::from_name("product a"), Some(Product::ProductA));
        assert_eq!(Product::from_name("Product D"), None);
    }
}
