use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One sale as delivered by the remote store. Extra fields on the wire are
/// ignored; the document id is assigned remotely and treated as opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: String,
    pub amount: Decimal,
    pub salesperson: String,
    pub order_month: String, // "YYYY-MM" tag
    pub product_type: String,
}

/// Product tags carried on records. Anything else falls outside the
/// finance/insurance monthly split but still counts toward totals.
pub const PRODUCT_FINANCE: &str = "finance";
pub const PRODUCT_INSURANCE: &str = "insurance";

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parses_wire_shape_and_ignores_extra_fields() {
        let raw = r#"{
            "id": "a1b2",
            "amount": 500,
            "salesperson": "張瓊月",
            "orderMonth": "2026-01",
            "productType": "finance",
            "createdAt": "2026-01-07T09:30:00Z",
            "note": "walk-in"
        }"#;

        let record: CustomerRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.id, "a1b2");
        assert_eq!(record.amount, dec!(500));
        assert_eq!(record.order_month, "2026-01");
        assert_eq!(record.product_type, PRODUCT_FINANCE);
    }
}
