//! # Sync Tuples
//!
//! The compact `code:price:stock[:priorPrice]` encoding used to batch
//! catalog state between the warehouse and the storefront. Parsing is
//! strict about presence (a missing field is an error) but tolerant of
//! surrounding whitespace.

use thiserror::Error;

/// Errors for a single malformed tuple string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TupleError {
    #[error("Empty tuple")]
    Empty,

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid {field}: {value:?}")]
    BadNumber { field: &'static str, value: String },
}

/// Catalog state of one product on the warehouse side
#[derive(Debug, Clone, PartialEq)]
pub struct SyncTuple {
    pub code: String,
    pub price_now: f64,
    pub price_before: f64,
    pub stock: i64,
}

impl SyncTuple {
    /// Parse `code:price:stock` or `code:price:stock:priorPrice`.
    /// The prior price defaults to zero when absent.
    pub fn parse(raw: &str) -> Result<Self, TupleError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TupleError::Empty);
        }

        let mut parts = raw.split(':');
        let code = parts.next().map(str::trim).unwrap_or_default();
        if code.is_empty() {
            return Err(TupleError::MissingField("code"));
        }

        let price_now = parse_number(parts.next(), "price")?;
        let stock = parse_number(parts.next(), "stock")?.round() as i64;
        let price_before = match parts.next() {
            Some(v) => parse_number(Some(v), "priorPrice")?,
            None => 0.0,
        };

        Ok(Self {
            code: code.to_string(),
            price_now,
            price_before,
            stock,
        })
    }

    /// Re-export in the four-field form with integer-rounded prices
    pub fn export(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.code,
            self.price_now.round() as i64,
            self.stock,
            self.price_before.round() as i64
        )
    }
}

fn parse_number(part: Option<&str>, field: &'static str) -> Result<f64, TupleError> {
    let value = part.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(TupleError::MissingField(field));
    }
    value.parse().map_err(|_| TupleError::BadNumber {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_fields() {
        let t = SyncTuple::parse("MOTO01:199000:5").unwrap();
        assert_eq!(t.code, "MOTO01");
        assert_eq!(t.price_now, 199000.0);
        assert_eq!(t.stock, 5);
        assert_eq!(t.price_before, 0.0);
    }

    #[test]
    fn test_parse_four_fields() {
        let t = SyncTuple::parse(" MOTO01 : 199000 : 5 : 210000 ").unwrap();
        assert_eq!(t.price_before, 210000.0);
    }

    #[test]
    fn test_missing_stock_is_an_error() {
        assert_eq!(
            SyncTuple::parse("MOTO01:199000"),
            Err(TupleError::MissingField("stock"))
        );
    }

    #[test]
    fn test_missing_code_is_an_error() {
        assert_eq!(
            SyncTuple::parse(":199000:5"),
            Err(TupleError::MissingField("code"))
        );
        assert_eq!(SyncTuple::parse("  "), Err(TupleError::Empty));
    }

    #[test]
    fn test_garbage_number_is_an_error() {
        assert!(matches!(
            SyncTuple::parse("MOTO01:cheap:5"),
            Err(TupleError::BadNumber { field: "price", .. })
        ));
    }

    #[test]
    fn test_export_rounds_prices() {
        let t = SyncTuple::parse("MOTO01:199000.6:5:210000.4").unwrap();
        assert_eq!(t.export(), "MOTO01:199001:5:210000");
    }
}
