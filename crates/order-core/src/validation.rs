//! # Validation Module
//!
//! The canonical validation policy: one function per field, turning raw
//! terminal text into a typed value or a [`ValidationError`].
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Console prompt                                               │
//! │  └── Re-asks the same field until THIS MODULE accepts it               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repository pre-queries (order-db)                            │
//! │  ├── Existence checks (customer, order, product ids)                   │
//! │  └── Uniqueness checks (email, product name, address type)             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK constraints (lengths, enums)                                │
//! │  ├── UNIQUE COLLATE NOCASE                                             │
//! │  └── Foreign keys                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All text is trimmed first and lengths are counted in characters, so
//! "Åsa Öberg" is nine characters, not twelve bytes.
//!
//! ## Usage
//! ```rust
//! use order_core::validation;
//!
//! assert_eq!(validation::customer_name("  Alice Smith ").unwrap(), "Alice Smith");
//! assert!(validation::email("alice@x").is_err());
//! assert_eq!(validation::quantity("3").unwrap(), 3);
//! ```

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{AddressType, OrderStatus};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Limits
// =============================================================================

pub const CUSTOMER_NAME_LEN: (usize, usize) = (3, 20);
pub const PHONE_LEN: (usize, usize) = (5, 20);
pub const STREET_LEN: (usize, usize) = (3, 50);
pub const CITY_LEN: (usize, usize) = (2, 20);
pub const ZIP_CODE_LEN: (usize, usize) = (3, 15);
pub const COUNTRY_LEN: (usize, usize) = (2, 50);
pub const PRODUCT_NAME_LEN: (usize, usize) = (2, 15);
pub const DESCRIPTION_MAX: usize = 25;

/// Upper bounds keep `quantity * unit_price` and restocked levels far
/// inside `i64`. The schema enforces the same limits.
pub const UNIT_PRICE_MAX: Money = Money::from_cents(100_000_000);
pub const QUANTITY_MAX: i64 = 100_000;
pub const STOCK_MAX: i64 = 1_000_000;

fn text_in_range(field: &str, input: &str, (min, max): (usize, usize)) -> ValidationResult<String> {
    let value = input.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ValidationError::length(field, min, max));
    }
    Ok(value.to_string())
}

// =============================================================================
// Customer Fields
// =============================================================================

/// Customer name: 3 to 20 characters.
pub fn customer_name(input: &str) -> ValidationResult<String> {
    text_in_range("Name", input, CUSTOMER_NAME_LEN)
}

/// Email address.
///
/// ## Rules
/// - Must not be empty or contain spaces
/// - Must contain `@` and a `.` somewhere after it
///
/// Uniqueness is checked against the store separately (case-insensitive).
pub fn email(input: &str) -> ValidationResult<String> {
    let value = input.trim();
    if value.is_empty() {
        return Err(ValidationError::required("Email"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::format("Email", "must not contain spaces"));
    }
    match (value.find('@'), value.rfind('.')) {
        (Some(at), Some(dot)) if at < dot => Ok(value.to_string()),
        _ => Err(ValidationError::format(
            "Email",
            "expected something like name@example.com",
        )),
    }
}

/// Phone number: 5 to 20 digits, nothing else.
pub fn phone(input: &str) -> ValidationResult<String> {
    let value = text_in_range("Phone", input, PHONE_LEN)?;
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::format("Phone", "digits only"));
    }
    Ok(value)
}

// =============================================================================
// Address Fields
// =============================================================================

/// Menu choice for the address type: `1`/`2` or the type name.
pub fn address_type_choice(input: &str) -> ValidationResult<AddressType> {
    let value = input.trim();
    match value {
        "1" => return Ok(AddressType::Delivery),
        "2" => return Ok(AddressType::Billing),
        _ => {}
    }
    AddressType::ALL
        .into_iter()
        .find(|t| t.as_str().eq_ignore_ascii_case(value))
        .ok_or_else(|| ValidationError::NotAllowed {
            field: "Address type".to_string(),
            allowed: vec!["1 (Delivery)".to_string(), "2 (Billing)".to_string()],
        })
}

pub fn street(input: &str) -> ValidationResult<String> {
    text_in_range("Street", input, STREET_LEN)
}

pub fn city(input: &str) -> ValidationResult<String> {
    text_in_range("City", input, CITY_LEN)
}

pub fn zip_code(input: &str) -> ValidationResult<String> {
    text_in_range("Zip code", input, ZIP_CODE_LEN)
}

pub fn country(input: &str) -> ValidationResult<String> {
    text_in_range("Country", input, COUNTRY_LEN)
}

// =============================================================================
// Product Fields
// =============================================================================

/// Product name: 2 to 15 characters (matches the schema CHECK).
pub fn product_name(input: &str) -> ValidationResult<String> {
    text_in_range("Product name", input, PRODUCT_NAME_LEN)
}

/// Unit price: a decimal amount greater than zero.
///
/// ```rust
/// use order_core::validation::unit_price;
///
/// assert_eq!(unit_price("9.99").unwrap().cents(), 999);
/// assert!(unit_price("0").is_err());
/// assert!(unit_price("-1").is_err());
/// ```
pub fn unit_price(input: &str) -> ValidationResult<Money> {
    let value = input.trim();
    if value.is_empty() {
        return Err(ValidationError::required("Unit price"));
    }
    let money: Money = value
        .parse()
        .map_err(|e: crate::money::ParseMoneyError| ValidationError::format("Unit price", e.to_string()))?;
    if !money.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "Unit price".to_string(),
        });
    }
    if money > UNIT_PRICE_MAX {
        return Err(ValidationError::too_large("Unit price", UNIT_PRICE_MAX));
    }
    Ok(money)
}

/// Stock level: a whole number, zero or more.
pub fn stock(input: &str) -> ValidationResult<i64> {
    let value = parse_integer("Stock", input)?;
    if value < 0 {
        return Err(ValidationError::Negative {
            field: "Stock".to_string(),
        });
    }
    if value > STOCK_MAX {
        return Err(ValidationError::too_large("Stock", STOCK_MAX));
    }
    Ok(value)
}

// =============================================================================
// Identifiers
// =============================================================================

fn parse_integer(field: &str, input: &str) -> ValidationResult<i64> {
    let value = input.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    value
        .parse::<i64>()
        .map_err(|_| ValidationError::format(field, "enter a whole number"))
}

/// A record id typed by the operator: a positive integer.
pub fn record_id(field: &str, input: &str) -> ValidationResult<i64> {
    let id = parse_integer(field, input)?;
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(id)
}

/// Like [`record_id`], but empty input means "skip".
pub fn optional_record_id(field: &str, input: &str) -> ValidationResult<Option<i64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    record_id(field, input).map(Some)
}

// =============================================================================
// Order Fields
// =============================================================================

/// Order date as `YYYY-MM-DD` (midnight UTC). Empty input means `now`.
pub fn order_date(input: &str, now: DateTime<Utc>) -> ValidationResult<DateTime<Utc>> {
    let value = input.trim();
    if value.is_empty() {
        return Ok(now);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::format("Order date", "use YYYY-MM-DD"))
}

/// Order status, case-insensitive. Empty input means `Created`.
pub fn order_status(input: &str) -> ValidationResult<OrderStatus> {
    if input.trim().is_empty() {
        return Ok(OrderStatus::Created);
    }
    input.parse()
}

// =============================================================================
// Order Item Fields
// =============================================================================

/// Free-text line description, at most 25 characters. Empty means none.
pub fn description(input: &str) -> ValidationResult<Option<String>> {
    let value = input.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if value.chars().count() > DESCRIPTION_MAX {
        return Err(ValidationError::TooLong {
            field: "Description".to_string(),
            max: DESCRIPTION_MAX,
        });
    }
    Ok(Some(value.to_string()))
}

/// Ordered quantity: a whole number from 1 to [`QUANTITY_MAX`].
pub fn quantity(input: &str) -> ValidationResult<i64> {
    let qty = parse_integer("Quantity", input)?;
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "Quantity".to_string(),
        });
    }
    if qty > QUANTITY_MAX {
        return Err(ValidationError::too_large("Quantity", QUANTITY_MAX));
    }
    Ok(qty)
}

/// Cross-field rule for order lines.
pub fn item_reference(product_id: Option<i64>, description: Option<&str>) -> CoreResult<()> {
    let has_description = description.is_some_and(|d| !d.trim().is_empty());
    if product_id.is_none() && !has_description {
        return Err(CoreError::MissingItemReference);
    }
    Ok(())
}

/// Checks `requested` units against `available` stock.
pub fn stock_available(product_id: i64, available: i64, requested: i64) -> CoreResult<()> {
    if available <= 0 {
        return Err(CoreError::OutOfStock { product_id });
    }
    if requested > available {
        return Err(CoreError::InsufficientStock {
            product_id,
            available,
            requested,
        });
    }
    Ok(())
}

// =============================================================================
// Confirmation
// =============================================================================

/// `y` or `yes` (any case) confirms; anything else declines.
pub fn yes_no(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_customer_name() {
        assert_eq!(customer_name(" Alice Smith ").unwrap(), "Alice Smith");
        assert_eq!(customer_name("Åsa").unwrap(), "Åsa");
        assert!(customer_name("Al").is_err());
        assert!(customer_name("").is_err());
        assert!(customer_name(&"A".repeat(21)).is_err());
        assert!(customer_name(&"A".repeat(20)).is_ok());
    }

    #[test]
    fn test_email() {
        assert_eq!(email(" alice@x.com ").unwrap(), "alice@x.com");
        assert!(email("first.last@mail.example.org").is_ok());

        assert!(email("").is_err());
        assert!(email("alice.x@com").is_err());
        assert!(email("alice@xcom").is_err());
        assert!(email("alice x@y.com").is_err());
        assert!(email("alice.example.com").is_err());
    }

    #[test]
    fn test_phone() {
        assert_eq!(phone("12345678").unwrap(), "12345678");
        assert!(phone("1234").is_err());
        assert!(phone(&"1".repeat(21)).is_err());
        assert!(phone("070-123456").is_err());
        assert!(phone("+4670123").is_err());
    }

    #[test]
    fn test_address_fields() {
        assert_eq!(address_type_choice("1").unwrap(), AddressType::Delivery);
        assert_eq!(address_type_choice("2").unwrap(), AddressType::Billing);
        assert_eq!(address_type_choice("billing").unwrap(), AddressType::Billing);
        assert!(address_type_choice("3").is_err());

        assert!(street("Main Street 1").is_ok());
        assert!(street("Ab").is_err());
        assert!(city("Oslo").is_ok());
        assert!(city("X").is_err());
        assert!(zip_code("123 45").is_ok());
        assert!(zip_code("12").is_err());
        assert!(country("Sweden").is_ok());
        assert!(country(&"C".repeat(51)).is_err());
    }

    #[test]
    fn test_product_fields() {
        assert_eq!(product_name("Widget").unwrap(), "Widget");
        assert!(product_name("W").is_err());
        assert!(product_name(&"W".repeat(16)).is_err());

        assert_eq!(unit_price("9,99").unwrap().cents(), 999);
        assert!(unit_price("").is_err());
        assert!(unit_price("abc").is_err());
        assert!(unit_price("0.00").is_err());
        assert_eq!(unit_price("1000000").unwrap(), UNIT_PRICE_MAX);
        assert_eq!(
            unit_price("90000000000000000"),
            Err(ValidationError::too_large("Unit price", "1000000.00"))
        );

        assert_eq!(stock("0").unwrap(), 0);
        assert_eq!(stock("10").unwrap(), 10);
        assert!(stock("-1").is_err());
        assert!(stock("2.5").is_err());
        assert_eq!(stock("1000000").unwrap(), STOCK_MAX);
        assert!(stock("1000001").is_err());
    }

    #[test]
    fn test_record_ids() {
        assert_eq!(record_id("Customer ID", "42").unwrap(), 42);
        assert!(record_id("Customer ID", "0").is_err());
        assert!(record_id("Customer ID", "-3").is_err());
        assert!(record_id("Customer ID", "abc").is_err());

        assert_eq!(optional_record_id("Product ID", "  ").unwrap(), None);
        assert_eq!(optional_record_id("Product ID", "7").unwrap(), Some(7));
        assert!(optional_record_id("Product ID", "x").is_err());
    }

    #[test]
    fn test_order_date() {
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(order_date("", now).unwrap(), now);
        assert_eq!(
            order_date("2024-01-31", now).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap()
        );
        assert!(order_date("2024-02-30", now).is_err());
        assert!(order_date("31/01/2024", now).is_err());
    }

    #[test]
    fn test_order_status() {
        assert_eq!(order_status("").unwrap(), OrderStatus::Created);
        assert_eq!(order_status("paid").unwrap(), OrderStatus::Paid);
        assert!(order_status("lost").is_err());
    }

    #[test]
    fn test_item_fields() {
        assert_eq!(description("").unwrap(), None);
        assert_eq!(description(" Gift wrap ").unwrap().as_deref(), Some("Gift wrap"));
        assert!(description(&"d".repeat(26)).is_err());

        assert_eq!(quantity("3").unwrap(), 3);
        assert!(quantity("0").is_err());
        assert!(quantity("three").is_err());
        assert_eq!(quantity("100000").unwrap(), QUANTITY_MAX);
        assert_eq!(
            quantity("100001"),
            Err(ValidationError::too_large("Quantity", 100_000))
        );
    }

    #[test]
    fn test_item_reference() {
        assert!(item_reference(Some(1), None).is_ok());
        assert!(item_reference(None, Some("Shipping")).is_ok());
        assert_eq!(item_reference(None, Some("  ")), Err(CoreError::MissingItemReference));
        assert_eq!(item_reference(None, None), Err(CoreError::MissingItemReference));
    }

    #[test]
    fn test_stock_available() {
        assert!(stock_available(1, 10, 10).is_ok());
        assert_eq!(stock_available(1, 0, 1), Err(CoreError::OutOfStock { product_id: 1 }));
        assert!(matches!(
            stock_available(1, 2, 3),
            Err(CoreError::InsufficientStock { available: 2, requested: 3, .. })
        ));
    }

    #[test]
    fn test_yes_no() {
        assert!(yes_no("y"));
        assert!(yes_no(" YES "));
        assert!(!yes_no("n"));
        assert!(!yes_no(""));
    }
}
