//! Presence and format checks run before any write. Order matters: the owner
//! and category check always reports first, the phone check second.

use crate::config::PHONE_LEN;
use crate::error::ValidationError;
use crate::models::{NewLead, PropertyType, StockItem};

/// Raw text captured by the add form, untrimmed.
#[derive(Debug, Clone, Default)]
pub struct LeadInput {
    pub category: String,
    pub property_type: PropertyType,
    pub project_name: String,
    pub address: String,
    pub area: String,
    pub phone_number: String,
    pub owner_name: String,
    pub price: String,
    pub cheque: String,
    pub size: String,
    pub comments: String,
}

/// True for exactly ten ASCII digits.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == PHONE_LEN && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Validate the add form and return the trimmed record ready for insertion.
pub fn validate_lead(input: &LeadInput) -> Result<NewLead, ValidationError> {
    let owner_name = input.owner_name.trim();
    let category = input.category.trim();
    if owner_name.is_empty() || category.is_empty() {
        return Err(ValidationError::MissingOwnerOrCategory);
    }

    let phone_number = input.phone_number.trim();
    if !is_valid_phone(phone_number) {
        return Err(ValidationError::InvalidPhone);
    }

    Ok(NewLead {
        category: category.to_string(),
        property_type: input.property_type,
        project_name: input.project_name.trim().to_string(),
        address: input.address.trim().to_string(),
        area: input.area.trim().to_string(),
        phone_number: phone_number.to_string(),
        owner_name: owner_name.to_string(),
        price: input.price.trim().to_string(),
        cheque: input.cheque.trim().to_string(),
        size: input.size.trim().to_string(),
        comments: input.comments.trim().to_string(),
    })
}

/// Validate the stock add form. Blank numbers count as zero.
pub fn validate_stock_item(
    name: &str,
    category: &str,
    quantity: &str,
    price: &str,
) -> Result<StockItem, ValidationError> {
    let name = name.trim();
    let category = category.trim();
    if name.is_empty() || category.is_empty() {
        return Err(ValidationError::MissingItemOrCategory);
    }
    Ok(StockItem {
        name: name.to_string(),
        category: category.to_string(),
        quantity: parse_quantity(quantity)?,
        price: parse_price(price)?,
    })
}

pub fn parse_quantity(raw: &str) -> Result<u64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse()
        .map_err(|_| ValidationError::InvalidNumber { field: "Quantity" })
}

pub fn parse_price(raw: &str) -> Result<f64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ValidationError::InvalidNumber { field: "Price" }),
    }
}
