use thiserror::Error;

/// Message shown for any client-side validation failure.
pub const INVALID_INPUT_MESSAGE: &str = "Please provide a valid name and price.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Price,
}

/// Local form check failed; no request was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", INVALID_INPUT_MESSAGE)]
pub struct ClientValidationError {
    pub fields: Vec<Field>,
}

/// Draft input that passed validation, ready to submit.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidInput {
    pub name: String,
    pub price: f64,
}

/// Checks the raw form fields.
///
/// `name` must be non-empty after trimming and `price` must parse to a
/// finite number greater than zero.
///
/// # Errors
///
/// Returns [`ClientValidationError`] listing every offending field.
pub fn validate(name: &str, price: &str) -> Result<ValidInput, ClientValidationError> {
    let name = name.trim();
    let parsed = price
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p > 0.0);

    let mut fields = Vec::new();
    if name.is_empty() {
        fields.push(Field::Name);
    }
    if parsed.is_none() {
        fields.push(Field::Price);
    }

    match parsed {
        Some(price) if fields.is_empty() => Ok(ValidInput {
            name: name.to_owned(),
            price,
        }),
        _ => Err(ClientValidationError { fields }),
    }
}
