use thiserror::Error;

/// Validation failures raised while constructing or updating model types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("{field} must be between {min} and {max} characters")]
    LengthOutOfRange {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("price must be greater than 0 and at most 999999.99")]
    PriceOutOfRange,

    #[error("price must have at most 2 decimal places")]
    PricePrecision,

    #[error("an item may reference at most {max} media entries")]
    TooManyMedia { max: usize },

    #[error("invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
