use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Nutrient '{0}' is not part of the nutrient catalog")]
    UnknownNutrient(String),

    #[error("Nutrient '{0}' already exists")]
    NutrientExists(String),

    #[error("Nutrient '{0}' is built in and cannot be removed")]
    BuiltinNutrient(String),

    #[error("Nutrient '{0}' was not found")]
    NutrientNotFound(String),
}
