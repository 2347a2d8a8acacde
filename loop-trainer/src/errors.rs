use std::{error, fmt};

#[derive(Debug, Clone)]
pub struct EmptyTrainingError;

impl fmt::Display for EmptyTrainingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "The training split contains no rows.")
    }
}

impl error::Error for EmptyTrainingError {}

#[derive(Debug, Clone)]
pub struct FeatureContractError {
    expected: Vec<String>,
    found: Vec<String>,
}

impl FeatureContractError {
    pub fn new(expected: Vec<String>, found: Vec<String>) -> FeatureContractError {
        FeatureContractError { expected, found }
    }
}

impl fmt::Display for FeatureContractError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "The model feature columns do not match the pair feature contract: expected [{}], found [{}].",
            self.expected.join(", "),
            self.found.join(", ")
        )
    }
}

impl error::Error for FeatureContractError {}
