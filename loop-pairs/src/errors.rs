use std::{error, fmt};

#[derive(Debug, Clone)]
pub struct SchemaError {
    table: String,
    missing: Vec<String>,
}

impl SchemaError {
    pub fn new(table: &str, missing: Vec<String>) -> SchemaError {
        SchemaError { table: String::from(table), missing }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "The {} is missing required columns: {}.", self.table, self.missing.join(", "))
    }
}

impl error::Error for SchemaError {}

#[derive(Debug, Clone)]
pub struct UnsupportedTableError {
    path: String,
}

impl UnsupportedTableError {
    pub fn new(path: &str) -> UnsupportedTableError {
        UnsupportedTableError { path: String::from(path) }
    }
}

impl fmt::Display for UnsupportedTableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Unsupported file extension for: {}.", self.path)
    }
}

impl error::Error for UnsupportedTableError {}

#[derive(Debug, Clone)]
pub struct TooFewColumnsError {
    expected: usize,
    found: usize,
}

impl TooFewColumnsError {
    pub fn new(expected: usize, found: usize) -> TooFewColumnsError {
        TooFewColumnsError { expected, found }
    }
}

impl fmt::Display for TooFewColumnsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "The loop table requires at least {} columns, got {}.", self.expected, self.found)
    }
}

impl error::Error for TooFewColumnsError {}
