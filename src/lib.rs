pub mod catalog;
pub mod commands;
pub mod document;
pub mod error;
pub mod logging;
pub mod options;
pub mod paths;
pub mod prompt;
pub mod resolve;
pub mod selection;
pub mod store;
pub mod ui;
pub mod values;

#[cfg(test)]
pub mod test_utils;
