pub mod aggregate;
pub mod charts;
pub mod clean;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod records;
