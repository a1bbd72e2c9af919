pub mod catalog;
pub mod issues;
