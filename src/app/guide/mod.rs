pub mod catalog;
pub mod steps;
pub mod walkthrough;
