pub mod loan_sizing;
pub mod scoring;
