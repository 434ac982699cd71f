pub mod long_term;
