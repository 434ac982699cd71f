pub mod acquisition;
pub mod operating;
pub mod region;
