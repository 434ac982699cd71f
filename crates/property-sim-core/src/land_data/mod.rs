pub mod matching;
pub mod table;
