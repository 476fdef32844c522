pub mod records;
pub mod table;
