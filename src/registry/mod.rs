pub mod descriptor;
pub mod table;
