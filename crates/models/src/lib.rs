pub mod db;
pub mod dish;
pub mod errors;
pub mod menu;
pub mod restaurant;
