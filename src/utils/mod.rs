pub mod ip;
pub mod limits;
pub mod time;
