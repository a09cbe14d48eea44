pub mod authoriser;
pub mod errors;
pub mod models;
pub mod password;
pub mod ports;
pub mod sections;
