pub mod models;
pub mod parser;
pub mod services;
pub mod csv;
pub mod errors;

pub use models::*;
pub use parser::*;
pub use services::*;
pub use self::csv::*;
pub use errors::*;
