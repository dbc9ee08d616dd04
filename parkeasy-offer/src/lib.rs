pub mod book;
pub mod generator;
pub mod models;

pub use book::QuoteBook;
pub use generator::{QuoteError, QuoteGenerator};
pub use models::{Quote, QuoteStatus};
