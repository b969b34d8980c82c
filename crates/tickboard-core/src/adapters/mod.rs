//! Price source implementations.

mod synthetic;
mod yahoo;

pub use synthetic::SyntheticSource;
pub use yahoo::YahooAdapter;
