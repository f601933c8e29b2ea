mod args;
mod token;

pub use args::{parse, parse_configs};
