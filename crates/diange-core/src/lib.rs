pub mod domain;
pub mod errors;
pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;

pub use errors::CoreError;
