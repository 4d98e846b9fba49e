pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod scrapers;
pub mod utilities;

#[cfg(test)]
mod test_utilities;
