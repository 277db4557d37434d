pub mod ping;
pub mod resolver;
