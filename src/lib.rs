pub mod cli;
pub mod config;
pub mod emit;
pub mod generate;
pub mod model;
pub mod output;
pub mod reactor;
pub mod resolver;
pub mod scope;

mod api;

pub use api::{ClasspathGen, ClasspathGenBuilder};
