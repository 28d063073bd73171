pub mod book;
pub mod cli_args;
pub mod error;
mod extractor;
pub mod import;
mod middleware;
mod openapi;
mod route;
pub mod server;
mod state;
pub mod store;
pub mod traits;
mod utils;
