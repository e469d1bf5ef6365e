mod config;
mod get;
mod harvest;
mod search;
mod status;

pub use config::{ConfigCommand, handle_config};
pub use get::{GetArgs, handle_get};
pub use harvest::{HarvestArgs, handle_harvest};
pub use search::{SearchArgs, handle_search};
pub use status::handle_status;
