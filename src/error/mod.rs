mod config;
mod inventory;
mod io;

pub use config::ConfigError;
pub use inventory::InventoryError;
pub use io::{read_to_string, IoError};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

pub type Result<T> = std::result::Result<T, Error>;
