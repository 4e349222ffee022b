//! Persistence module split across logical submodules.

mod connection;
mod contacts;

pub use connection::{
    data_dir, db_path, ensure_schema, open_database, SchemaError, DATA_DIR_NAME, SCHEMA_VERSION,
};
pub use contacts::{fetch_contacts, upsert_contact};
