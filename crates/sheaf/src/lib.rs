mod collection;
pub use collection::Collection;

pub mod db;
pub use db::Db;

mod engine;
pub use engine::{FlushResult, State};

mod key;
pub use key::Key;

pub use sheaf_core::{
    driver,
    schema::{self, ModelDef, ReferenceDef},
    stmt::{Document, Id, Value},
    Error, Result, Schema,
};
