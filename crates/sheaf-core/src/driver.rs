mod response;
pub use response::Response;

pub mod operation;
pub use operation::Operation;

use crate::{async_trait, schema::Schema};

use std::{fmt::Debug, sync::Arc};

/// The persistence collaborator behind a unit of work.
///
/// The unit of work decides *what* to write; the driver only executes
/// individual operations against its store and reports success or failure.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Register the schema with the driver.
    async fn register_schema(&mut self, _schema: &Schema) -> crate::Result<()> {
        Ok(())
    }

    /// Execute a single operation.
    ///
    /// `Insert` must behave as an upsert: a flush that failed partway is
    /// retried by submitting the same inserts again.
    async fn exec(&self, schema: &Arc<Schema>, op: Operation) -> crate::Result<Response>;

    /// Drop every stored document. Used by test setup.
    async fn reset_db(&self, schema: &Schema) -> crate::Result<()>;
}
