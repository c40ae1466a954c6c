use super::{connect, Db, IdStrategy, Ids};
use crate::engine::UnitOfWork;

use sheaf_core::{
    schema::{self, ModelDef},
    Driver, Result, Schema,
};

use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    /// Schema builder
    core: schema::Builder,

    id_strategy: IdStrategy,
}

impl Builder {
    pub fn register(&mut self, model: ModelDef) -> &mut Self {
        self.core.model(model);
        self
    }

    /// Set how identities are generated for documents persisted without one
    pub fn id_strategy(&mut self, strategy: IdStrategy) -> &mut Self {
        self.id_strategy = strategy;
        self
    }

    pub fn build_schema(&self) -> Result<Schema> {
        self.core.build()
    }

    /// Opens a session on the driver named by `url`, e.g. `memory://`.
    pub async fn connect(&mut self, url: &str) -> Result<Db> {
        self.build_boxed(connect::connect(url)?).await
    }

    pub async fn build(&mut self, driver: impl Driver) -> Result<Db> {
        self.build_boxed(Box::new(driver)).await
    }

    async fn build_boxed(&mut self, mut driver: Box<dyn Driver>) -> Result<Db> {
        let schema = Arc::new(self.build_schema()?);

        driver.register_schema(&schema).await?;

        tracing::debug!(
            models = schema.models.len(),
            id_strategy = ?self.id_strategy,
            "session opened"
        );

        Ok(Db {
            driver: Arc::from(driver),
            ids: Ids::new(self.id_strategy),
            uow: UnitOfWork::new(schema),
        })
    }
}
