use super::{
    changes::{self, ChangeSet},
    orphan, State, UnitOfWork,
};
use crate::Key;

use indexmap::IndexSet;
use sheaf_core::{
    driver::{
        operation::{Delete, Insert, Update},
        Operation,
    },
    Driver, Error, Result,
};
use tracing::{debug, info, warn};

/// What a successful flush wrote.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FlushResult {
    /// Documents inserted, in registration order
    pub inserted: Vec<Key>,

    /// Documents updated, in registration order
    pub updated: Vec<Key>,

    /// Every deleted document: explicit removals first, then orphans
    pub deleted: Vec<Key>,

    /// The subset of `deleted` that was deleted as orphans
    pub orphaned: Vec<Key>,
}

impl FlushResult {
    /// Returns `true` if the flush wrote nothing.
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}

/// Writes the pending changes of `uow` through `driver`.
///
/// Inserts are submitted first, then updates, then deletions. Each operation
/// is awaited before the next one is submitted. Baselines are only moved
/// forward once the driver acknowledged every operation; when an operation
/// fails the unit of work is left as it was and the same flush can be
/// retried.
#[tracing::instrument(name = "flush", skip_all, fields(documents = uow.len()))]
pub(crate) async fn flush(uow: &mut UnitOfWork, driver: &dyn Driver) -> Result<FlushResult> {
    let (changes, orphans) = plan(uow);

    if changes.is_empty() {
        debug!("nothing to flush");
        return Ok(FlushResult::default());
    }

    let mut deletes: IndexSet<Key> = changes.removals.iter().cloned().collect();
    deletes.extend(orphans.iter().cloned());

    let mut operations = Vec::with_capacity(
        changes.inserts.len() + changes.updates.len() + deletes.len(),
    );

    for key in &changes.inserts {
        operations.push(Operation::Insert(Insert {
            model: key.model,
            document: uow.materialize(key)?,
        }));
    }

    for (key, changed) in &changes.updates {
        operations.push(Operation::Update(Update {
            model: key.model,
            document: uow.materialize(key)?,
            changed: changed.clone(),
        }));
    }

    for key in &deletes {
        operations.push(Operation::Delete(Delete {
            model: key.model,
            id: key.id.clone(),
        }));
    }

    for (acknowledged, operation) in operations.into_iter().enumerate() {
        let description = operation.describe(&uow.schema);
        debug!(operation = %description, "submitting");

        if let Err(err) = driver.exec(&uow.schema, operation).await {
            warn!(operation = %description, acknowledged, error = %err, "flush aborted");
            return Err(err.context(Error::persistence_failure(description, acknowledged)));
        }
    }

    // Every operation was acknowledged; nothing below awaits.
    for key in &changes.inserts {
        uow.commit(key);
    }

    for (key, _) in &changes.updates {
        uow.commit(key);
    }

    for key in &deletes {
        uow.forget(key);
    }

    let result = FlushResult {
        inserted: changes.inserts,
        updated: changes.updates.into_iter().map(|(key, _)| key).collect(),
        deleted: deletes.into_iter().collect(),
        orphaned: orphans.into_iter().collect(),
    };

    info!(
        inserted = result.inserted.len(),
        updated = result.updated.len(),
        deleted = result.deleted.len(),
        orphaned = result.orphaned.len(),
        "flush complete"
    );

    Ok(result)
}

/// Computes the change set and its orphans.
///
/// A managed orphan is deleted like a removed owner, so its own baseline
/// targets are detached as well. The change set is recomputed until no new
/// managed orphan shows up.
fn plan(uow: &UnitOfWork) -> (ChangeSet, IndexSet<Key>) {
    let mut cascaded = IndexSet::new();

    loop {
        let changes = changes::compute(&uow.schema, &uow.registry, &uow.tracker, &cascaded);
        let orphans = orphan::schedule(&uow.schema, &changes);

        let before = cascaded.len();
        cascaded.extend(
            orphans
                .iter()
                .filter(|key| uow.state(key) == Some(State::Managed))
                .cloned(),
        );

        if cascaded.len() == before {
            return (changes, orphans);
        }

        debug!(orphans = cascaded.len(), "cascading orphan removal");
    }
}
