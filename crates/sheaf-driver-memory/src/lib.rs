use indexmap::IndexMap;
use sheaf_core::{
    async_trait, bail,
    driver::{Driver, Operation, Response},
    schema::ModelId,
    stmt::{Document, Id},
    Error, Result, Schema,
};

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// A driver that keeps documents in process memory.
///
/// Cloning yields another handle to the same store, so a test can keep one
/// handle for inspection while a `Db` owns the other.
#[derive(Clone, Default)]
pub struct Memory {
    shared: Arc<Shared>,
}

#[derive(Default)]
struct Shared {
    documents: Mutex<IndexMap<(ModelId, Id), Document>>,

    /// Armed failures; each one fails the first operation it matches.
    faults: Mutex<Vec<Fault>>,
}

type Fault = Box<dyn Fn(&Operation) -> bool + Send + Sync>;

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the next operation matching `predicate` with a driver error.
    pub fn fail_next(&self, predicate: impl Fn(&Operation) -> bool + Send + Sync + 'static) {
        lock(&self.shared.faults).push(Box::new(predicate));
    }

    /// Stores `document` directly, as if it had been written by an earlier
    /// session.
    pub fn seed(&self, model: ModelId, document: Document) -> Result<()> {
        let Some(id) = document.id().cloned() else {
            bail!("cannot seed a `{}` document without an identity", document.model());
        };
        lock(&self.shared.documents).insert((model, id), document);
        Ok(())
    }

    pub fn get(&self, model: ModelId, id: &Id) -> Option<Document> {
        lock(&self.shared.documents)
            .get(&(model, id.clone()))
            .cloned()
    }

    pub fn contains(&self, model: ModelId, id: &Id) -> bool {
        lock(&self.shared.documents).contains_key(&(model, id.clone()))
    }

    pub fn len(&self) -> usize {
        lock(&self.shared.documents).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take_fault(&self, op: &Operation) -> bool {
        let mut faults = lock(&self.shared.faults);
        match faults.iter().position(|fault| fault(op)) {
            Some(index) => {
                faults.remove(index);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl Driver for Memory {
    async fn exec(&self, schema: &Arc<Schema>, op: Operation) -> Result<Response> {
        tracing::trace!(operation = %op.describe(schema), "memory exec");

        if self.take_fault(&op) {
            return Err(Error::driver_operation_failed(InjectedFailure(
                op.describe(schema),
            )));
        }

        let mut documents = lock(&self.shared.documents);

        match op {
            Operation::Insert(op) => {
                let Some(id) = op.document.id().cloned() else {
                    bail!("insert into `{}` without an identity", schema.model(op.model).name);
                };
                documents.insert((op.model, id), op.document);
                Ok(Response::count(1))
            }
            Operation::Update(op) => {
                let Some(id) = op.document.id().cloned() else {
                    bail!("update of `{}` without an identity", schema.model(op.model).name);
                };
                let Some(stored) = documents.get_mut(&(op.model, id)) else {
                    return Ok(Response::count(0));
                };

                for field in &op.changed {
                    match op.document.get(field) {
                        Some(value) => {
                            stored.set(field.clone(), value.clone());
                        }
                        None => {
                            stored.remove(field);
                        }
                    }
                }

                Ok(Response::count(1))
            }
            Operation::Delete(op) => {
                let removed = documents.shift_remove(&(op.model, op.id)).is_some();
                Ok(Response::count(removed.into()))
            }
            Operation::FindById(op) => Ok(Response::document(
                documents.get(&(op.model, op.id)).cloned(),
            )),
        }
    }

    async fn reset_db(&self, _schema: &Schema) -> Result<()> {
        lock(&self.shared.documents).clear();
        Ok(())
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory")
            .field("documents", &self.len())
            .field("faults", &lock(&self.shared.faults).len())
            .finish()
    }
}

/// Error returned for an operation matched by [`Memory::fail_next`].
#[derive(Debug)]
struct InjectedFailure(String);

impl std::error::Error for InjectedFailure {}

impl fmt::Display for InjectedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "injected failure on `{}`", self.0)
    }
}

// A panic while holding the lock leaves the map itself consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
