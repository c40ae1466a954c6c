use crate::stmt::Document;

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Number of documents impacted by a write
    Count(u64),

    /// Result of a lookup
    Document(Option<Document>),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self::Count(count)
    }

    pub fn document(document: Option<Document>) -> Self {
        Self::Document(document)
    }

    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    /// Extracts the looked-up document, failing if the driver answered a
    /// lookup with a count.
    pub fn into_document(self) -> crate::Result<Option<Document>> {
        match self {
            Response::Document(document) => Ok(document),
            Response::Count(count) => {
                crate::bail!("expected a document response, driver returned count={count}")
            }
        }
    }
}
