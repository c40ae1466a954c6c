//! Document values exchanged between the unit of work and drivers.

mod document;
pub use document::Document;

mod id;
pub use id::Id;

mod value;
pub use value::Value;
