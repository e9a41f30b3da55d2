//! Domain documents and the persistence gateway.
//! - `product` / `order`: the two persisted document types plus their
//!   creation inputs and input validation.
//! - `store`: connection handle to the document store with typed
//!   collection accessors and index bootstrap.

pub mod errors;
pub mod order;
pub mod product;
pub mod store;
