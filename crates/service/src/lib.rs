//! Service layer providing resource operations on top of models.
//! - Validates inputs at the boundary and reports typed errors.
//! - Repositories isolate the document-store driver; an in-memory
//!   implementation backs isolated tests.

pub mod errors;
pub mod memory;
pub mod order;
pub mod product;
