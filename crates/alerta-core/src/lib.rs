// Domain types for the emergency record service
//
// DB-agnostic entity types shared by the storage and API crates.

pub mod emergency;

pub use emergency::Emergency;
