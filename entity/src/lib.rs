//! sea-orm entities backing the RetainIQ store.

pub mod employees;
