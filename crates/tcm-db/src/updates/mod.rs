//! Partial-update types for PATCH requests and edit forms.
//!
//! Only `Some` fields generate SET clauses in the dynamic UPDATE SQL.
//! Nullable columns use `Option<Option<T>>`: `Some(None)` clears the value.
//! For required columns an explicit JSON `null` is treated as absent.

pub mod project;
pub mod tag;
pub mod testcase;
