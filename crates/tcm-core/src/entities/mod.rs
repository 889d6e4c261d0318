//! Entity structs for the three TCM domain objects, plus the inputs used to
//! create them.
//!
//! Persisted entities derive `Serialize`, `Deserialize` and `JsonSchema` so the
//! JSON API can return them directly and tests can validate their shape.

mod project;
mod tag;
mod testcase;

pub use project::{NewProject, Project};
pub use tag::{NewTag, Tag};
pub use testcase::{NewTestCase, TestCase};
