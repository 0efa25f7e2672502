// Library crate: the object list model and the headless pieces it reads from.
// The `objects-list` binary is a thin CLI on top of `harness` and `command`.

pub mod command;
pub mod fixtures;
pub mod harness;
pub mod i18n;
pub mod objects;
pub mod preferences;
pub mod scene;
pub mod selection;
pub mod signal;

pub use objects::{ObjectEntry, ObjectsModel};
