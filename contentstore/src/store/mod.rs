//! Hierarchical template store
//!
//! Pure data structures: the record vocabulary and the three-level map with
//! its rendering function. No I/O happens here.

mod record;
mod templates;

pub use record::{ParamValue, SnapshotMap, TemplateParam, TemplateRecord};
pub use templates::TemplateStore;
