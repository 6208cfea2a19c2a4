//! Pieces shared by every crate in the workspace: wire types that are not
//! tied to a single domain, and tracing initialisation.

pub mod types;
pub mod utils;
