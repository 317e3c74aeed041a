//! Configuration structures and loading utilities.
//!
//! All tunable parameters are passed explicitly at construction; nothing in
//! the core reads ambient globals. Each struct also offers `from_env` for
//! hosts that configure through the environment.

pub mod alerts;
pub mod detection;
pub mod snapshot;

pub use alerts::*;
pub use detection::*;
pub use snapshot::*;
