//! External command execution for the release pipelines.
//!
//! Every step of the package and image pipelines is an invocation of some
//! third-party tool. This crate describes those invocations as
//! [`CommandSpec`] values and runs them through the [`CommandRunner`] seam,
//! so the pipelines can be exercised against recording stubs and printed in
//! dry-run mode without touching the real tools.

pub mod command;
pub mod dry_run;
pub mod provider;
pub mod system;

pub use command::{shell_quote, CommandSpec};
pub use dry_run::DryRunRunner;
pub use provider::{CommandRunner, RunnerError, RunnerResult};
pub use system::SystemRunner;

pub mod prelude {
    pub use crate::command::*;
    pub use crate::dry_run::*;
    pub use crate::provider::*;
    pub use crate::system::*;
}
