//! One module per subcommand, each exposing `execute`.

pub mod check;
pub mod completions;
#[cfg(feature = "audit-log")]
pub mod history;
pub mod list;
pub mod new;
pub mod show;
