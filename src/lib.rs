//! Core implementation of the devsh command dispatcher
//!
//! devsh is the entry point of a developer shell environment. It prints a banner,
//! renders the quickstart guide, opens the developer's guide and forwards
//! `devsh exec <command>` to extension executables named `devsh-<command>`.
//! Every action is a direct invocation of other installed programs; a failing
//! child is fatal and its exit status becomes devsh's own.

use std::io::Write;

use crate::config::Config;
use crate::dispatch::{Action, DispatchError, Dispatcher};
use crate::process::Runner;

pub mod config;
pub mod dispatch;
pub mod extensions;
pub mod logger;
pub mod process;

/// Run one action with the given runner, writing any direct output to `out`.
///
/// # Errors
///
/// Returns `DispatchError` if an external program fails or output cannot be written.
pub fn run<R: Runner, W: Write>(
    config: &Config,
    runner: R,
    out: W,
    action: &Action,
) -> Result<(), DispatchError> {
    Dispatcher::new(config, runner, out).dispatch(action)
}
