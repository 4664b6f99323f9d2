//! Mapping subcommands to external program invocations

use std::io::{self, Write};

use log::{debug, info};
use thiserror::Error;

use crate::config::Config;
use crate::extensions;
use crate::process::{Invocation, ProcessError, Runner, StdinPolicy};

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl DispatchError {
    /// Exit status to report to the calling shell
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            DispatchError::Process(e) => e.exit_code(),
            DispatchError::Output(_) => 1,
        }
    }
}

/// A built-in devsh command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Banner,
    Quickstart,
    Welcome,
    Guide,
    /// Extension command name followed by its arguments; empty lists extensions
    Exec(Vec<String>),
}

/// Runs actions against a configuration, sending external calls through a [`Runner`]
pub struct Dispatcher<'a, R, W> {
    config: &'a Config,
    runner: R,
    out: W,
}

impl<'a, R: Runner, W: Write> Dispatcher<'a, R, W> {
    pub fn new(config: &'a Config, runner: R, out: W) -> Self {
        Self {
            config,
            runner,
            out,
        }
    }

    /// Run a single action to completion.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Process` on the first external program failure,
    /// or `DispatchError::Output` if the extension listing cannot be written.
    pub fn dispatch(&mut self, action: &Action) -> Result<(), DispatchError> {
        debug!("Dispatching {action:?}");
        match action {
            Action::Banner => self.banner(),
            Action::Quickstart => self.quickstart(),
            Action::Welcome => self.welcome(),
            Action::Guide => self.guide(),
            Action::Exec(args) => self.exec(args),
        }
    }

    fn banner(&mut self) -> Result<(), DispatchError> {
        let tools = &self.config.tools;
        let figlet = Invocation::new(&tools.figlet, ["-c", "-t", self.config.name.as_str()]);
        let lolcat = Invocation::new(&tools.lolcat, ["-S", "20", "-p", "1", "-F", "0.02"]);
        self.runner.pipe(&figlet, &lolcat)?;
        Ok(())
    }

    fn quickstart(&mut self) -> Result<(), DispatchError> {
        let quickstart = self.config.quickstart.display().to_string();
        self.runner
            .run(&Invocation::new(&self.config.tools.render, [quickstart]))?;
        Ok(())
    }

    fn welcome(&mut self) -> Result<(), DispatchError> {
        self.banner()?;
        self.quickstart()
    }

    fn guide(&mut self) -> Result<(), DispatchError> {
        let index = self.config.guide_index().display().to_string();
        info!("Opening developer's guide at {index}");
        let open = Invocation::new(&self.config.tools.opener, [index]).stdin(StdinPolicy::Null);
        self.runner.run(&open)?;
        Ok(())
    }

    fn exec(&mut self, args: &[String]) -> Result<(), DispatchError> {
        let Some((command, rest)) = args.split_first() else {
            self.out
                .write_all(self.config.extensions.render().as_bytes())?;
            self.out.flush()?;
            return Ok(());
        };
        let program = extensions::program_name(command);
        debug!("Resolved extension '{command}' to `{program}`");
        self.runner
            .run(&Invocation::new(program, rest.iter().cloned()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::Tools;
    use crate::extensions::ExtensionListing;

    #[derive(Debug, PartialEq, Eq)]
    enum Call {
        Run(Invocation),
        Pipe(Invocation, Invocation),
    }

    /// Records invocations instead of launching them, failing the named program
    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        fail: Option<(String, i32)>,
    }

    impl Recorder {
        fn failing(program: &str, code: i32) -> Self {
            Self {
                calls: Vec::new(),
                fail: Some((program.to_string(), code)),
            }
        }

        fn check(&self, invocation: &Invocation) -> Result<(), ProcessError> {
            match &self.fail {
                Some((program, code)) if *program == invocation.program => {
                    Err(ProcessError::Exit {
                        program: program.clone(),
                        code: *code,
                    })
                }
                _ => Ok(()),
            }
        }
    }

    impl Runner for Recorder {
        fn run(&mut self, invocation: &Invocation) -> Result<(), ProcessError> {
            self.calls.push(Call::Run(invocation.clone()));
            self.check(invocation)
        }

        fn pipe(
            &mut self,
            producer: &Invocation,
            consumer: &Invocation,
        ) -> Result<(), ProcessError> {
            self.calls
                .push(Call::Pipe(producer.clone(), consumer.clone()));
            self.check(consumer)?;
            self.check(producer)
        }
    }

    fn config(listing: &str) -> Config {
        Config {
            name: "Acme".to_string(),
            docs_dir: PathBuf::from("/opt/docs"),
            quickstart: PathBuf::from("/opt/docs/QUICKSTART.md"),
            extensions: ExtensionListing::new(listing),
            tools: Tools::default(),
        }
    }

    fn dispatch(
        config: &Config,
        runner: &mut Recorder,
        action: &Action,
    ) -> (Result<(), DispatchError>, String) {
        let mut out = Vec::new();
        let result = Dispatcher::new(config, &mut *runner, &mut out).dispatch(action);
        (result, String::from_utf8(out).unwrap())
    }

    fn banner_call() -> Call {
        Call::Pipe(
            Invocation::new("figlet", ["-c", "-t", "Acme"]),
            Invocation::new("lolcat", ["-S", "20", "-p", "1", "-F", "0.02"]),
        )
    }

    fn quickstart_call() -> Call {
        Call::Run(Invocation::new("rich", ["/opt/docs/QUICKSTART.md"]))
    }

    #[test]
    fn test_banner() {
        let config = config("");
        let mut runner = Recorder::default();
        let (result, _) = dispatch(&config, &mut runner, &Action::Banner);
        assert!(result.is_ok());
        assert_eq!(runner.calls, vec![banner_call()]);
    }

    #[test]
    fn test_welcome_runs_banner_then_quickstart() {
        let config = config("");
        let mut runner = Recorder::default();
        let (result, _) = dispatch(&config, &mut runner, &Action::Welcome);
        assert!(result.is_ok());
        assert_eq!(runner.calls, vec![banner_call(), quickstart_call()]);
    }

    #[test]
    fn test_welcome_stops_after_banner_failure() {
        let config = config("");
        let mut runner = Recorder::failing("lolcat", 2);
        let (result, _) = dispatch(&config, &mut runner, &Action::Welcome);
        assert_eq!(result.unwrap_err().exit_code(), 2);
        assert_eq!(runner.calls, vec![banner_call()]);
    }

    #[test]
    fn test_guide_opens_index() {
        let config = config("");
        let mut runner = Recorder::default();
        let (result, _) = dispatch(&config, &mut runner, &Action::Guide);
        assert!(result.is_ok());
        assert_eq!(
            runner.calls,
            vec![Call::Run(
                Invocation::new("xdg-open", ["/opt/docs/guide/html/index.html"])
                    .stdin(StdinPolicy::Null)
            )]
        );
    }

    #[test]
    fn test_exec_without_args_prints_listing() {
        let config = config("fmt   format sources\n");
        let mut runner = Recorder::default();
        let (result, out) = dispatch(&config, &mut runner, &Action::Exec(vec![]));
        assert!(result.is_ok());
        assert!(runner.calls.is_empty());
        assert!(out.contains("fmt   format sources"));
        assert!(out.contains("devsh exec <command>"));
    }

    #[test]
    fn test_exec_without_args_empty_listing() {
        let config = config("\n");
        let mut runner = Recorder::default();
        let (result, out) = dispatch(&config, &mut runner, &Action::Exec(vec![]));
        assert!(result.is_ok());
        assert!(runner.calls.is_empty());
        assert_eq!(out, "");
    }

    #[test]
    fn test_exec_forwards_args() {
        let config = config("");
        let mut runner = Recorder::default();
        let args = ["foo", "a", "--b", "c d"].map(String::from).to_vec();
        let (result, out) = dispatch(&config, &mut runner, &Action::Exec(args));
        assert!(result.is_ok());
        assert_eq!(out, "");
        assert_eq!(
            runner.calls,
            vec![Call::Run(Invocation::new("devsh-foo", ["a", "--b", "c d"]))]
        );
        let Call::Run(invocation) = &runner.calls[0] else {
            unreachable!()
        };
        assert_eq!(invocation.stdin, StdinPolicy::Inherit);
    }

    #[test]
    fn test_exec_propagates_exit_code() {
        let config = config("");
        let mut runner = Recorder::failing("devsh-foo", 42);
        let action = Action::Exec(vec!["foo".to_string()]);
        let (result, _) = dispatch(&config, &mut runner, &action);
        assert_eq!(result.unwrap_err().exit_code(), 42);
    }
}
