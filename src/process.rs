//! Launching external programs with inherited stdio

use std::fmt;
use std::io;
use std::process::{Command as ProcessCommand, ExitStatus, Stdio};

use log::debug;
use thiserror::Error;

/// Errors that can occur while running an external program
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` exited with status {code}")]
    Exit { program: String, code: i32 },
    #[error("`{program}` was terminated by signal {signal}")]
    Signal { program: String, signal: i32 },
}

impl ProcessError {
    /// Exit status the dispatcher should report for this failure.
    ///
    /// Child exit codes are passed through; launch failures follow the shell
    /// convention of 127 (not found) and 126 (not executable).
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            ProcessError::Launch { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => 127,
                io::ErrorKind::PermissionDenied => 126,
                _ => 1,
            },
            ProcessError::Exit { code, .. } => {
                u8::try_from(*code).ok().filter(|c| *c != 0).unwrap_or(1)
            }
            ProcessError::Signal { signal, .. } => u8::try_from(128 + signal).unwrap_or(1),
        }
    }
}

/// What the child sees on its standard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdinPolicy {
    Inherit,
    Null,
}

/// A single external program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: StdinPolicy,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            stdin: StdinPolicy::Inherit,
        }
    }

    #[must_use]
    pub fn stdin(mut self, stdin: StdinPolicy) -> Self {
        self.stdin = stdin;
        self
    }

    fn command(&self) -> ProcessCommand {
        let mut command = ProcessCommand::new(&self.program);
        command.args(&self.args);
        command.stdin(match self.stdin {
            StdinPolicy::Inherit => Stdio::inherit(),
            StdinPolicy::Null => Stdio::null(),
        });
        command
    }

    fn launch_error(&self, source: io::Error) -> ProcessError {
        ProcessError::Launch {
            program: self.program.clone(),
            source,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Capability to run external programs
pub trait Runner {
    /// Run one program to completion.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError` if the program fails to launch or exits unsuccessfully.
    fn run(&mut self, invocation: &Invocation) -> Result<(), ProcessError>;

    /// Run `producer | consumer`, waiting for both.
    ///
    /// # Errors
    ///
    /// Returns the consumer's failure if it has one, otherwise the producer's.
    fn pipe(
        &mut self,
        producer: &Invocation,
        consumer: &Invocation,
    ) -> Result<(), ProcessError>;
}

impl<R: Runner + ?Sized> Runner for &mut R {
    fn run(&mut self, invocation: &Invocation) -> Result<(), ProcessError> {
        (**self).run(invocation)
    }

    fn pipe(
        &mut self,
        producer: &Invocation,
        consumer: &Invocation,
    ) -> Result<(), ProcessError> {
        (**self).pipe(producer, consumer)
    }
}

/// Runs programs as real child processes
#[derive(Debug, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<(), ProcessError> {
        debug!("Running `{invocation}`");
        let status = invocation
            .command()
            .status()
            .map_err(|e| invocation.launch_error(e))?;
        check_status(&invocation.program, status)
    }

    fn pipe(
        &mut self,
        producer: &Invocation,
        consumer: &Invocation,
    ) -> Result<(), ProcessError> {
        debug!("Running `{producer} | {consumer}`");
        let mut first = producer
            .command()
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| producer.launch_error(e))?;
        let output = first.stdout.take().ok_or_else(|| {
            producer.launch_error(io::Error::other("stdout was not captured"))
        })?;

        // The read end is dropped with the consumer's command, so the producer
        // cannot block on a full pipe if the consumer never starts.
        let second = consumer.command().stdin(Stdio::from(output)).status();
        let first = first.wait().map_err(|e| producer.launch_error(e))?;

        check_status(
            &consumer.program,
            second.map_err(|e| consumer.launch_error(e))?,
        )?;
        check_status(&producer.program, first)
    }
}

/// Translate an exit status into a result.
///
/// # Errors
///
/// Returns `ProcessError::Exit` or `ProcessError::Signal` for unsuccessful statuses.
pub fn check_status(program: &str, status: ExitStatus) -> Result<(), ProcessError> {
    if status.success() {
        return Ok(());
    }
    if let Some(code) = status.code() {
        return Err(ProcessError::Exit {
            program: program.to_string(),
            code,
        });
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Err(ProcessError::Signal {
                program: program.to_string(),
                signal,
            });
        }
    }
    Err(ProcessError::Exit {
        program: program.to_string(),
        code: 1,
    })
}
