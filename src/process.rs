use log::debug;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

/// A program plus its arguments and extra environment. Built once per call,
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: OsString,
    args: Vec<OsString>,
    envs: Vec<(OsString, OsString)>,
}

impl Invocation {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn envs(&self) -> &[(OsString, OsString)] {
        &self.envs
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.envs() {
            write!(f, "{}={} ", key.to_string_lossy(), value.to_string_lossy())?;
        }
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {:?}", arg)?;
        }
        Ok(())
    }
}

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Code(i32),
    Signal(i32),
}

impl Exit {
    pub fn success(self) -> bool {
        self == Exit::Code(0)
    }

    /// The code a shell would report: the exit code itself, or 128 + signal.
    pub fn code(self) -> i32 {
        match self {
            Exit::Code(code) => code,
            Exit::Signal(signal) => 128 + signal,
        }
    }
}

impl From<ExitStatus> for Exit {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Exit::Code(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Exit::Signal(signal);
            }
        }
        Exit::Code(1)
    }
}

impl fmt::Display for Exit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exit::Code(code) => write!(f, "exit code {}", code),
            Exit::Signal(signal) => write!(f, "signal {}", signal),
        }
    }
}

/// Everything a finished child produced.
#[derive(Debug)]
pub struct Captured {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit: Exit,
}

pub type Pipe = Box<dyn Read + Send>;

/// A running child whose stdout/stderr are readable pipes.
pub trait ChildProcess {
    fn take_stdout(&mut self) -> Option<Pipe>;
    fn take_stderr(&mut self) -> Option<Pipe>;
    /// Blocks until the child exits and reaps it.
    fn wait(&mut self) -> io::Result<Exit>;
    fn kill(&mut self) -> io::Result<()>;
}

/// Starts child processes. Abstracted so command logic can run against
/// scripted children in tests.
pub trait Spawner {
    type Child: ChildProcess;

    /// Spawns with stdout and stderr piped back to the caller.
    fn spawn(&self, invocation: &Invocation) -> io::Result<Self::Child>;

    /// Runs to completion and collects both streams.
    fn capture(&self, invocation: &Invocation) -> io::Result<Captured> {
        let mut child = self.spawn(invocation)?;
        let stderr = drain_in_background(child.take_stderr());
        let mut stdout = Vec::new();
        if let Some(mut pipe) = child.take_stdout() {
            if let Err(e) = pipe.read_to_end(&mut stdout) {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        }
        let exit = child.wait()?;
        Ok(Captured {
            stdout,
            stderr: stderr.join(),
            exit,
        })
    }
}

/// Reads a pipe to the end on a helper thread so the child never blocks on a
/// full stderr buffer while the caller is busy with stdout.
pub struct Drain(Option<JoinHandle<Vec<u8>>>);

pub fn drain_in_background(pipe: Option<Pipe>) -> Drain {
    Drain(pipe.map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            // whatever was read before an error is still worth reporting
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    }))
}

impl Drain {
    /// Waits for the reader thread. Returns empty when there was no pipe.
    pub fn join(self) -> Vec<u8> {
        self.0
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default()
    }
}

/// Spawns real processes via `std::process`, resolving the program on `PATH`.
pub struct SystemSpawner;

impl ChildProcess for std::process::Child {
    fn take_stdout(&mut self) -> Option<Pipe> {
        self.stdout.take().map(|p| Box::new(p) as Pipe)
    }

    fn take_stderr(&mut self) -> Option<Pipe> {
        self.stderr.take().map(|p| Box::new(p) as Pipe)
    }

    fn wait(&mut self) -> io::Result<Exit> {
        std::process::Child::wait(self).map(Exit::from)
    }

    fn kill(&mut self) -> io::Result<()> {
        std::process::Child::kill(self)
    }
}

impl Spawner for SystemSpawner {
    type Child = std::process::Child;

    fn spawn(&self, invocation: &Invocation) -> io::Result<Self::Child> {
        debug!("spawning {}", invocation);
        invocation
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
    }

    fn capture(&self, invocation: &Invocation) -> io::Result<Captured> {
        debug!("running {}", invocation);
        let output = invocation
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;
        Ok(Captured {
            stdout: output.stdout,
            stderr: output.stderr,
            exit: output.status.into(),
        })
    }
}
