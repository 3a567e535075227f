#![cfg(test)]

use std::cell::{Cell, RefCell};
use std::io::{self, Cursor, Read};
use std::rc::Rc;

use crate::process::{ChildProcess, Exit, Invocation, Pipe, Spawner};

/// What the fake child does once spawned.
#[derive(Clone)]
pub struct Script {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit: Exit,
    /// Fail the stdout read after `stdout` has been delivered.
    pub stdout_fails: bool,
}

impl Script {
    pub fn exits(code: i32) -> Self {
        Self {
            stdout: Vec::new(),
            stderr: Vec::new(),
            exit: Exit::Code(code),
            stdout_fails: false,
        }
    }

    pub fn stdout(mut self, bytes: &[u8]) -> Self {
        self.stdout = bytes.to_vec();
        self
    }

    pub fn stderr(mut self, bytes: &[u8]) -> Self {
        self.stderr = bytes.to_vec();
        self
    }

    pub fn stdout_fails(mut self) -> Self {
        self.stdout_fails = true;
        self
    }
}

/// A spawner that never starts a real process. It records every invocation
/// and counts how many children were reaped.
pub struct FakeSpawner {
    outcome: Result<Script, io::ErrorKind>,
    calls: RefCell<Vec<Invocation>>,
    reaped: Rc<Cell<usize>>,
    killed: Rc<Cell<usize>>,
}

impl FakeSpawner {
    pub fn new(script: Script) -> Self {
        Self::with_outcome(Ok(script))
    }

    pub fn failing(kind: io::ErrorKind) -> Self {
        Self::with_outcome(Err(kind))
    }

    fn with_outcome(outcome: Result<Script, io::ErrorKind>) -> Self {
        Self {
            outcome,
            calls: RefCell::new(Vec::new()),
            reaped: Rc::new(Cell::new(0)),
            killed: Rc::new(Cell::new(0)),
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub fn reaped(&self) -> usize {
        self.reaped.get()
    }

    pub fn killed(&self) -> usize {
        self.killed.get()
    }
}

impl Spawner for FakeSpawner {
    type Child = FakeChild;

    fn spawn(&self, invocation: &Invocation) -> io::Result<FakeChild> {
        self.calls.borrow_mut().push(invocation.clone());
        let script = match &self.outcome {
            Ok(script) => script.clone(),
            Err(kind) => return Err(io::Error::new(*kind, "scripted spawn failure")),
        };

        let stdout: Pipe = if script.stdout_fails {
            Box::new(Cursor::new(script.stdout).chain(FailingReader))
        } else {
            Box::new(Cursor::new(script.stdout))
        };

        Ok(FakeChild {
            stdout: Some(stdout),
            stderr: Some(Box::new(Cursor::new(script.stderr))),
            exit: script.exit,
            reaped: Rc::clone(&self.reaped),
            killed: Rc::clone(&self.killed),
        })
    }
}

pub struct FakeChild {
    stdout: Option<Pipe>,
    stderr: Option<Pipe>,
    exit: Exit,
    reaped: Rc<Cell<usize>>,
    killed: Rc<Cell<usize>>,
}

impl ChildProcess for FakeChild {
    fn take_stdout(&mut self) -> Option<Pipe> {
        self.stdout.take()
    }

    fn take_stderr(&mut self) -> Option<Pipe> {
        self.stderr.take()
    }

    fn wait(&mut self) -> io::Result<Exit> {
        self.reaped.set(self.reaped.get() + 1);
        Ok(self.exit)
    }

    fn kill(&mut self) -> io::Result<()> {
        self.killed.set(self.killed.get() + 1);
        Ok(())
    }
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stream reset"))
    }
}

/// A writer that rejects every write, like a console whose reader went away.
pub struct ClosedConsole;

impl io::Write for ClosedConsole {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "console closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
