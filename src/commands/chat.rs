use log::debug;
use std::io::{BufReader, Write};

use crate::decode::Decoding;
use crate::error::OllamaError;
use crate::lines::TextLines;
use crate::ollama::Ollama;
use crate::process::{drain_in_background, ChildProcess, Spawner};

#[derive(Debug)]
pub struct ChatResult {
    pub lines: usize,
}

/// Runs `ollama run <model> <prompt>` and writes each stdout line to `console`
/// as soon as it is read. The child is always reaped before this returns.
pub fn cmd_chat<S: Spawner, W: Write>(
    spawner: &S,
    ollama: &Ollama,
    model: &str,
    prompt: &str,
    decoding: Decoding,
    console: &mut W,
) -> Result<ChatResult, OllamaError> {
    let invocation = ollama.run(model, prompt);
    let mut child = spawner
        .spawn(&invocation)
        .map_err(|e| OllamaError::from_spawn(invocation.program(), e))?;

    let stderr = drain_in_background(child.take_stderr());

    let streamed = match child.take_stdout() {
        Some(stdout) => forward_lines(TextLines::new(BufReader::new(stdout), decoding), console),
        None => Ok(0),
    };

    let lines = match streamed {
        Ok(lines) => lines,
        Err(e) => {
            debug!("streaming failed, stopping child: {}", e);
            let _ = child.kill();
            let _ = child.wait();
            let _ = stderr.join();
            return Err(e);
        }
    };

    let exit = child.wait()?;
    let stderr = stderr.join();
    debug!("{} finished with {} after {} lines", invocation, exit, lines);

    if !exit.success() {
        return Err(OllamaError::RunFailed {
            code: exit.code(),
            stderr: Decoding::Lossy.decode(stderr)?,
        });
    }

    Ok(ChatResult { lines })
}

/// Writes each line followed by `\n`, flushing after every line so output
/// shows up while the model is still generating. Stops at the first error.
pub fn forward_lines<I, W>(lines: I, console: &mut W) -> Result<usize, OllamaError>
where
    I: IntoIterator<Item = Result<String, OllamaError>>,
    W: Write,
{
    let mut count = 0;
    for line in lines {
        let line = line?;
        writeln!(console, "{}", line)?;
        console.flush()?;
        count += 1;
    }
    Ok(count)
}
