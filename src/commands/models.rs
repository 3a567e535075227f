use log::debug;

use crate::decode::Decoding;
use crate::error::OllamaError;
use crate::ollama::Ollama;
use crate::process::Spawner;

#[derive(Debug)]
pub struct ModelsResult {
    /// `ollama list` stdout, untouched apart from decoding.
    pub output: String,
}

pub fn cmd_models<S: Spawner>(
    spawner: &S,
    ollama: &Ollama,
    decoding: Decoding,
) -> Result<ModelsResult, OllamaError> {
    let invocation = ollama.list();
    let captured = spawner
        .capture(&invocation)
        .map_err(|e| OllamaError::from_spawn(invocation.program(), e))?;
    debug!("{} finished with {}", invocation, captured.exit);

    if !captured.exit.success() {
        return Err(OllamaError::ListFailed {
            stderr: Decoding::Lossy.decode(captured.stderr)?,
        });
    }

    Ok(ModelsResult {
        output: decoding.decode(captured.stdout)?,
    })
}

pub fn format_models_human(result: &ModelsResult) -> &str {
    &result.output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OllamaConfig;
    use crate::process::Exit;
    use crate::testutil::{FakeSpawner, Script};
    use std::io;

    const LISTING: &[u8] = b"NAME            ID              SIZE      MODIFIED\n\
llama2:latest   78e26419b446    3.8 GB    2 weeks ago\n";

    fn ollama() -> Ollama {
        Ollama::new(&OllamaConfig::default())
    }

    #[test]
    fn relays_stdout_verbatim() {
        let spawner = FakeSpawner::new(Script::exits(0).stdout(LISTING));
        let result = cmd_models(&spawner, &ollama(), Decoding::Lossy).unwrap();
        assert_eq!(result.output.as_bytes(), LISTING);
        assert_eq!(format_models_human(&result).as_bytes(), LISTING);
    }

    #[test]
    fn invokes_list_once() {
        let spawner = FakeSpawner::new(Script::exits(0));
        cmd_models(&spawner, &ollama(), Decoding::Lossy).unwrap();
        let calls = spawner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program(), "ollama");
        assert_eq!(calls[0].args(), ["list"]);
        assert_eq!(spawner.reaped(), 1);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let spawner = FakeSpawner::new(Script::exits(0).stdout(LISTING));
        let first = cmd_models(&spawner, &ollama(), Decoding::Lossy).unwrap();
        let second = cmd_models(&spawner, &ollama(), Decoding::Lossy).unwrap();
        assert_eq!(first.output, second.output);
    }

    #[test]
    fn missing_binary_is_tool_not_found() {
        let spawner = FakeSpawner::failing(io::ErrorKind::NotFound);
        let err = cmd_models(&spawner, &ollama(), Decoding::Lossy).unwrap_err();
        assert!(matches!(err, OllamaError::ToolNotFound { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn non_zero_exit_reports_stderr_and_exits_one() {
        let spawner = FakeSpawner::new(
            Script::exits(7)
                .stdout(b"partial")
                .stderr(b"could not connect to ollama app\n"),
        );
        let err = cmd_models(&spawner, &ollama(), Decoding::Lossy).unwrap_err();
        match &err {
            OllamaError::ListFailed { stderr } => {
                assert_eq!(stderr, "could not connect to ollama app\n");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn killed_by_signal_is_a_failure() {
        let mut script = Script::exits(0);
        script.exit = Exit::Signal(15);
        let spawner = FakeSpawner::new(script);
        let err = cmd_models(&spawner, &ollama(), Decoding::Lossy).unwrap_err();
        assert!(matches!(err, OllamaError::ListFailed { .. }));
    }

    #[test]
    fn malformed_output_is_substituted() {
        let spawner = FakeSpawner::new(Script::exits(0).stdout(b"bad\xffname\n"));
        let result = cmd_models(&spawner, &ollama(), Decoding::Lossy).unwrap();
        assert_eq!(result.output, "bad\u{FFFD}name\n");
    }

    #[test]
    fn strict_decoding_rejects_malformed_output() {
        let spawner = FakeSpawner::new(Script::exits(0).stdout(b"bad\xff\n"));
        let err = cmd_models(&spawner, &ollama(), Decoding::Strict).unwrap_err();
        assert!(matches!(err, OllamaError::Decode(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
