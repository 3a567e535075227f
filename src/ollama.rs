use crate::config::OllamaConfig;
use crate::process::Invocation;

/// Program name looked up on `PATH`.
pub const OLLAMA_PROGRAM: &str = "ollama";

/// Builds invocations of the `ollama` CLI.
#[derive(Debug, Clone)]
pub struct Ollama {
    program: String,
    host: Option<String>,
}

impl Ollama {
    pub fn new(config: &OllamaConfig) -> Self {
        Self {
            program: OLLAMA_PROGRAM.to_string(),
            host: config.host.clone(),
        }
    }

    /// `ollama list`
    pub fn list(&self) -> Invocation {
        self.base().arg("list")
    }

    /// `ollama run <model> <prompt>`
    pub fn run(&self, model: &str, prompt: &str) -> Invocation {
        self.base().arg("run").arg(model).arg(prompt)
    }

    fn base(&self) -> Invocation {
        let invocation = Invocation::new(&self.program);
        match &self.host {
            Some(host) => invocation.env("OLLAMA_HOST", host),
            None => invocation,
        }
    }
}
