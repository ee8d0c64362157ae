//! Assistant integration.
//!
//! Text generation is an opaque capability: a provider takes a prompt and
//! returns text or fails. `AssistantRouter` tries its providers in order until
//! one succeeds.

use std::io::{self, Write};
use std::process::{Child, Command, Stdio};
use std::thread;

use thiserror::Error;
use tracing::{debug, warn};

use crate::export::export_markdown;
use crate::task::Checklist;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("No assistant providers configured")]
    NoProviders,

    #[error("Provider {provider} failed: {message}")]
    Provider { provider: String, message: String },

    #[error("All assistant providers failed: {}", format_failures(.0))]
    AllProvidersFailed(Vec<AssistantError>),
}

fn format_failures(errors: &[AssistantError]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ")
}

impl AssistantError {
    pub fn provider(provider: &str, message: impl Into<String>) -> Self {
        AssistantError::Provider { provider: provider.to_string(), message: message.into() }
    }
}

/// A text generation capability.
pub trait TextGenerator {
    fn name(&self) -> &str;
    fn generate(&self, prompt: &str) -> Result<String, AssistantError>;
}

/// Ordered providers with linear fallback.
#[derive(Default)]
pub struct AssistantRouter {
    providers: Vec<Box<dyn TextGenerator>>,
}

impl AssistantRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider; earlier providers are preferred.
    pub fn with_provider(mut self, provider: impl TextGenerator + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn is_available(&self) -> bool {
        !self.providers.is_empty()
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Send `prompt` to each provider in turn and return the first answer.
    pub fn route(&self, prompt: &str) -> Result<String, AssistantError> {
        if self.providers.is_empty() {
            return Err(AssistantError::NoProviders);
        }

        let mut failures = Vec::new();
        for provider in &self.providers {
            match provider.generate(prompt) {
                Ok(text) => {
                    debug!(provider = provider.name(), "assistant answered");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "Provider failed, trying next");
                    failures.push(e);
                }
            }
        }
        Err(AssistantError::AllProvidersFailed(failures))
    }
}

/// Provider backed by an external program: the prompt goes to its stdin and
/// its trimmed stdout is the answer.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
}

impl CommandGenerator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        CommandGenerator { program: program.into(), args }
    }

    /// Split a command line on whitespace into program and arguments.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(CommandGenerator::new(program, parts.collect()))
    }
}

impl TextGenerator for CommandGenerator {
    fn name(&self) -> &str {
        &self.program
    }

    fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        let fail = |msg: String| AssistantError::provider(&self.program, msg);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| fail(format!("failed to start: {}", e)))?;

        // Feed stdin from its own thread: the child may fill stdout before it
        // has read the whole prompt.
        let writer = match child.stdin.take() {
            Some(mut stdin) => {
                let prompt = prompt.as_bytes().to_vec();
                let spawned = thread::Builder::new()
                    .name("rcl-prompt-writer".into())
                    .spawn(move || stdin.write_all(&prompt));
                match spawned {
                    Ok(handle) => Some(handle),
                    Err(e) => {
                        reap(&mut child);
                        return Err(fail(format!("failed to start prompt writer: {}", e)));
                    }
                }
            }
            None => None,
        };

        let output = child
            .wait_with_output()
            .map_err(|e| fail(format!("failed to wait: {}", e)))?;

        let written = match writer.map(|handle| handle.join()) {
            Some(Ok(result)) => result,
            Some(Err(_)) => Err(io::Error::new(io::ErrorKind::Other, "prompt writer panicked")),
            None => Ok(()),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(fail(format!("exited with {}: {}", output.status, stderr.trim())));
        }

        // A provider may answer without reading the whole prompt.
        match written {
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => {
                return Err(fail(format!("failed to write prompt: {}", e)));
            }
            _ => {}
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(fail("empty response".to_string()));
        }
        Ok(text)
    }
}

fn reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!(error = %e, "provider already exited");
    }
    if let Err(e) = child.wait() {
        warn!(error = %e, "failed to reap provider process");
    }
}

/// Prompt asking `question` with the checklist's Markdown export as context.
pub fn checklist_prompt(checklist: &Checklist, question: &str) -> String {
    format!(
        "You are a music release planning assistant. Use the release checklist below \
         to answer the artist's question.\n\n{}\nQuestion: {}\n",
        export_markdown(checklist),
        question.trim()
    )
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::fields::ReleaseType;
    use crate::generator::generate_checklist_at;
    use crate::task::ReleaseConfiguration;

    struct Canned {
        name: &'static str,
        reply: Option<&'static str>,
        calls: Rc<Cell<usize>>,
    }

    impl TextGenerator for Canned {
        fn name(&self) -> &str {
            self.name
        }

        fn generate(&self, _prompt: &str) -> Result<String, AssistantError> {
            self.calls.set(self.calls.get() + 1);
            self.reply
                .map(str::to_string)
                .ok_or_else(|| AssistantError::provider(self.name, "unavailable"))
        }
    }

    fn canned(name: &'static str, reply: Option<&'static str>) -> (Canned, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (Canned { name, reply, calls: calls.clone() }, calls)
    }

    #[test]
    fn test_router_falls_back_in_order() {
        let (first, first_calls) = canned("gemini", None);
        let (second, second_calls) = canned("openai", Some("Start with split sheets."));
        let (third, third_calls) = canned("local", Some("unused"));
        let router = AssistantRouter::new().with_provider(first).with_provider(second).with_provider(third);

        assert_eq!(router.provider_names(), vec!["gemini", "openai", "local"]);
        assert_eq!(router.route("what first?").unwrap(), "Start with split sheets.");
        assert_eq!((first_calls.get(), second_calls.get(), third_calls.get()), (1, 1, 0));
    }

    #[test]
    fn test_router_reports_every_failure() {
        let (a, _) = canned("a", None);
        let (b, _) = canned("b", None);
        let router = AssistantRouter::new().with_provider(a).with_provider(b);
        match router.route("hello") {
            Err(AssistantError::AllProvidersFailed(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected all providers to fail, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_router() {
        let router = AssistantRouter::new();
        assert!(!router.is_available());
        assert!(matches!(router.route("hello"), Err(AssistantError::NoProviders)));
    }

    #[test]
    fn test_checklist_prompt_embeds_markdown() {
        let checklist = generate_checklist_at(
            &ReleaseConfiguration::new(ReleaseType::Album),
            Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap(),
        )
        .unwrap();
        let prompt = checklist_prompt(&checklist, "  When should I plan the tour? ");
        assert!(prompt.contains("# Album Release Checklist"));
        assert!(prompt.ends_with("Question: When should I plan the tour?\n"));
    }

    #[test]
    fn test_command_line_parsing() {
        let provider = CommandGenerator::from_command_line("ollama run llama3").unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.args, vec!["run".to_string(), "llama3".to_string()]);
        assert!(CommandGenerator::from_command_line("   ").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_generator_echoes_stdin() {
        let provider = CommandGenerator::new("cat", vec![]);
        assert_eq!(provider.generate("  hello there \n").unwrap(), "hello there");

        let failing = CommandGenerator::new("false", vec![]);
        assert!(matches!(failing.generate("x"), Err(AssistantError::Provider { .. })));

        let missing = CommandGenerator::new("definitely-not-a-real-binary-rcl", vec![]);
        assert!(missing.generate("x").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_generator_streams_large_prompt() {
        let prompt = "x".repeat(1 << 20);
        let provider = CommandGenerator::new("cat", vec![]);
        assert_eq!(provider.generate(&prompt).unwrap().len(), 1 << 20);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_generator_answering_without_reading() {
        let prompt = "x".repeat(1 << 20);
        let provider = CommandGenerator::new("sh", vec!["-c".into(), "echo ready".into()]);
        assert_eq!(provider.generate(&prompt).unwrap(), "ready");

        let quitter = CommandGenerator::new("sh", vec!["-c".into(), "echo nope >&2; exit 3".into()]);
        match quitter.generate(&prompt) {
            Err(AssistantError::Provider { message, .. }) => assert!(message.contains("nope"), "{}", message),
            other => panic!("expected provider failure, got {:?}", other),
        }
    }
}
