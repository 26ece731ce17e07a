//! Asset generation: producing a missing asset for a saved application.
//!
//! Generation is slow and can fail, so it works from an owned
//! [`GenerationRequest`] snapshot rather than from the record itself. The
//! request can be handed to another thread while the tracker keeps serving
//! mutations; the result is attached afterwards as a normal update.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::model::{ApplicationRecord, AssetKind, AssetPayload};

/// Errors raised while generating an asset.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("no generator configured: set [generator] command in the config file")]
    NotConfigured,

    #[error("failed to run generator `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("generator I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("generator exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("generator returned no output")]
    Empty,

    #[error("could not parse generated {kind}: {source}")]
    Parse {
        kind: AssetKind,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything a generator needs, copied out of the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub kind: AssetKind,
    pub profile_content: String,
    pub title: String,
    pub company: String,
    pub description: String,
}

impl GenerationRequest {
    pub fn for_record(record: &ApplicationRecord, kind: AssetKind) -> Self {
        Self {
            kind,
            profile_content: record.profile_content.clone(),
            title: record.title.clone(),
            company: record.company.clone(),
            description: record.description.clone(),
        }
    }
}

/// Produces one asset for an application.
pub trait AssetGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<AssetPayload, GenerationError>;
}

/// Runs an external command (typically an LLM CLI) as the generator.
///
/// The brief is written to the command's stdin and the asset is read from
/// its stdout.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
}

impl CommandGenerator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        match &config.command {
            Some(program) if !program.trim().is_empty() => {
                Ok(Self::new(program.clone(), config.args.clone()))
            }
            _ => Err(GenerationError::NotConfigured),
        }
    }

    fn run(&self, prompt: String) -> Result<String, GenerationError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| GenerationError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Feed stdin from its own thread so a chatty child can't fill the
        // stdout pipe while we are still writing.
        let stdin = child.stdin.take();
        let writer = thread::spawn(move || match stdin {
            Some(mut stdin) => stdin.write_all(prompt.as_bytes()),
            None => Ok(()),
        });

        let output = child.wait_with_output()?;
        match writer.join() {
            Ok(Ok(())) => {}
            // The command may legitimately stop reading early.
            Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Err(io::Error::other("stdin writer panicked").into()),
        }

        if !output.status.success() {
            return Err(GenerationError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(text)
    }
}

impl AssetGenerator for CommandGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<AssetPayload, GenerationError> {
        let started = Instant::now();
        info!(kind = %request.kind, company = %request.company, program = %self.program, "generating asset");

        let text = self.run(brief(request))?;
        let payload = parse_payload(request.kind, &text)?;

        debug!(kind = %request.kind, elapsed_ms = started.elapsed().as_millis(), "asset generated");
        Ok(payload)
    }
}

/// The instructions sent to the generator.
fn brief(request: &GenerationRequest) -> String {
    let format = match request.kind {
        AssetKind::CoverLetter => "Reply with the letter as plain text only, no Markdown.",
        AssetKind::StrategyStory => {
            "Reply in plain text, no Markdown: how the candidate should position \
             their background for this role, with three stories to tell in interviews."
        }
        AssetKind::InterviewPrep => {
            "Reply with only a JSON array of 5 objects, each with the string fields \
             \"question\", \"context\" and \"suggestedAnswer\"."
        }
        AssetKind::EmailKit => {
            "Reply with only a JSON object with the string fields \"linkedInConnection\" \
             (under 300 characters) and \"followUpEmail\"."
        }
    };

    format!(
        "Write the {kind} for this job application.\n{format}\n\n\
         Job title: {title}\nCompany: {company}\n\n\
         Job description:\n{description}\n\n\
         Candidate profile:\n{profile}\n",
        kind = request.kind,
        title = request.title,
        company = request.company,
        description = request.description,
        profile = request.profile_content,
    )
}

/// Shapes generator output into the payload for `kind`.
pub fn parse_payload(kind: AssetKind, text: &str) -> Result<AssetPayload, GenerationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(GenerationError::Empty);
    }
    let parse_err = |source| GenerationError::Parse { kind, source };
    match kind {
        AssetKind::CoverLetter => Ok(AssetPayload::CoverLetter(text.to_string())),
        AssetKind::StrategyStory => Ok(AssetPayload::StrategyStory(text.to_string())),
        AssetKind::InterviewPrep => serde_json::from_str(strip_code_fence(text))
            .map(AssetPayload::InterviewPrep)
            .map_err(parse_err),
        AssetKind::EmailKit => serde_json::from_str(strip_code_fence(text))
            .map(AssetPayload::EmailKit)
            .map_err(parse_err),
    }
}

/// Unwraps a Markdown code fence, if the output is wrapped in one.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::EmailKit;

    fn request(kind: AssetKind) -> GenerationRequest {
        GenerationRequest {
            kind,
            profile_content: "# Jane Doe\nRust, Postgres".into(),
            title: "Platform Engineer".into(),
            company: "Acme".into(),
            description: "Own the deploy pipeline.".into(),
        }
    }

    #[test]
    fn text_kinds_use_output_verbatim() {
        let payload = parse_payload(AssetKind::CoverLetter, "  Dear Acme team,\n\nHello.\n").unwrap();

        assert_eq!(
            payload,
            AssetPayload::CoverLetter("Dear Acme team,\n\nHello.".into())
        );
    }

    #[test]
    fn interview_prep_parses_fenced_json() {
        let text = "```json\n[{\"question\": \"Why Rust?\", \"context\": \"Stack fit\", \"suggestedAnswer\": \"Safety\"}]\n```";

        let AssetPayload::InterviewPrep(questions) =
            parse_payload(AssetKind::InterviewPrep, text).unwrap()
        else {
            panic!("expected interview prep payload");
        };

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "Why Rust?");
    }

    #[test]
    fn email_kit_parses_bare_json() {
        let text = r#"{"linkedInConnection": "Hi!", "followUpEmail": "Thank you."}"#;

        let payload = parse_payload(AssetKind::EmailKit, text).unwrap();

        assert_eq!(
            payload,
            AssetPayload::EmailKit(EmailKit {
                linked_in_connection: "Hi!".into(),
                follow_up_email: "Thank you.".into(),
            })
        );
    }

    #[test]
    fn malformed_structured_output_is_a_parse_error() {
        let err = parse_payload(AssetKind::EmailKit, "Sure! Here is your kit.").unwrap_err();

        assert!(matches!(
            err,
            GenerationError::Parse {
                kind: AssetKind::EmailKit,
                ..
            }
        ));
    }

    #[test]
    fn blank_output_is_empty() {
        let err = parse_payload(AssetKind::CoverLetter, " \n ").unwrap_err();
        assert!(matches!(err, GenerationError::Empty));
    }

    #[test]
    fn brief_carries_job_and_profile_context() {
        let text = brief(&request(AssetKind::InterviewPrep));

        assert!(text.contains("interview prep"));
        assert!(text.contains("Company: Acme"));
        assert!(text.contains("Own the deploy pipeline."));
        assert!(text.contains("Rust, Postgres"));
        assert!(text.contains("suggestedAnswer"));
    }

    #[test]
    fn unconfigured_generator_is_rejected() {
        let err = CommandGenerator::from_config(&GeneratorConfig::default()).unwrap_err();
        assert!(matches!(err, GenerationError::NotConfigured));
    }

    #[cfg(unix)]
    #[test]
    fn command_generator_reads_stdout() {
        let generator =
            CommandGenerator::new("sh", vec!["-c".into(), "cat > /dev/null; echo 'Dear Acme'".into()]);

        let payload = generator.generate(&request(AssetKind::CoverLetter)).unwrap();

        assert_eq!(payload, AssetPayload::CoverLetter("Dear Acme".into()));
    }

    #[cfg(unix)]
    #[test]
    fn command_generator_reports_failure_status() {
        let generator = CommandGenerator::new("sh", vec!["-c".into(), "echo quota >&2; exit 3".into()]);

        let err = generator.generate(&request(AssetKind::CoverLetter)).unwrap_err();

        let GenerationError::Failed { stderr, .. } = err else {
            panic!("expected failure, got {err:?}");
        };
        assert_eq!(stderr, "quota");
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let generator = CommandGenerator::new("applykit-no-such-generator", vec![]);

        let err = generator.generate(&request(AssetKind::CoverLetter)).unwrap_err();

        assert!(matches!(err, GenerationError::Spawn { .. }));
    }
}
