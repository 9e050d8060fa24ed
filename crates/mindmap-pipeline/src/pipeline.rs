//! Pipeline orchestration

use crate::context::load_context;
use crate::report::{FailureKind, FileFailure, FileOutcome, FileReport, RunReport};
use crate::{PipelineConfig, PipelineError};
use chrono::{DateTime, Utc};
use mindmap_domain::traits::LlmProvider;
use mindmap_domain::{ConversationFile, NormalizedTranscript, Platform};
use mindmap_extractor::{ContextDocument, ExtractionRequest, Extractor};
use mindmap_gatekeeper::{GatekeeperError, PathGuard};
use mindmap_ingest::{inbox_for, load_conversation, normalize, scan_inboxes, Candidate, Inbox};
use mindmap_llm::{AnthropicProvider, ApiKey};
use mindmap_stager::{StagingWriter, WriteStatus};
use mindmap_store::{ChangeReason, ChangeTracker, ProcessingStatus};
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, warn, Instrument};

/// Which files a run considers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every new or changed file across all inboxes
    All,
    /// One named file, processed even if unchanged
    ///
    /// The path must resolve inside the vault and sit directly in a
    /// configured inbox folder.
    SingleFile(PathBuf),
}

impl Scope {
    fn bypasses_change_gate(&self) -> bool {
        matches!(self, Scope::SingleFile(_))
    }
}

enum Prepared {
    Done(FileOutcome),
    Ready {
        file: ConversationFile,
        transcript: NormalizedTranscript,
        reason: ChangeReason,
    },
}

/// The ingestion-and-staging pipeline for one vault
///
/// Owns the processing log for the duration of the run; one pipeline per
/// vault at a time.
pub struct Pipeline {
    config: PipelineConfig,
    guard: PathGuard,
    inboxes: Vec<Inbox>,
    tracker: ChangeTracker,
    writer: StagingWriter,
    context: Vec<ContextDocument>,
}

impl Pipeline {
    /// Validate `config`, open the vault and load the processing log and
    /// context documents
    ///
    /// # Errors
    ///
    /// [`PipelineError::Config`] for an invalid configuration, an unusable
    /// vault root, an inbox or log path outside the vault, or an unreadable
    /// processing log.
    pub fn open(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;
        let vault = config
            .vault_path
            .as_deref()
            .ok_or_else(|| PipelineError::Config("vault_path is not set".to_string()))?;

        let guard = PathGuard::new(vault).map_err(|e| PipelineError::Config(e.to_string()))?;

        let inboxes = Platform::ALL
            .into_iter()
            .map(|platform| {
                guard
                    .validate(config.inbox_paths.get(platform))
                    .map(|dir| Inbox::new(platform, dir))
                    .map_err(|e| PipelineError::Config(format!("Inbox for {}: {}", platform, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let log_path = guard
            .validate(config.processing_log_path())
            .map_err(|e| PipelineError::Config(format!("Processing log: {}", e)))?;
        let tracker = ChangeTracker::open(log_path).map_err(|e| PipelineError::Config(e.to_string()))?;

        let writer = StagingWriter::new(guard.clone(), &config.staging_path)
            .with_policy(config.conflict_policy);
        let context = load_context(&guard, &config.bible_files);

        info!(
            vault = %guard.root().display(),
            context_docs = context.len(),
            "pipeline ready"
        );

        Ok(Self {
            config,
            guard,
            inboxes,
            tracker,
            writer,
            context,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Canonical vault root
    pub fn vault_root(&self) -> &Path {
        self.guard.root()
    }

    /// Loaded context documents
    pub fn context(&self) -> &[ContextDocument] {
        &self.context
    }

    /// End of the most recent live run
    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        self.tracker.last_run()
    }

    /// Discover and gate files, reporting what a live run would do
    ///
    /// Makes no service calls and writes nothing, not even the processing log.
    pub fn dry_run(&self, scope: &Scope) -> Result<RunReport, PipelineError> {
        let mut report = RunReport::new(true, self.last_run(), self.context.len());
        let span = info_span!("run", run_id = %report.run_id, dry_run = true);
        let _enter = span.enter();

        for candidate in self.candidates(scope)? {
            let file_span = info_span!("file", path = %candidate.path.display());
            let _file = file_span.enter();

            let outcome = match self.prepare(&candidate, scope.bypasses_change_gate()) {
                Prepared::Done(outcome) => outcome,
                Prepared::Ready {
                    transcript, reason, ..
                } => {
                    info!(reason = %reason, turns = transcript.len(), "would extract");
                    FileOutcome::Pending {
                        reason,
                        turns: transcript.len(),
                    }
                }
            };
            report.files.push(report_for(&candidate, outcome));
        }

        info!("{}", report.summary());
        Ok(report)
    }

    /// Process every file in `scope` through `extractor` and into staging
    ///
    /// Per-file failures are collected in the report and the run continues.
    ///
    /// # Errors
    ///
    /// Fatal conditions only: an unlistable inbox, an invalid single-file
    /// path, or a processing log that cannot be written.
    pub async fn run<L>(
        &mut self,
        extractor: &Extractor<L>,
        scope: &Scope,
    ) -> Result<RunReport, PipelineError>
    where
        L: LlmProvider,
    {
        let mut report = RunReport::new(false, self.last_run(), self.context.len());
        let span = info_span!("run", run_id = %report.run_id, dry_run = false);

        self.run_files(extractor, scope, &mut report)
            .instrument(span.clone())
            .await?;

        let _enter = span.enter();
        info!("{}", report.summary());
        Ok(report)
    }

    async fn run_files<L>(
        &mut self,
        extractor: &Extractor<L>,
        scope: &Scope,
        report: &mut RunReport,
    ) -> Result<(), PipelineError>
    where
        L: LlmProvider,
    {
        let candidates = self.candidates(scope)?;
        info!(files = candidates.len(), "starting run");

        for candidate in &candidates {
            let file_span = info_span!(
                "file",
                path = %candidate.path.display(),
                platform = %candidate.platform
            );
            let outcome = self
                .process(extractor, candidate, scope.bypasses_change_gate())
                .instrument(file_span)
                .await?;
            report.files.push(report_for(candidate, outcome));
        }

        self.tracker.finish_run()?;
        Ok(())
    }

    async fn process<L>(
        &mut self,
        extractor: &Extractor<L>,
        candidate: &Candidate,
        force: bool,
    ) -> Result<FileOutcome, PipelineError>
    where
        L: LlmProvider,
    {
        let (file, transcript) = match self.prepare(candidate, force) {
            Prepared::Done(outcome) => return Ok(outcome),
            Prepared::Ready {
                file,
                transcript,
                reason,
            } => {
                info!(
                    reason = %reason,
                    source_date = %file.source_date,
                    chars = transcript.char_count(),
                    "processing"
                );
                (file, transcript)
            }
        };

        let request = ExtractionRequest {
            transcript: &transcript,
            platform: file.platform,
            source_date: file.source_date,
            source_file: &file.relative_path,
            context: &self.context,
        };

        let extraction = match extractor.extract(request).await {
            Ok(extraction) => extraction,
            Err(e) => {
                let failure = FileFailure::from_extraction(&file.path, &e);
                warn!("Extraction failed: {}", e);
                self.record(&file, ProcessingStatus::Failed)?;
                return Ok(FileOutcome::Failed(failure));
            }
        };

        let written = self.writer.write(&extraction.items, &extraction.summary);
        if !written.is_complete() {
            let kind = if written.failures.iter().any(|f| f.error.is_path_security()) {
                FailureKind::PathSecurity
            } else {
                FailureKind::Io
            };
            let cause = written
                .failures
                .iter()
                .map(|f| format!("{}: {}", f.target, f.error))
                .collect::<Vec<_>>()
                .join("; ");
            warn!("Staging incomplete: {}", cause);
            self.record(&file, ProcessingStatus::Failed)?;
            return Ok(FileOutcome::Failed(FileFailure::new(kind, &file.path, cause)));
        }

        self.record(&file, ProcessingStatus::Success)?;
        info!(items = extraction.items.len(), "staged");

        Ok(FileOutcome::Staged {
            items: extraction.items.len(),
            written: written.written_paths().len(),
            unchanged: written.count(WriteStatus::Unchanged),
            summary: written
                .summary
                .as_ref()
                .map(|doc| doc.path.clone())
                .unwrap_or_default(),
        })
    }

    /// Everything up to the service call, shared by dry and live runs
    fn prepare(&self, candidate: &Candidate, force: bool) -> Prepared {
        if let Err(e) = self.guard.validate(&candidate.path) {
            warn!("Refusing to read {}: {}", candidate.path.display(), e);
            return Prepared::Done(FileOutcome::Failed(FileFailure::new(
                failure_kind(&e),
                &candidate.path,
                e.to_string(),
            )));
        }

        let file = match load_conversation(candidate, self.guard.root()) {
            Ok(file) => file,
            Err(e) => {
                warn!("{}", e);
                return Prepared::Done(FileOutcome::Failed(FileFailure::new(
                    FailureKind::Io,
                    &candidate.path,
                    e.to_string(),
                )));
            }
        };

        let decision = self.tracker.should_process(&file.relative_path, &file.hash);
        if !decision.process && !force {
            debug!("unchanged since last run; skipping");
            return Prepared::Done(FileOutcome::Unchanged);
        }

        let transcript = normalize(&file);
        if transcript.is_empty() {
            warn!("Empty transcript, skipping: {}", file.relative_path);
            return Prepared::Done(FileOutcome::Empty);
        }

        Prepared::Ready {
            file,
            transcript,
            reason: decision.reason,
        }
    }

    fn candidates(&self, scope: &Scope) -> Result<Vec<Candidate>, PipelineError> {
        match scope {
            Scope::All => Ok(scan_inboxes(&self.inboxes)?),
            Scope::SingleFile(path) => {
                let resolved = self.guard.validate(path).map_err(|e| match e {
                    GatekeeperError::PathSecurity { .. } => {
                        PipelineError::PathSecurity { path: path.clone() }
                    }
                    other => PipelineError::InvalidInput(other.to_string()),
                })?;

                if !resolved.is_file() {
                    return Err(PipelineError::InvalidInput(format!(
                        "File not found: {}",
                        path.display()
                    )));
                }

                let platform = inbox_for(&resolved, &self.inboxes).ok_or_else(|| {
                    PipelineError::InvalidInput(format!(
                        "{} is not in a configured inbox folder",
                        path.display()
                    ))
                })?;

                Ok(vec![Candidate {
                    path: resolved,
                    platform,
                }])
            }
        }
    }

    fn record(
        &mut self,
        file: &ConversationFile,
        status: ProcessingStatus,
    ) -> Result<(), PipelineError> {
        self.tracker
            .record(&file.relative_path, &file.hash, status)?;
        Ok(())
    }
}

/// Build the production extractor from `config`
///
/// Reads the credential from the environment variable named by
/// `api_key_env` and validates its form before anything touches the network.
///
/// # Errors
///
/// [`PipelineError::Config`] if the variable is unset or malformed.
pub fn anthropic_extractor(
    config: &PipelineConfig,
) -> Result<Extractor<AnthropicProvider>, PipelineError> {
    let api_key =
        ApiKey::from_env(&config.api_key_env).map_err(|e| PipelineError::Config(e.to_string()))?;
    anthropic_extractor_with_key(config, api_key)
}

/// Build the production extractor with an already validated credential
pub fn anthropic_extractor_with_key(
    config: &PipelineConfig,
    api_key: ApiKey,
) -> Result<Extractor<AnthropicProvider>, PipelineError> {
    let settings = &config.extractor;
    let provider = AnthropicProvider::with_options(
        api_key,
        &settings.model,
        &settings.endpoint,
        settings.request_timeout(),
    )
    .map_err(|e| PipelineError::Config(e.to_string()))?;

    Extractor::new(provider, settings.clone()).map_err(|e| PipelineError::Config(e.to_string()))
}

fn report_for(candidate: &Candidate, outcome: FileOutcome) -> FileReport {
    FileReport {
        path: candidate.path.clone(),
        platform: candidate.platform,
        outcome,
    }
}

fn failure_kind(error: &GatekeeperError) -> FailureKind {
    match error {
        GatekeeperError::PathSecurity { .. } => FailureKind::PathSecurity,
        _ => FailureKind::Io,
    }
}
