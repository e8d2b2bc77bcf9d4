//! Per-step operations.
//!
//! Each operation runs as a spawned task against the runtime client and
//! reports back on the wizard event channel; the TUI loop owns the session
//! and applies the outcomes.  The loop sets `is_busy` before a spawn and
//! clears it when the operation's terminal event arrives, so at most one
//! operation is in flight at a time.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use anonsetup_api::{detect_system, ApiError, RuntimeClient};

use super::session::SystemInfo;

/// Outcome events sent from spawned operations back to the wizard loop.
#[derive(Debug)]
pub enum WizardEvent {
    SystemChecked(SystemInfo),
    ProbeFinished(bool),
    PullProgress(u8),
    PullFinished(Result<(), ApiError>),
    AnonymizeFinished(Result<String, ApiError>),
}

/// Detect the platform and probe the runtime; the combined result becomes
/// the session's [`SystemInfo`].
pub fn spawn_system_check(api: Arc<dyn RuntimeClient>, tx: mpsc::UnboundedSender<WizardEvent>) {
    tokio::spawn(async move {
        let (os, arch) = detect_system();
        let running = api.probe().await;
        debug!(%os, %arch, running, "system check finished");
        let info = SystemInfo {
            os,
            arch,
            ollama_running: running,
            recommended_model: SystemInfo::recommend(arch).to_string(),
        };
        let _ = tx.send(WizardEvent::SystemChecked(info));
    });
}

/// Re-probe the runtime, used on the install step after the user reports
/// having installed Ollama.
pub fn spawn_probe(api: Arc<dyn RuntimeClient>, tx: mpsc::UnboundedSender<WizardEvent>) {
    tokio::spawn(async move {
        let running = api.probe().await;
        let _ = tx.send(WizardEvent::ProbeFinished(running));
    });
}

/// Pull `model`, forwarding the simulated progress ticks as they arrive and
/// reporting the authoritative outcome when the request settles.
pub fn spawn_pull(
    api: Arc<dyn RuntimeClient>,
    model: String,
    tx: mpsc::UnboundedSender<WizardEvent>,
) {
    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();

    let forward = tx.clone();
    tokio::spawn(async move {
        while let Some(percent) = progress_rx.recv().await {
            if forward.send(WizardEvent::PullProgress(percent)).is_err() {
                break;
            }
        }
    });

    tokio::spawn(async move {
        let result = api.pull_model(&model, progress_tx).await;
        let _ = tx.send(WizardEvent::PullFinished(result));
    });
}

/// Run the anonymization generate call over the session's sample text.
pub fn spawn_anonymize(
    api: Arc<dyn RuntimeClient>,
    text: String,
    model: String,
    tx: mpsc::UnboundedSender<WizardEvent>,
) {
    tokio::spawn(async move {
        let result = api.anonymize(&text, &model).await;
        let _ = tx.send(WizardEvent::AnonymizeFinished(result));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted runtime: fixed outcomes, and a pull that reports its own
    /// progress ticks without waiting on timers.
    struct StubRuntime {
        running: bool,
        pull: Result<(), ApiError>,
        response: Result<String, ApiError>,
    }

    #[async_trait::async_trait]
    impl RuntimeClient for StubRuntime {
        async fn probe(&self) -> bool {
            self.running
        }

        async fn list_models(&self) -> Vec<String> {
            vec!["llama3:8b".to_string()]
        }

        async fn pull_model(
            &self,
            _name: &str,
            progress: mpsc::UnboundedSender<u8>,
        ) -> Result<(), ApiError> {
            for percent in (10..=100u8).step_by(10) {
                let _ = progress.send(percent);
            }
            self.pull
        }

        async fn anonymize(&self, _text: &str, _model: &str) -> Result<String, ApiError> {
            self.response.clone()
        }
    }

    fn stub(running: bool) -> Arc<dyn RuntimeClient> {
        Arc::new(StubRuntime {
            running,
            pull: Ok(()),
            response: Ok("Client: [NAME]".to_string()),
        })
    }

    #[tokio::test]
    async fn system_check_reports_platform_and_probe_outcome() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_system_check(stub(true), tx);

        match rx.recv().await {
            Some(WizardEvent::SystemChecked(info)) => {
                assert!(info.ollama_running);
                assert_eq!(
                    info.recommended_model,
                    SystemInfo::recommend(info.arch)
                );
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn probe_reports_an_unreachable_runtime() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_probe(stub(false), tx);
        match rx.recv().await {
            Some(WizardEvent::ProbeFinished(running)) => assert!(!running),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn pull_forwards_progress_then_the_terminal_event() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_pull(stub(true), "llama3:8b".to_string(), tx);

        let mut ticks = Vec::new();
        loop {
            match rx.recv().await {
                Some(WizardEvent::PullProgress(percent)) => ticks.push(percent),
                Some(WizardEvent::PullFinished(result)) => {
                    assert!(result.is_ok());
                    break;
                }
                other => panic!("unexpected event: {other:?}"),
            }
        }
        assert_eq!(ticks.last().copied(), Some(100));
        assert!(ticks.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[tokio::test]
    async fn failed_pull_still_settles_with_a_classified_error() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let api: Arc<dyn RuntimeClient> = Arc::new(StubRuntime {
            running: false,
            pull: Err(ApiError::ConnectionRefused),
            response: Err(ApiError::ConnectionRefused),
        });
        spawn_pull(api, "llama3:8b".to_string(), tx);

        loop {
            match rx.recv().await {
                Some(WizardEvent::PullProgress(_)) => continue,
                Some(WizardEvent::PullFinished(result)) => {
                    assert_eq!(result.unwrap_err(), ApiError::ConnectionRefused);
                    break;
                }
                other => panic!("unexpected event: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn anonymize_reports_the_generated_text() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_anonymize(
            stub(true),
            "Client: Jean Dupont".to_string(),
            "llama3:8b".to_string(),
            tx,
        );
        match rx.recv().await {
            Some(WizardEvent::AnonymizeFinished(Ok(text))) => {
                assert_eq!(text, "Client: [NAME]");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
