//! Mutable wizard session shared by the step controllers.

use anonsetup_api::{ApiError, Arch, Os, ANONYMIZE_FALLBACK};

use super::steps::WizardStep;

/// What the system check learned about this machine.  Produced once per
/// session; only re-derived when the user re-runs the check step.
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub os: Os,
    pub arch: Arch,
    pub ollama_running: bool,
    pub recommended_model: String,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            os: Os::Unknown,
            arch: Arch::Unknown,
            ollama_running: false,
            recommended_model: "llama3".to_string(),
        }
    }
}

impl SystemInfo {
    /// Model tag recommended for a detected architecture.  Both mainstream
    /// architectures get the 8B build; anything unrecognised falls back to
    /// the base tag.
    pub fn recommend(arch: Arch) -> &'static str {
        match arch {
            Arch::X86_64 | Arch::Arm64 => "llama3:8b",
            Arch::Unknown => "llama3",
        }
    }
}

/// One entry in the curated model catalog offered on the choose-model step.
#[derive(Debug, Clone, Copy)]
pub struct ModelOption {
    pub id: &'static str,
    pub name: &'static str,
    pub size: &'static str,
    pub blurb: &'static str,
}

pub const MODEL_CATALOG: [ModelOption; 3] = [
    ModelOption {
        id: "llama3:8b",
        name: "Llama 3 (8B)",
        size: "4.7 GB",
        blurb: "A lightweight model suited to basic anonymization tasks.",
    },
    ModelOption {
        id: "llama3",
        name: "Llama 3",
        size: "8.1 GB",
        blurb: "A balanced model with good performance for most anonymization needs.",
    },
    ModelOption {
        id: "mistral",
        name: "Mistral",
        size: "7.4 GB",
        blurb: "A powerful model for complex anonymization tasks.",
    },
];

/// Sample engagement letter offered on the anonymization test step.  Dense
/// with the kinds of PII the prompt is expected to replace.
pub const SAMPLE_LETTER: &str = "\
Client: Jean Dupont
Date of birth: 12/05/1980
Address: 15 Avenue de la Gare, Lausanne, 1003
Phone: 021 123 45 67
Email: jean.dupont@example.ch
Case number: ABC-12345

Dear Mr. Dupont,

This letter confirms our appointment on 15 June 2023 at 2:00 pm regarding \
your divorce proceedings against Marie Dupont. We will discuss the division \
of the property at 24 Rue de Bourg and the custody arrangements for your \
children, Michel (12) and Sarah (9).

Please bring your bank statements from UBS (account no. 987654321) and any \
correspondence from Mrs. Dupont's lawyer, Robert Martin of Martin & \
Associates (tel: 021 987 65 43).

Kind regards,
Elisabeth Martin
Bar number: 98765
Martin Legal Services
8 Place Saint-Francois
Lausanne, 1003
Phone: 021 789 01 23
";

/// The single mutable record behind the whole wizard.  Owned by the TUI
/// loop and passed by reference wherever it is needed; there is no
/// process-wide instance.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub current_step: WizardStep,
    pub system_info: SystemInfo,
    pub sample_text: String,
    pub anonymized_text: String,
    /// True for the entire duration of the one in-flight API operation.
    /// Action triggers are disabled while set.
    pub is_busy: bool,
    pub check_complete: bool,
    /// Set when an operation failed because the runtime was unreachable;
    /// unlocks the jump to the install step.
    pub connection_error: bool,
    pub selected_model: String,
    pub download_started: bool,
    pub download_progress: u8,
    pub download_complete: bool,
    pub has_anonymized: bool,
    pub last_error: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the start of the single in-flight API operation.  Returns false
    /// when one is already running, in which case the caller must not start
    /// another.
    pub fn begin_operation(&mut self) -> bool {
        if self.is_busy {
            return false;
        }
        self.is_busy = true;
        self.last_error = None;
        self.connection_error = false;
        true
    }

    /// Clears the busy flag once an operation settles, on success and
    /// failure alike.
    pub fn finish_operation(&mut self) {
        self.is_busy = false;
    }

    pub fn record_system_check(&mut self, info: SystemInfo) {
        if self.selected_model.is_empty() {
            self.selected_model = info.recommended_model.clone();
        }
        self.connection_error = !info.ollama_running;
        self.system_info = info;
        self.check_complete = true;
    }

    pub fn record_failure(&mut self, error: ApiError) {
        self.last_error = Some(error.user_message().to_string());
        self.connection_error = error.is_connection_refused();
    }

    /// Progress ticks only ever move the gauge forward; the authoritative
    /// outcome arrives separately.
    pub fn record_pull_progress(&mut self, percent: u8) {
        self.download_started = true;
        self.download_progress = self.download_progress.max(percent.min(100));
    }

    pub fn record_pull_success(&mut self) {
        self.download_progress = 100;
        self.download_complete = true;
    }

    pub fn record_anonymization(&mut self, text: String) {
        self.anonymized_text = text;
        self.has_anonymized = true;
    }

    pub fn record_anonymization_failure(&mut self, error: ApiError) {
        self.anonymized_text = ANONYMIZE_FALLBACK.to_string();
        self.record_failure(error);
    }

    /// Move the model selection through the catalog.
    pub fn select_next_model(&mut self) {
        let idx = self.selected_model_index();
        self.selected_model = MODEL_CATALOG[(idx + 1) % MODEL_CATALOG.len()].id.to_string();
    }

    pub fn select_prev_model(&mut self) {
        let idx = self.selected_model_index();
        let prev = if idx == 0 { MODEL_CATALOG.len() - 1 } else { idx - 1 };
        self.selected_model = MODEL_CATALOG[prev].id.to_string();
    }

    pub fn selected_model_index(&self) -> usize {
        MODEL_CATALOG
            .iter()
            .position(|option| option.id == self.selected_model)
            .unwrap_or(0)
    }

    /// Back to the first step, with the session texts cleared.  Detected
    /// system info, the model choice, and download completion describe the
    /// machine rather than the walk-through and are kept; re-running the
    /// respective steps refreshes them.
    pub fn restart(&mut self) {
        self.current_step = WizardStep::Welcome;
        self.sample_text.clear();
        self.anonymized_text.clear();
        self.has_anonymized = false;
        self.last_error = None;
        self.is_busy = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_flag_admits_one_operation_at_a_time() {
        let mut session = SessionState::new();
        assert!(session.begin_operation());
        assert!(session.is_busy);
        assert!(!session.begin_operation());

        session.finish_operation();
        assert!(!session.is_busy);
        assert!(session.begin_operation());
    }

    #[test]
    fn beginning_an_operation_clears_stale_errors() {
        let mut session = SessionState::new();
        session.record_failure(ApiError::ConnectionRefused);
        assert!(session.connection_error);
        assert!(session.last_error.is_some());

        assert!(session.begin_operation());
        assert!(!session.connection_error);
        assert!(session.last_error.is_none());
    }

    #[test]
    fn system_check_seeds_the_model_selection_once() {
        let mut session = SessionState::new();
        let mut info = SystemInfo::default();
        info.recommended_model = "llama3:8b".to_string();
        session.record_system_check(info.clone());
        assert_eq!(session.selected_model, "llama3:8b");

        // A later re-check must not clobber an explicit choice.
        session.selected_model = "mistral".to_string();
        session.record_system_check(info);
        assert_eq!(session.selected_model, "mistral");
    }

    #[test]
    fn pull_progress_is_monotonic_and_capped() {
        let mut session = SessionState::new();
        session.record_pull_progress(30);
        session.record_pull_progress(10); // late tick must not move the gauge back
        assert_eq!(session.download_progress, 30);
        session.record_pull_progress(150);
        assert_eq!(session.download_progress, 100);
        assert!(session.download_started);
        assert!(!session.download_complete);
    }

    #[test]
    fn failed_pull_leaves_the_download_unconfirmed() {
        let mut session = SessionState::new();
        session.record_pull_progress(100);
        session.record_failure(ApiError::Generic);
        assert!(!session.download_complete);
        assert!(!session.connection_error);
        assert_eq!(
            session.last_error.as_deref(),
            Some(ApiError::Generic.user_message())
        );
    }

    #[test]
    fn anonymization_failure_falls_back_and_classifies() {
        let mut session = SessionState::new();
        session.record_anonymization_failure(ApiError::ConnectionRefused);
        assert_eq!(session.anonymized_text, ANONYMIZE_FALLBACK);
        assert!(session.connection_error);
        assert!(!session.has_anonymized);
    }

    #[test]
    fn restart_returns_to_welcome_and_clears_the_texts() {
        let mut session = SessionState::new();
        session.current_step = WizardStep::Complete;
        session.sample_text = SAMPLE_LETTER.to_string();
        session.record_anonymization("Client: [NAME]".to_string());
        session.record_pull_success();
        session.check_complete = true;

        session.restart();
        assert_eq!(session.current_step, WizardStep::Welcome);
        assert!(session.sample_text.is_empty());
        assert!(session.anonymized_text.is_empty());
        assert!(!session.has_anonymized);
        // machine facts survive a restart
        assert!(session.check_complete);
        assert!(session.download_complete);
    }

    #[test]
    fn model_selection_cycles_the_catalog_both_ways() {
        let mut session = SessionState::new();
        session.selected_model = MODEL_CATALOG[0].id.to_string();
        session.select_next_model();
        assert_eq!(session.selected_model, MODEL_CATALOG[1].id);
        session.select_prev_model();
        session.select_prev_model();
        assert_eq!(session.selected_model, MODEL_CATALOG[2].id);
    }

    #[test]
    fn recommendation_prefers_the_8b_build() {
        assert_eq!(SystemInfo::recommend(Arch::X86_64), "llama3:8b");
        assert_eq!(SystemInfo::recommend(Arch::Arm64), "llama3:8b");
        assert_eq!(SystemInfo::recommend(Arch::Unknown), "llama3");
    }

    #[test]
    fn sample_letter_carries_the_pii_the_prompt_targets() {
        assert!(SAMPLE_LETTER.contains("Jean Dupont"));
        assert!(SAMPLE_LETTER.contains("021 123 45 67"));
        assert!(SAMPLE_LETTER.contains("jean.dupont@example.ch"));
    }
}
