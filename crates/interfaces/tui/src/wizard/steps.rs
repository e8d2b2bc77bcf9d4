//! Step ordering and advance eligibility.

use super::session::SessionState;

/// The seven wizard steps, in walk-through order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    Welcome,
    SystemCheck,
    InstallOllama,
    ChooseModel,
    DownloadModel,
    TestAnonymize,
    Complete,
}

struct Edges {
    prev: WizardStep,
    next: WizardStep,
}

/// Transition table indexed by step discriminant.  Boundary steps point at
/// themselves, which makes `advance`/`retreat` no-ops there; `Complete` keeps
/// its single backward edge to the anonymization test.
const TRANSITIONS: [Edges; 7] = [
    // Welcome
    Edges {
        prev: WizardStep::Welcome,
        next: WizardStep::SystemCheck,
    },
    // SystemCheck
    Edges {
        prev: WizardStep::Welcome,
        next: WizardStep::InstallOllama,
    },
    // InstallOllama
    Edges {
        prev: WizardStep::SystemCheck,
        next: WizardStep::ChooseModel,
    },
    // ChooseModel
    Edges {
        prev: WizardStep::InstallOllama,
        next: WizardStep::DownloadModel,
    },
    // DownloadModel
    Edges {
        prev: WizardStep::ChooseModel,
        next: WizardStep::TestAnonymize,
    },
    // TestAnonymize
    Edges {
        prev: WizardStep::DownloadModel,
        next: WizardStep::Complete,
    },
    // Complete
    Edges {
        prev: WizardStep::TestAnonymize,
        next: WizardStep::Complete,
    },
];

impl WizardStep {
    pub fn all() -> [WizardStep; 7] {
        [
            WizardStep::Welcome,
            WizardStep::SystemCheck,
            WizardStep::InstallOllama,
            WizardStep::ChooseModel,
            WizardStep::DownloadModel,
            WizardStep::TestAnonymize,
            WizardStep::Complete,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::Welcome => "Welcome",
            WizardStep::SystemCheck => "System Check",
            WizardStep::InstallOllama => "Install Ollama",
            WizardStep::ChooseModel => "Choose a Model",
            WizardStep::DownloadModel => "Download Model",
            WizardStep::TestAnonymize => "Test Anonymization",
            WizardStep::Complete => "Complete",
        }
    }
}

/// Next step in the fixed ordering; staying put at `Complete`.
pub fn advance(current: WizardStep) -> WizardStep {
    TRANSITIONS[current as usize].next
}

/// Previous step in the fixed ordering; staying put at `Welcome`.
pub fn retreat(current: WizardStep) -> WizardStep {
    TRANSITIONS[current as usize].prev
}

/// Escape hatch taken when an API call reports the runtime unreachable,
/// regardless of where the user currently is.
pub fn jump_to_install() -> WizardStep {
    WizardStep::InstallOllama
}

/// Whether the user may leave `current` in the forward direction.
pub fn can_advance(current: WizardStep, session: &SessionState) -> bool {
    match current {
        WizardStep::Welcome | WizardStep::InstallOllama => true,
        WizardStep::SystemCheck => session.check_complete || session.connection_error,
        WizardStep::ChooseModel => !session.selected_model.is_empty(),
        WizardStep::DownloadModel => session.download_complete,
        WizardStep::TestAnonymize => session.has_anonymized,
        WizardStep::Complete => false,
    }
}

/// One-based position of `step` plus the total, for the progress gauge.
pub fn progress(step: WizardStep) -> (usize, usize) {
    (step as usize + 1, TRANSITIONS.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::session::SystemInfo;

    #[test]
    fn advance_then_retreat_returns_to_the_original_step() {
        for step in WizardStep::all() {
            if step == WizardStep::Complete {
                continue; // advance is a no-op there
            }
            assert_eq!(retreat(advance(step)), step, "round-trip from {step:?}");
        }
    }

    #[test]
    fn advance_walks_the_full_ordering() {
        let mut step = WizardStep::Welcome;
        let mut visited = vec![step];
        while step != WizardStep::Complete {
            step = advance(step);
            visited.push(step);
        }
        assert_eq!(visited, WizardStep::all());
    }

    #[test]
    fn boundaries_are_no_ops() {
        assert_eq!(retreat(WizardStep::Welcome), WizardStep::Welcome);
        assert_eq!(advance(WizardStep::Complete), WizardStep::Complete);
    }

    #[test]
    fn complete_retreats_to_the_anonymization_test() {
        assert_eq!(retreat(WizardStep::Complete), WizardStep::TestAnonymize);
    }

    #[test]
    fn jump_to_install_holds_from_every_step() {
        for _step in WizardStep::all() {
            assert_eq!(jump_to_install(), WizardStep::InstallOllama);
        }
    }

    #[test]
    fn system_check_gates_on_completion_or_error() {
        let mut session = SessionState::new();
        assert!(!can_advance(WizardStep::SystemCheck, &session));

        session.record_system_check(SystemInfo::default());
        assert!(can_advance(WizardStep::SystemCheck, &session));

        let mut errored = SessionState::new();
        errored.connection_error = true;
        assert!(can_advance(WizardStep::SystemCheck, &errored));
    }

    #[test]
    fn download_gates_on_a_recorded_successful_pull() {
        let mut session = SessionState::new();
        session.record_pull_progress(100);
        // a full gauge is not a confirmed pull
        assert!(!can_advance(WizardStep::DownloadModel, &session));

        session.record_pull_success();
        assert!(can_advance(WizardStep::DownloadModel, &session));
    }

    #[test]
    fn anonymization_test_gates_on_one_successful_run() {
        let mut session = SessionState::new();
        assert!(!can_advance(WizardStep::TestAnonymize, &session));

        session.record_anonymization("Client: [NAME]".to_string());
        assert!(can_advance(WizardStep::TestAnonymize, &session));
    }

    #[test]
    fn complete_is_absorbing() {
        let session = SessionState::new();
        assert!(!can_advance(WizardStep::Complete, &session));
    }

    #[test]
    fn progress_is_one_based_over_seven() {
        assert_eq!(progress(WizardStep::Welcome), (1, 7));
        assert_eq!(progress(WizardStep::Complete), (7, 7));
    }
}
