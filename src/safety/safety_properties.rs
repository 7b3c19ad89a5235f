//! Property-based tests for the confirmation gate.

#[cfg(test)]
mod tests {
    use crate::safety::{ConfirmationGate, GateState};
    use crate::test_utils::ScriptedPromptHandler;
    use crate::types::ScanTarget;
    use crate::types::error::S3rError;
    use proptest::prelude::*;
    use std::sync::atomic::Ordering;

    // --- Generators ---

    /// Lines whose first token is neither `yes` nor `no`.
    fn unrecognized_line() -> impl Strategy<Value = String> {
        "[ \t]{0,2}[a-zA-Z]{0,6}( [a-z]{1,4})?"
            .prop_filter("must not start with a terminal token", |line| {
                !matches!(line.split_whitespace().next(), Some("yes") | Some("no"))
            })
    }

    fn target() -> ScanTarget {
        ScanTarget::new("b", "x/")
    }

    #[test]
    fn listed_answers_keep_prompting() {
        for answer in ["maybe", "YES", "y", "Yes", "No", "", "   ", "yess", "nope"] {
            let mut gate = ConfirmationGate::new();
            assert_eq!(gate.feed(answer), GateState::Prompting, "{answer:?}");
        }
    }

    #[test]
    fn yes_confirms_and_stops_consuming() {
        let handler = ScriptedPromptHandler::new(&["maybe\n", "yes\n", "no\n"]);
        let reads = handler.read_counter();
        let mut gate = ConfirmationGate::new();

        let state = gate.run(&handler, &target()).unwrap();

        assert_eq!(state, GateState::Confirmed);
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn no_declines_and_stops_consuming() {
        let handler = ScriptedPromptHandler::new(&["no\n", "yes\n"]);
        let reads = handler.read_counter();
        let mut gate = ConfirmationGate::new();

        let state = gate.run(&handler, &target()).unwrap();

        assert_eq!(state, GateState::Declined);
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn only_first_token_counts() {
        let mut gate = ConfirmationGate::new();
        assert_eq!(gate.feed("  yes please\n"), GateState::Confirmed);

        let mut gate = ConfirmationGate::new();
        assert_eq!(gate.feed("maybe yes"), GateState::Prompting);
    }

    #[test]
    fn first_prompt_names_the_path_and_retries_are_short() {
        let handler = ScriptedPromptHandler::new(&["\n", "no\n"]);
        let mut gate = ConfirmationGate::new();

        gate.run(&handler, &target()).unwrap();

        let prompts = handler.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].starts_with("Path: \"s3://b/x/\"\n"));
        assert!(prompts[0].contains("[yes/no]"));
        assert_eq!(
            prompts[1],
            "Please enter \"yes\" to confirm or \"no\" to cancel: "
        );
    }

    #[test]
    fn end_of_input_is_fatal() {
        let handler = ScriptedPromptHandler::new(&["maybe\n"]);
        let mut gate = ConfirmationGate::new();

        let err = gate.run(&handler, &target()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<S3rError>(),
            Some(S3rError::Input(_))
        ));
        assert_eq!(gate.state(), GateState::Prompting);
    }

    #[test]
    fn read_error_is_fatal() {
        let handler = ScriptedPromptHandler::failing();
        let mut gate = ConfirmationGate::new();

        let err = gate.run(&handler, &target()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<S3rError>(),
            Some(S3rError::Input(_))
        ));
    }

    proptest! {
        #[test]
        fn unrecognized_input_never_transitions(
            lines in proptest::collection::vec(unrecognized_line(), 0..20)
        ) {
            let mut gate = ConfirmationGate::new();
            for line in &lines {
                prop_assert_eq!(gate.feed(line), GateState::Prompting);
            }
        }

        #[test]
        fn terminal_state_is_sticky(
            confirm in any::<bool>(),
            lines in proptest::collection::vec("(yes|no|[a-z]{0,5})", 0..10)
        ) {
            let mut gate = ConfirmationGate::new();
            let terminal = gate.feed(if confirm { "yes" } else { "no" });
            for line in &lines {
                prop_assert_eq!(gate.feed(line), terminal);
            }
        }

        #[test]
        fn run_reads_exactly_up_to_the_terminal_answer(
            noise in proptest::collection::vec(unrecognized_line(), 0..10),
            confirm in any::<bool>(),
        ) {
            let mut script: Vec<String> = noise.iter().map(|l| format!("{l}\n")).collect();
            script.push(if confirm { "yes\n".to_string() } else { "no\n".to_string() });
            script.push("yes\n".to_string());
            let refs: Vec<&str> = script.iter().map(String::as_str).collect();

            let handler = ScriptedPromptHandler::new(&refs);
            let reads = handler.read_counter();
            let mut gate = ConfirmationGate::new();

            let state = gate.run(&handler, &target()).unwrap();

            let expected = if confirm { GateState::Confirmed } else { GateState::Declined };
            prop_assert_eq!(state, expected);
            prop_assert_eq!(reads.load(Ordering::SeqCst), noise.len() + 1);
        }
    }
}
