//! Scenario runner – execute scripted key sequences from YAML files.

use crate::calculator::Calculator;
use crate::commands::CommandRegistry;
use crate::types::*;

/// Load a scenario from a YAML string.
pub fn load_scenario(yaml: &str) -> Result<Scenario, String> {
    serde_yaml::from_str(yaml).map_err(|e| format!("failed to parse scenario YAML: {}", e))
}

/// Execute a scenario against one calculator and return the overall result.
pub fn run_scenario(
    scenario: &Scenario,
    calc: &mut Calculator,
    registry: &CommandRegistry,
) -> ScenarioResult {
    let mut step_results = Vec::new();
    let mut overall = Status::Pass;

    for (i, step) in scenario.steps.iter().enumerate() {
        let result = match step {
            ScenarioStep::Press {
                press,
                expect_display,
                expect_history,
                expect_status,
            } => {
                let mut r =
                    registry.execute("press", serde_json::json!({ "keys": press }), calc);
                if r.status != *expect_status {
                    tracing::warn!(
                        step = i,
                        expected = %expect_status,
                        actual = %r.status,
                        "scenario step status mismatch"
                    );
                    overall = Status::Fail;
                }
                if let Some(want) = expect_display {
                    if calc.display() != want {
                        tracing::warn!(
                            step = i,
                            keys = %press,
                            expected = %want,
                            actual = %calc.display(),
                            "scenario display mismatch"
                        );
                        r.status = Status::Fail;
                        overall = Status::Fail;
                    }
                }
                if let Some(want) = expect_history {
                    let actual = calc.history_text();
                    if actual != *want {
                        tracing::warn!(
                            step = i,
                            keys = %press,
                            expected = %want,
                            actual = %actual,
                            "scenario history mismatch"
                        );
                        r.status = Status::Fail;
                        overall = Status::Fail;
                    }
                }
                r
            }
            ScenarioStep::Call {
                call,
                args,
                expect_status,
            } => {
                let r = registry.execute(call, args.clone(), calc);
                if r.status != *expect_status {
                    tracing::warn!(
                        step = i,
                        expected = %expect_status,
                        actual = %r.status,
                        "scenario step status mismatch"
                    );
                    overall = Status::Fail;
                }
                r
            }
        };
        step_results.push(result);
    }

    ScenarioResult {
        name: scenario.name.clone(),
        overall_status: overall,
        step_results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_yaml(yaml: &str) -> ScenarioResult {
        let scenario = load_scenario(yaml).expect("should parse");
        let mut calc = Calculator::new();
        let reg = CommandRegistry::new();
        run_scenario(&scenario, &mut calc, &reg)
    }

    #[test]
    fn test_parse_scenario() {
        let yaml = r#"
name: basic test
steps:
  - press: "3 + 4"
    expect_history: "3 + 4"
  - call: "state"
  - call: "clear_all"
    args: {}
    expect_status: "pass"
"#;
        let s = load_scenario(yaml).expect("should parse");
        assert_eq!(s.name, Some("basic test".into()));
        assert_eq!(s.steps.len(), 3);
        assert!(matches!(s.steps[0], ScenarioStep::Press { .. }));
        assert!(matches!(s.steps[1], ScenarioStep::Call { .. }));
    }

    #[test]
    fn test_run_bundled_scenario() {
        let result = run_yaml(include_str!("../scenarios/keypad.yaml"));
        assert_eq!(result.overall_status, Status::Pass, "{:#?}", result);
        assert!(result.step_results.len() > 5);
    }

    #[test]
    fn test_display_mismatch_fails() {
        let result = run_yaml(
            r#"
steps:
  - press: "3 + 4 × 2 ="
    expect_display: "11"
"#,
        );
        assert_eq!(result.overall_status, Status::Fail);
        assert_eq!(result.step_results[0].status, Status::Fail);
    }

    #[test]
    fn test_expected_error_passes() {
        let result = run_yaml(
            r#"
steps:
  - press: "1 . . 2 +"
    expect_status: "error"
  - call: "clear_entry"
  - press: "2 ="
    expect_display: "2"
"#,
        );
        assert_eq!(result.overall_status, Status::Pass);
        assert_eq!(result.step_results[0].status, Status::Error);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let yaml = r#"
steps:
  - press: "1"
    expect_status: "maybe"
"#;
        assert!(load_scenario(yaml).is_err());
    }
}
