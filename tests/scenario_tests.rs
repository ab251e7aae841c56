use console_nav::entities::clusters::Profiling;
use console_nav::entities::users::UserChanges;
use console_nav::scenario::{AssertionSpec, Scenario, ScenarioRunner, Step};
use console_nav::view::login::LoginView;
use console_nav::view::navbar::NavBarView;

mod common;

use common::utils::app;
use common::{Effect, FakeBrowser};

// ============================================================================
// YAML model
// ============================================================================

const FULL_SCENARIO: &str = r#"
name: Cluster lifecycle
description: import, check, unmanage
steps:
  - action: login
  - action: navigate
    subject: cluster=c1
    destination: Hosts
  - action: create_user
    user_id: jdoe
    name: John Doe
    email: jdoe@example.com
    password: passw0rd!
  - action: edit_user
    user_id: jdoe
    email: john@example.com
    notifications_on: true
  - action: delete_user
    user_id: jdoe
  - action: import_cluster
    cluster: c1
    name: prod
    profiling: leave_as_is
    view_progress: true
  - action: unmanage_cluster
    cluster: c1
    expect_success: false
  - action: enable_profiling
    cluster: c1
  - action: disable_profiling
    cluster: c1
  - action: expand_cluster
    cluster: c1
  - action: create_content_credential
    name: gpg-key
    content: "-----BEGIN PGP PUBLIC KEY BLOCK-----"
  - action: delete_content_credential
    name: gpg-key
  - action: create_template
    name: kickstart
    template: "<%= @host.name %>"
  - action: delete_template
    name: kickstart
  - action: wait
    duration_ms: 250
  - action: assert
    assertions:
      - type: user_exists
        user_id: jdoe
        expected: false
      - type: api_user_exists
        username: jdoe
      - type: cluster_status
        cluster: c1
        expected: Ready to Use
      - type: cluster_managed
        cluster: c1
      - type: cluster_profiling
        cluster: c1
        expected: Enabled
      - type: tasks_well_formed
        cluster: c1
      - type: task_logs_well_formed
        cluster: c1
        limit: 3
      - type: dashboard_matches
        cluster: c1
      - type: text_present
        expected: Clusters
      - type: text_absent
        expected: Error
      - type: destination_displayed
        subject: clusters
        destination: All
      - type: content_credential_exists
        name: gpg-key
        expected: false
      - type: template_exists
        name: kickstart
"#;

#[test]
fn parse_every_action() {
    let scenario: Scenario = serde_yaml::from_str(FULL_SCENARIO).unwrap();
    let actions: Vec<&str> = scenario.steps.iter().map(Step::action).collect();
    assert_eq!(
        actions,
        vec![
            "login",
            "navigate",
            "create_user",
            "edit_user",
            "delete_user",
            "import_cluster",
            "unmanage_cluster",
            "enable_profiling",
            "disable_profiling",
            "expand_cluster",
            "create_content_credential",
            "delete_content_credential",
            "create_template",
            "delete_template",
            "wait",
            "assert",
        ]
    );
}

#[test]
fn parse_defaults() {
    let scenario: Scenario = serde_yaml::from_str(FULL_SCENARIO).unwrap();

    match &scenario.steps[2] {
        Step::CreateUser(user) => {
            assert_eq!(user.role, "limited");
            assert!(!user.notifications_on);
        }
        other => panic!("Expected CreateUser, got {:?}", other),
    }
    match &scenario.steps[3] {
        Step::EditUser { user_id, changes } => {
            assert_eq!(user_id, "jdoe");
            assert_eq!(
                changes,
                &UserChanges {
                    email: Some("john@example.com".into()),
                    notifications_on: Some(true),
                    ..UserChanges::default()
                }
            );
        }
        other => panic!("Expected EditUser, got {:?}", other),
    }
    match &scenario.steps[5] {
        Step::ImportCluster {
            name,
            profiling,
            view_progress,
            expect_success,
            ..
        } => {
            assert_eq!(name.as_deref(), Some("prod"));
            assert_eq!(*profiling, Profiling::LeaveAsIs);
            assert!(*view_progress);
            assert!(*expect_success);
        }
        other => panic!("Expected ImportCluster, got {:?}", other),
    }
    match &scenario.steps[6] {
        Step::UnmanageCluster {
            view_progress,
            expect_success,
            ..
        } => {
            assert!(!*view_progress);
            assert!(!*expect_success);
        }
        other => panic!("Expected UnmanageCluster, got {:?}", other),
    }
    match &scenario.steps[10] {
        Step::CreateContentCredential(credential) => assert_eq!(credential.content_type, "GPG Key"),
        other => panic!("Expected CreateContentCredential, got {:?}", other),
    }
}

#[test]
fn parse_every_assertion_type() {
    let scenario: Scenario = serde_yaml::from_str(FULL_SCENARIO).unwrap();
    let Some(Step::Assert { assertions }) = scenario.steps.last() else {
        panic!("Expected a trailing assert step");
    };
    let types: Vec<&str> = assertions.iter().map(AssertionSpec::type_name).collect();
    assert_eq!(types.len(), 13);
    assert!(types.contains(&"task_logs_well_formed"));
    assert_eq!(
        assertions[3],
        AssertionSpec::ClusterManaged {
            cluster: "c1".into(),
            expected: true
        }
    );
    assert_eq!(
        assertions[1],
        AssertionSpec::ApiUserExists {
            username: "jdoe".into(),
            expected: true
        }
    );
}

#[test]
fn operation_outcome_cannot_be_written_in_yaml() {
    let yaml = r#"
type: operation_outcome
operation: import
cluster: c1
expect_success: true
"#;
    assert!(serde_yaml::from_str::<AssertionSpec>(yaml).is_err());
}

#[test]
fn unknown_action_is_rejected() {
    let yaml = "name: x\nsteps:\n  - action: reboot_cluster\n";
    assert!(serde_yaml::from_str::<Scenario>(yaml).is_err());
}

// ============================================================================
// Runner
// ============================================================================

fn logged_in(fake: &FakeBrowser) {
    let navbar = NavBarView::new();
    fake.show(&navbar.brand.locator).show(&navbar.clusters.locator);
}

#[test]
fn run_collects_assertion_results() {
    let fake = FakeBrowser::new();
    logged_in(&fake);
    fake.set_page_text("Clusters  Hosts  Volumes");
    let app = app(&fake);
    let scenario: Scenario = serde_yaml::from_str(
        r#"
name: landing page
steps:
  - action: login
  - action: assert
    assertions:
      - type: text_present
        expected: clusters
      - type: text_absent
        expected: Volumes
      - type: destination_displayed
        subject: web_ui
        destination: LoggedIn
"#,
    )
    .unwrap();

    let result = ScenarioRunner::run(&scenario, &app, None);

    assert!(result.error.is_none());
    assert_eq!(result.steps_run, 2);
    assert_eq!(result.assertion_results.len(), 3);
    assert!(result.assertion_results[0].passed);
    assert!(!result.assertion_results[1].passed);
    assert!(result.assertion_results[2].passed);
    assert!(!result.passed);
    assert!(fake.interactions().is_empty());
}

#[test]
fn failing_step_ends_the_run_with_page_text() {
    let fake = FakeBrowser::new();
    logged_in(&fake);
    fake.set_page_text("Internal Server Error");
    let app = app(&fake);
    let scenario = Scenario {
        name: "broken".into(),
        description: None,
        steps: vec![
            Step::Login,
            Step::Navigate {
                subject: "clusters".into(),
                destination: "Nowhere".into(),
            },
            Step::Wait { duration_ms: 0 },
        ],
    };

    let result = ScenarioRunner::run(&scenario, &app, None);

    assert!(!result.passed);
    assert_eq!(result.steps_run, 2);
    let error = result.error.unwrap();
    assert!(error.starts_with("Step 1 (navigate) failed"), "{}", error);
    assert!(error.contains("Nowhere"));
    assert_eq!(result.visible_text.as_deref(), Some("Internal Server Error"));
}

#[test]
fn assertion_errors_are_failures_not_aborts() {
    let fake = FakeBrowser::new();
    logged_in(&fake);
    let app = app(&fake);
    let scenario = Scenario {
        name: "checks".into(),
        description: None,
        steps: vec![Step::Assert {
            assertions: vec![
                AssertionSpec::UserExists {
                    user_id: "never-created".into(),
                    expected: true,
                },
                AssertionSpec::ApiUserExists {
                    username: "admin".into(),
                    expected: true,
                },
                AssertionSpec::DestinationDisplayed {
                    subject: "galaxy".into(),
                    destination: "All".into(),
                },
            ],
        }],
    };

    let result = ScenarioRunner::run(&scenario, &app, None);

    assert!(result.error.is_none());
    assert_eq!(result.assertion_results.len(), 3);
    assert!(result.assertion_results.iter().all(|r| !r.passed));
    assert!(result.assertion_results[1]
        .message
        .as_deref()
        .unwrap()
        .contains("no API client"));
    assert!(result.assertion_results[2]
        .message
        .as_deref()
        .unwrap()
        .contains("unknown subject kind"));
}

#[test]
fn login_step_drives_the_login_form() {
    let fake = FakeBrowser::new();
    let login = LoginView::new();
    let navbar = NavBarView::new();
    fake.on_open(
        "http://console.test/",
        vec![
            Effect::Show(login.username.locator.clone()),
            Effect::Show(login.password.locator.clone()),
            Effect::Show(login.submit.locator.clone()),
        ],
    );
    fake.on_click(
        &login.submit.locator,
        vec![
            Effect::Show(navbar.brand.locator.clone()),
            Effect::Show(navbar.clusters.locator.clone()),
        ],
    );
    let app = app(&fake);
    let scenario = Scenario {
        name: "login".into(),
        description: None,
        steps: vec![Step::Login],
    };

    let result = ScenarioRunner::run(&scenario, &app, None);

    assert!(result.passed, "{:?}", result.error);
    assert!(fake.was_clicked(&login.submit.locator));
}
