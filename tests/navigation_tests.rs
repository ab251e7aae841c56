use std::fmt;
use std::time::Duration;

use console_nav::browser::{Browser, Locator};
use console_nav::entities::Subject as ConsoleSubject;
use console_nav::navigation::{NavigateStep, NavigationError, Navigator, Prerequisite, Registry, Subject};
use console_nav::trace::logger::TraceLogger;
use console_nav::trace::trace::{NavOutcome, TraceEvent};
use console_nav::view::View;
use console_nav::view::login::LoginView;
use console_nav::view::navbar::NavBarView;
use console_nav::wait::Wait;
use proptest::prelude::*;

mod common;

use common::utils::app;
use common::{Effect, FakeBrowser, Interaction};

// ============================================================================
// A small site: pages named by strings, entities with a parent
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Site {
    Root,
    Item(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SiteKind {
    Root,
    Item,
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Site::Root => write!(f, "root"),
            Site::Item(name) => write!(f, "item={}", name),
        }
    }
}

impl Subject for Site {
    type Kind = SiteKind;

    fn kind(&self) -> SiteKind {
        match self {
            Site::Root => SiteKind::Root,
            Site::Item(_) => SiteKind::Item,
        }
    }

    fn related(&self, attribute: &str) -> Option<Site> {
        match (attribute, self) {
            ("parent", Site::Item(_)) => Some(Site::Root),
            _ => None,
        }
    }
}

/// View that is displayed while one marker element is visible.
struct Marker(&'static str);

impl View for Marker {
    fn name(&self) -> &'static str {
        self.0
    }

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        browser.is_displayed(&marker(self.0)).unwrap_or(false)
    }
}

fn marker(name: &str) -> Locator {
    Locator::id(name)
}

fn link(name: &str) -> Locator {
    Locator::xpath(format!("//a[@href='#{}']", name))
}

/// Clicks the link named after the destination.
struct Page {
    name: &'static str,
    prerequisite: Prerequisite,
}

impl NavigateStep<Site> for Page {
    fn view(&self, _: &Site) -> Box<dyn View> {
        Box::new(Marker(self.name))
    }

    fn prerequisite(&self) -> Prerequisite {
        self.prerequisite
    }

    fn step(&self, _: &Site, browser: &mut dyn Browser) -> Result<(), NavigationError> {
        browser.click(&link(self.name))?;
        Ok(())
    }
}

fn page(name: &'static str, prerequisite: Prerequisite) -> Page {
    Page { name, prerequisite }
}

/// Clicking `link(name)` shows `marker(name)` and hides every other marker.
fn wire(fake: &FakeBrowser, names: &[&str]) {
    for name in names {
        let mut effects: Vec<Effect> = names
            .iter()
            .filter(|other| *other != name)
            .map(|other| Effect::Hide(marker(other)))
            .collect();
        effects.push(Effect::Show(marker(name)));
        fake.on_click(&link(name), effects);
    }
}

fn navigator(registry: Registry<Site>) -> Navigator<Site> {
    Navigator::new(registry).with_wait(Wait::new(Duration::ZERO).delay(Duration::from_millis(1)))
}

fn site_registry() -> Registry<Site> {
    let mut registry = Registry::new();
    registry.register(SiteKind::Root, "Home", page("Home", Prerequisite::None)).unwrap();
    registry
        .register(SiteKind::Root, "List", page("List", Prerequisite::SameSubject("Home")))
        .unwrap();
    registry
        .register(
            SiteKind::Item,
            "Details",
            page(
                "Details",
                Prerequisite::RelatedVia {
                    attribute: "parent",
                    destination: "List",
                },
            ),
        )
        .unwrap();
    registry
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn already_there_performs_no_interaction() {
    let fake = FakeBrowser::new();
    fake.show(&marker("List"));
    let nav = navigator(site_registry());

    let view = nav.navigate_to(&mut fake.clone(), &Site::Root, "List").unwrap();

    assert_eq!(view.name(), "List");
    assert!(fake.interactions().is_empty());
}

#[test]
fn prerequisites_resolve_in_order() {
    let fake = FakeBrowser::new();
    wire(&fake, &["Home", "List", "Details"]);
    let nav = navigator(site_registry());

    let view = nav
        .navigate_to(&mut fake.clone(), &Site::Item("a".into()), "Details")
        .unwrap();

    assert_eq!(view.name(), "Details");
    assert_eq!(fake.clicks(), vec![link("Home"), link("List"), link("Details")]);
}

#[test]
fn chain_stops_at_first_destination_already_displayed() {
    let fake = FakeBrowser::new();
    wire(&fake, &["Home", "List", "Details"]);
    fake.show(&marker("Home"));
    let nav = navigator(site_registry());

    nav.navigate_to(&mut fake.clone(), &Site::Item("a".into()), "Details")
        .unwrap();

    assert_eq!(fake.clicks(), vec![link("List"), link("Details")]);
}

#[test]
fn unregistered_destination_is_an_error() {
    let fake = FakeBrowser::new();
    let nav = navigator(site_registry());

    let err = nav
        .navigate_to(&mut fake.clone(), &Site::Root, "Nowhere")
        .err()
        .unwrap();

    assert!(matches!(
        err,
        NavigationError::Unregistered { ref destination, .. } if destination == "Nowhere"
    ));
    assert!(fake.interactions().is_empty());
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = site_registry();
    let err = registry
        .register(SiteKind::Root, "Home", page("Home", Prerequisite::None))
        .unwrap_err();
    assert!(matches!(err, NavigationError::Duplicate { .. }));
    assert_eq!(registry.len(), 3);
}

#[test]
fn same_name_for_different_kinds_is_allowed() {
    let mut registry = Registry::<Site>::new();
    registry.register(SiteKind::Root, "Edit", page("Edit", Prerequisite::None)).unwrap();
    registry.register(SiteKind::Item, "Edit", page("Edit", Prerequisite::None)).unwrap();
    assert!(registry.contains(SiteKind::Root, "Edit"));
    assert!(registry.contains(SiteKind::Item, "Edit"));
}

#[test]
fn cyclic_prerequisites_are_detected() {
    let mut registry = Registry::new();
    registry
        .register(SiteKind::Root, "A", page("A", Prerequisite::SameSubject("B")))
        .unwrap();
    registry
        .register(SiteKind::Root, "B", page("B", Prerequisite::SameSubject("A")))
        .unwrap();
    let fake = FakeBrowser::new();

    let err = navigator(registry)
        .navigate_to(&mut fake.clone(), &Site::Root, "A")
        .err()
        .unwrap();

    match err {
        NavigationError::Cycle { chain } => {
            assert_eq!(chain, vec!["Root:A", "Root:B", "Root:A"]);
        }
        other => panic!("Expected Cycle, got {:?}", other),
    }
    assert!(fake.clicks().is_empty());
}

#[test]
fn relation_without_target_is_unresolved() {
    let mut registry = Registry::new();
    registry
        .register(
            SiteKind::Root,
            "Orphan",
            page(
                "Orphan",
                Prerequisite::RelatedVia {
                    attribute: "parent",
                    destination: "Home",
                },
            ),
        )
        .unwrap();
    let fake = FakeBrowser::new();

    let err = navigator(registry)
        .navigate_to(&mut fake.clone(), &Site::Root, "Orphan")
        .err()
        .unwrap();

    assert!(matches!(
        err,
        NavigationError::UnresolvedRelation { ref attribute, .. } if attribute == "parent"
    ));
}

#[test]
fn depth_bound_stops_long_chains() {
    let names: Vec<&'static str> = (0..6)
        .map(|i| &*Box::leak(format!("P{}", i).into_boxed_str()))
        .collect();
    let mut registry = Registry::new();
    registry.register(SiteKind::Root, names[0], page(names[0], Prerequisite::None)).unwrap();
    for pair in names.windows(2) {
        registry
            .register(SiteKind::Root, pair[1], page(pair[1], Prerequisite::SameSubject(pair[0])))
            .unwrap();
    }
    let fake = FakeBrowser::new();

    let err = navigator(registry)
        .with_max_depth(3)
        .navigate_to(&mut fake.clone(), &Site::Root, "P5")
        .err()
        .unwrap();

    assert!(matches!(err, NavigationError::TooDeep { limit: 3, .. }));
    assert!(fake.clicks().is_empty());
}

#[test]
fn timeout_carries_page_text() {
    let fake = FakeBrowser::new();
    fake.set_page_text("Server error 500");
    let nav = navigator(site_registry());

    let err = nav
        .navigate_to(&mut fake.clone(), &Site::Root, "Home")
        .err()
        .unwrap();

    match &err {
        NavigationError::Timeout {
            view, visible_text, ..
        } => {
            assert_eq!(*view, "Home");
            assert_eq!(visible_text, "Server error 500");
        }
        other => panic!("Expected Timeout, got {:?}", other),
    }
    assert!(err.to_string().contains("Server error 500"));
}

#[test]
fn destinations_are_listed_in_registration_order() {
    let registry = site_registry();
    let names: Vec<&str> = registry.destinations().iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["Home", "List", "Details"]);
    assert_eq!(
        registry.destinations()[2].prerequisite.to_string(),
        "parent.List"
    );
}

#[test]
fn trace_records_every_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nav.jsonl");
    let fake = FakeBrowser::new();
    wire(&fake, &["Home", "List"]);
    fake.show(&marker("Home"));
    let nav = navigator(site_registry()).with_trace(TraceLogger::new(path.to_str().unwrap()));

    nav.navigate_to(&mut fake.clone(), &Site::Root, "List").unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let events: Vec<TraceEvent> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].destination, "Home");
    assert_eq!(events[0].outcome, NavOutcome::AlreadyHere);
    assert_eq!(events[0].depth, 1);
    assert_eq!(events[1].destination, "List");
    assert_eq!(events[1].outcome, NavOutcome::Stepped);
    assert_eq!(events[1].depth, 0);
}

proptest! {
    /// A linear chain of n pages takes exactly n clicks from a blank page,
    /// and none once the last page is showing.
    #[test]
    fn linear_chain_clicks_each_page_once(len in 1usize..8) {
        let names: Vec<&'static str> = (0..len)
            .map(|i| &*Box::leak(format!("Step{}", i).into_boxed_str()))
            .collect();
        let mut registry = Registry::new();
        registry.register(SiteKind::Root, names[0], page(names[0], Prerequisite::None)).unwrap();
        for pair in names.windows(2) {
            registry
                .register(SiteKind::Root, pair[1], page(pair[1], Prerequisite::SameSubject(pair[0])))
                .unwrap();
        }
        let fake = FakeBrowser::new();
        wire(&fake, &names);
        let nav = navigator(registry);
        let last = names[len - 1];

        nav.navigate_to(&mut fake.clone(), &Site::Root, last).unwrap();
        prop_assert_eq!(fake.clicks().len(), len);

        nav.navigate_to(&mut fake.clone(), &Site::Root, last).unwrap();
        prop_assert_eq!(fake.clicks().len(), len);
    }
}

// ============================================================================
// Console destinations
// ============================================================================

fn wire_login(fake: &FakeBrowser) {
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
            Effect::Hide(login.username.locator.clone()),
            Effect::Hide(login.password.locator.clone()),
            Effect::Hide(login.submit.locator.clone()),
            Effect::Show(navbar.brand.locator.clone()),
            Effect::Show(navbar.clusters.locator.clone()),
        ],
    );
}

#[test]
fn login_opens_console_and_submits_credentials() {
    let fake = FakeBrowser::new();
    wire_login(&fake);
    let app = app(&fake);

    let view = app.navigate_to(&ConsoleSubject::WebUi, "LoggedIn").unwrap();

    assert_eq!(view.name(), "NavBarView");
    let login = LoginView::new();
    assert_eq!(
        fake.interactions(),
        vec![
            Interaction::Open("http://console.test/".into()),
            Interaction::Fill(login.username.locator.clone(), "admin".into()),
            Interaction::Fill(login.password.locator.clone(), "secret".into()),
            Interaction::Click(login.submit.locator.clone()),
        ]
    );
}

#[test]
fn logged_in_session_is_not_logged_in_again() {
    let fake = FakeBrowser::new();
    wire_login(&fake);
    let app = app(&fake);

    app.navigate_to(&ConsoleSubject::WebUi, "LoggedIn").unwrap();
    let before = fake.interactions().len();
    app.navigate_to(&ConsoleSubject::WebUi, "LoggedIn").unwrap();

    assert_eq!(fake.interactions().len(), before);
}

#[test]
fn console_registry_has_every_entity_destination() {
    let registry = console_nav::entities::destinations::registry(&common::utils::console()).unwrap();
    use console_nav::entities::SubjectKind::*;
    for (kind, name) in [
        (WebUi, "LoginPage"),
        (WebUi, "LoggedIn"),
        (Users, "All"),
        (Users, "Add"),
        (User, "Edit"),
        (Clusters, "All"),
        (Cluster, "Import"),
        (Cluster, "Hosts"),
        (Cluster, "Volumes"),
        (Cluster, "Tasks"),
        (Cluster, "Events"),
        (Cluster, "Dashboard"),
        (Task, "Events"),
        (ContentCredentials, "All"),
        (ContentCredentials, "New"),
        (ContentCredential, "Edit"),
        (Templates, "All"),
        (Templates, "New"),
        (Template, "Edit"),
    ] {
        assert!(registry.contains(kind, name), "missing {}:{}", kind, name);
    }
}

#[test]
fn task_events_resolve_through_the_owning_cluster() {
    let registry = console_nav::entities::destinations::registry(&common::utils::console()).unwrap();
    let step = registry
        .get(console_nav::entities::SubjectKind::Task, "Events")
        .unwrap();
    assert_eq!(
        step.prerequisite(),
        Prerequisite::RelatedVia {
            attribute: "parent",
            destination: "Tasks"
        }
    );
}
