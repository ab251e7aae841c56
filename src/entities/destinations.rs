//! Every destination of the console and how to get there.

use crate::browser::Browser;
use crate::cli::config::ConsoleConfig;
use crate::entities::subject::{Subject, SubjectKind, PARENT, WEB_UI};
use crate::navigation::{NavigateStep, NavigationError, Prerequisite, Registry};
use crate::view::View;
use crate::view::clusters::ClustersView;
use crate::view::credentials::{ContentCredentialCreateView, ContentCredentialEditView, ContentCredentialsTableView};
use crate::view::dialogs::ImportClusterView;
use crate::view::login::LoginView;
use crate::view::navbar::{NavBarView, VerticalNav};
use crate::view::pages::{ClusterPageView, GrafanaClusterDashboard, TaskEventsView, TaskRow};
use crate::view::templates::{ProvisioningTemplateCreateView, ProvisioningTemplateDetailsView, ProvisioningTemplatesView};
use crate::view::users::{AddUserView, EditUserView, UsersView};
use crate::wait::Wait;

const LOGGED_IN: Prerequisite = Prerequisite::RelatedVia {
    attribute: WEB_UI,
    destination: "LoggedIn",
};

const PARENT_ALL: Prerequisite = Prerequisite::RelatedVia {
    attribute: PARENT,
    destination: "All",
};

/// Build the registry of all console destinations.
pub fn registry(console: &ConsoleConfig) -> Result<Registry<Subject>, NavigationError> {
    let mut registry = Registry::new();

    registry.register(SubjectKind::WebUi, "LoginPage", LoginPage { url: console.base_url() })?;
    registry.register(
        SubjectKind::WebUi,
        "LoggedIn",
        LoggedIn {
            username: console.username.clone(),
            password: console.password.clone(),
        },
    )?;

    registry.register(SubjectKind::Users, "All", UsersAll)?;
    registry.register(SubjectKind::Users, "Add", UsersAdd)?;
    registry.register(SubjectKind::User, "Edit", UserEdit)?;

    registry.register(SubjectKind::Clusters, "All", ClustersAll)?;
    registry.register(SubjectKind::Cluster, "Import", ClusterImport)?;
    registry.register(SubjectKind::Cluster, "Hosts", ClusterHosts)?;
    registry.register(SubjectKind::Cluster, "Volumes", ClusterSubPage::Volumes)?;
    registry.register(SubjectKind::Cluster, "Tasks", ClusterSubPage::Tasks)?;
    registry.register(SubjectKind::Cluster, "Events", ClusterSubPage::Events)?;
    registry.register(SubjectKind::Cluster, "Dashboard", ClusterDashboard)?;
    registry.register(SubjectKind::Task, "Events", TaskEvents)?;

    registry.register(SubjectKind::ContentCredentials, "All", ContentCredentialsAll)?;
    registry.register(SubjectKind::ContentCredentials, "New", ContentCredentialsNew)?;
    registry.register(SubjectKind::ContentCredential, "Edit", ContentCredentialEdit)?;

    registry.register(SubjectKind::Templates, "All", TemplatesAll)?;
    registry.register(SubjectKind::Templates, "New", TemplatesNew)?;
    registry.register(SubjectKind::Template, "Edit", TemplateEdit)?;

    Ok(registry)
}

// ============================================================================
// Web UI
// ============================================================================

/// Open the console URL; anonymous sessions land on the login form.
struct LoginPage {
    url: String,
}

impl NavigateStep<Subject> for LoginPage {
    fn view(&self, _: &Subject) -> Box<dyn View> {
        Box::new(LoginView::new())
    }

    fn step(&self, _: &Subject, browser: &mut dyn Browser) -> Result<(), NavigationError> {
        browser.open(&self.url)?;
        Ok(())
    }
}

struct LoggedIn {
    username: String,
    password: String,
}

impl NavigateStep<Subject> for LoggedIn {
    fn view(&self, _: &Subject) -> Box<dyn View> {
        Box::new(NavBarView::new())
    }

    fn prerequisite(&self) -> Prerequisite {
        Prerequisite::SameSubject("LoginPage")
    }

    fn step(&self, _: &Subject, browser: &mut dyn Browser) -> Result<(), NavigationError> {
        let login = LoginView::new();
        login.fill(browser, &self.username, &self.password)?;
        login.submit.click(browser)?;
        Ok(())
    }

    fn wait(&self) -> Option<Wait> {
        Some(Wait::secs(60).delay_secs(1).message("login did not complete"))
    }
}

// ============================================================================
// Users
// ============================================================================

struct UsersAll;

impl NavigateStep<Subject> for UsersAll {
    fn view(&self, _: &Subject) -> Box<dyn View> {
        Box::new(UsersView::new())
    }

    fn prerequisite(&self) -> Prerequisite {
        LOGGED_IN
    }

    fn step(&self, _: &Subject, browser: &mut dyn Browser) -> Result<(), NavigationError> {
        NavBarView::new().admin.select(browser, "Users")?;
        Ok(())
    }
}

struct UsersAdd;

impl NavigateStep<Subject> for UsersAdd {
    fn view(&self, _: &Subject) -> Box<dyn View> {
        Box::new(AddUserView::new())
    }

    fn prerequisite(&self) -> Prerequisite {
        Prerequisite::SameSubject("All")
    }

    fn step(&self, _: &Subject, browser: &mut dyn Browser) -> Result<(), NavigationError> {
        UsersView::new().add_user.click(browser)?;
        Ok(())
    }
}

struct UserEdit;

impl NavigateStep<Subject> for UserEdit {
    fn view(&self, _: &Subject) -> Box<dyn View> {
        Box::new(EditUserView::new())
    }

    fn prerequisite(&self) -> Prerequisite {
        PARENT_ALL
    }

    fn step(&self, subject: &Subject, browser: &mut dyn Browser) -> Result<(), NavigationError> {
        UsersView::new()
            .actions(subject.identity())?
            .select(browser, "Edit")?;
        Ok(())
    }
}

// ============================================================================
// Clusters
// ============================================================================

/// Choose "All Clusters" in the context selector.
struct ClustersAll;

impl NavigateStep<Subject> for ClustersAll {
    fn view(&self, _: &Subject) -> Box<dyn View> {
        Box::new(ClustersView::new())
    }

    fn prerequisite(&self) -> Prerequisite {
        LOGGED_IN
    }

    fn step(&self, _: &Subject, browser: &mut dyn Browser) -> Result<(), NavigationError> {
        browser.select(&NavBarView::new().clusters.locator, "All Clusters")?;
        Ok(())
    }
}

/// Import button of the cluster's row.
struct ClusterImport;

impl NavigateStep<Subject> for ClusterImport {
    fn view(&self, _: &Subject) -> Box<dyn View> {
        Box::new(ImportClusterView::new())
    }

    fn prerequisite(&self) -> Prerequisite {
        PARENT_ALL
    }

    fn step(&self, subject: &Subject, browser: &mut dyn Browser) -> Result<(), NavigationError> {
        ClustersView::new()
            .cluster(subject.identity())
            .import_button
            .click(browser)?;
        Ok(())
    }
}

/// Pick the cluster in the context selector; lands on its hosts.
struct ClusterHosts;

impl NavigateStep<Subject> for ClusterHosts {
    fn view(&self, _: &Subject) -> Box<dyn View> {
        Box::new(ClusterPageView::hosts())
    }

    fn prerequisite(&self) -> Prerequisite {
        PARENT_ALL
    }

    fn step(&self, subject: &Subject, browser: &mut dyn Browser) -> Result<(), NavigationError> {
        browser.select(&NavBarView::new().clusters.locator, subject.identity())?;
        Ok(())
    }
}

/// Pages reached from the hosts page through the vertical navigation.
enum ClusterSubPage {
    Volumes,
    Tasks,
    Events,
}

impl NavigateStep<Subject> for ClusterSubPage {
    fn view(&self, _: &Subject) -> Box<dyn View> {
        Box::new(match self {
            ClusterSubPage::Volumes => ClusterPageView::volumes(),
            ClusterSubPage::Tasks => ClusterPageView::tasks(),
            ClusterSubPage::Events => ClusterPageView::events(),
        })
    }

    fn prerequisite(&self) -> Prerequisite {
        Prerequisite::SameSubject("Hosts")
    }

    fn step(&self, _: &Subject, browser: &mut dyn Browser) -> Result<(), NavigationError> {
        let nav = VerticalNav::new();
        let link = match self {
            ClusterSubPage::Volumes => nav.volumes,
            ClusterSubPage::Tasks => nav.tasks,
            ClusterSubPage::Events => nav.events,
        };
        link.click(browser)?;
        Ok(())
    }
}

/// Dashboard button opens Grafana in a new window; switch to it.
struct ClusterDashboard;

impl NavigateStep<Subject> for ClusterDashboard {
    fn view(&self, _: &Subject) -> Box<dyn View> {
        Box::new(GrafanaClusterDashboard::new())
    }

    fn prerequisite(&self) -> Prerequisite {
        PARENT_ALL
    }

    fn step(&self, subject: &Subject, browser: &mut dyn Browser) -> Result<(), NavigationError> {
        ClustersView::new()
            .cluster(subject.identity())
            .dashboard_button
            .click(browser)?;

        let wait = Wait::secs(10).delay_secs(1);
        let (handle, _) = wait
            .until_some(|| {
                let handles = browser.window_handles().ok()?;
                handles.get(1).cloned()
            })
            .map_err(|_| NavigationError::Step {
                destination: "Dashboard".into(),
                message: "dashboard window did not open".into(),
            })?;
        browser.switch_to_window(&handle)?;
        Ok(())
    }

    fn wait(&self) -> Option<Wait> {
        Some(Wait::secs(300).delay_secs(2))
    }
}

/// Task log, opened from the cluster's tasks page.
struct TaskEvents;

impl NavigateStep<Subject> for TaskEvents {
    fn view(&self, _: &Subject) -> Box<dyn View> {
        Box::new(TaskEventsView::new())
    }

    fn prerequisite(&self) -> Prerequisite {
        Prerequisite::RelatedVia {
            attribute: PARENT,
            destination: "Tasks",
        }
    }

    fn step(&self, subject: &Subject, browser: &mut dyn Browser) -> Result<(), NavigationError> {
        let tasks = ClusterPageView::tasks();
        browser.click(&TaskRow::link(&tasks.list, subject.identity()))?;
        Ok(())
    }
}

// ============================================================================
// Content credentials
// ============================================================================

struct ContentCredentialsAll;

impl NavigateStep<Subject> for ContentCredentialsAll {
    fn view(&self, _: &Subject) -> Box<dyn View> {
        Box::new(ContentCredentialsTableView::new())
    }

    fn prerequisite(&self) -> Prerequisite {
        LOGGED_IN
    }

    fn step(&self, _: &Subject, browser: &mut dyn Browser) -> Result<(), NavigationError> {
        NavBarView::new().content.select(browser, "Content Credentials")?;
        Ok(())
    }
}

struct ContentCredentialsNew;

impl NavigateStep<Subject> for ContentCredentialsNew {
    fn view(&self, _: &Subject) -> Box<dyn View> {
        Box::new(ContentCredentialCreateView::new())
    }

    fn prerequisite(&self) -> Prerequisite {
        Prerequisite::SameSubject("All")
    }

    fn step(&self, _: &Subject, browser: &mut dyn Browser) -> Result<(), NavigationError> {
        ContentCredentialsTableView::new().new.click(browser)?;
        Ok(())
    }
}

struct ContentCredentialEdit;

impl NavigateStep<Subject> for ContentCredentialEdit {
    fn view(&self, _: &Subject) -> Box<dyn View> {
        Box::new(ContentCredentialEditView::new())
    }

    fn prerequisite(&self) -> Prerequisite {
        PARENT_ALL
    }

    fn step(&self, subject: &Subject, browser: &mut dyn Browser) -> Result<(), NavigationError> {
        let view = ContentCredentialsTableView::new();
        view.search.search(browser, subject.identity())?;
        browser.click(&view.name_link(subject.identity())?)?;
        Ok(())
    }
}

// ============================================================================
// Provisioning templates
// ============================================================================

struct TemplatesAll;

impl NavigateStep<Subject> for TemplatesAll {
    fn view(&self, _: &Subject) -> Box<dyn View> {
        Box::new(ProvisioningTemplatesView::new())
    }

    fn prerequisite(&self) -> Prerequisite {
        LOGGED_IN
    }

    fn step(&self, _: &Subject, browser: &mut dyn Browser) -> Result<(), NavigationError> {
        NavBarView::new().content.select(browser, "Provisioning Templates")?;
        Ok(())
    }
}

struct TemplatesNew;

impl NavigateStep<Subject> for TemplatesNew {
    fn view(&self, _: &Subject) -> Box<dyn View> {
        Box::new(ProvisioningTemplateCreateView::new())
    }

    fn prerequisite(&self) -> Prerequisite {
        Prerequisite::SameSubject("All")
    }

    fn step(&self, _: &Subject, browser: &mut dyn Browser) -> Result<(), NavigationError> {
        ProvisioningTemplatesView::new().new.click(browser)?;
        Ok(())
    }
}

struct TemplateEdit;

impl NavigateStep<Subject> for TemplateEdit {
    fn view(&self, _: &Subject) -> Box<dyn View> {
        Box::new(ProvisioningTemplateDetailsView::new())
    }

    fn prerequisite(&self) -> Prerequisite {
        PARENT_ALL
    }

    fn step(&self, subject: &Subject, browser: &mut dyn Browser) -> Result<(), NavigationError> {
        let view = ProvisioningTemplatesView::new();
        view.search.search(browser, subject.identity())?;
        browser.click(&view.name_link(subject.identity())?)?;
        Ok(())
    }
}
