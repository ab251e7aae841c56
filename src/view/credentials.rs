use crate::browser::{Browser, BrowserError, Locator};
use crate::view::dialogs::ConfirmationView;
use crate::view::widgets::{BreadCrumb, Dropdown, SearchBox, Table, Text, TextInput};
use crate::view::{all_displayed, View};

#[derive(Debug, Clone)]
pub struct ContentCredentialsTableView {
    pub title: Text,
    pub new: Text,
    pub search: SearchBox,
    pub table: Table,
}

impl ContentCredentialsTableView {
    pub fn new() -> Self {
        Self {
            title: Text::xpath("//h2[contains(., 'Content Credentials')]"),
            new: Text::xpath("//button[contains(@href, '/content_credentials/new')]"),
            search: SearchBox::default(),
            table: Table::new(Locator::xpath("//table"), &["Name", "Organization", "Products", "Repositories"]),
        }
    }

    /// Link to the edit page of a credential.
    pub fn name_link(&self, name: &str) -> Result<Locator, BrowserError> {
        Ok(self.table.cell_by("Name", name, "Name")?.child("./a"))
    }
}

impl Default for ContentCredentialsTableView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for ContentCredentialsTableView {
    fn name(&self) -> &'static str {
        "ContentCredentialsTableView"
    }

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        all_displayed(browser, &[&self.title.locator])
    }
}

#[derive(Debug, Clone)]
pub struct ContentCredentialCreateView {
    pub breadcrumb: BreadCrumb,
    pub name: TextInput,
    pub content_type: Dropdown,
    pub content: TextInput,
    pub submit: Text,
}

impl ContentCredentialCreateView {
    pub fn new() -> Self {
        Self {
            breadcrumb: BreadCrumb::default(),
            name: TextInput::id("name"),
            content_type: Dropdown::new(Locator::id("content_type")),
            content: TextInput::new(Locator::name("content")),
            submit: Text::xpath("//button[contains(@ng-click, 'handleSave')]"),
        }
    }
}

impl Default for ContentCredentialCreateView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for ContentCredentialCreateView {
    fn name(&self) -> &'static str {
        "ContentCredentialCreateView"
    }

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        self.breadcrumb
            .matches(browser, "Content Credential", |current| current == "New Content Credential")
    }
}

#[derive(Debug, Clone)]
pub struct ContentCredentialEditView {
    pub breadcrumb: BreadCrumb,
    pub remove: Text,
    pub dialog: ConfirmationView,
}

impl ContentCredentialEditView {
    pub fn new() -> Self {
        Self {
            breadcrumb: BreadCrumb::default(),
            remove: Text::xpath("//button[contains(., 'Remove Content Credential')]"),
            dialog: ConfirmationView::with_button("RemoveCredentialDialog", "Remove"),
        }
    }
}

impl Default for ContentCredentialEditView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for ContentCredentialEditView {
    fn name(&self) -> &'static str {
        "ContentCredentialEditView"
    }

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        self.breadcrumb
            .matches(browser, "Content Credential", |current| current != "New Content Credential")
    }
}
