use crate::browser::{Browser, BrowserError, Locator};
use crate::view::widgets::{ActionsMenu, BreadCrumb, Checkbox, Dropdown, SearchBox, Tab, Table, Text, TextInput};
use crate::view::{all_displayed, View};

#[derive(Debug, Clone)]
pub struct ProvisioningTemplatesView {
    pub title: Text,
    pub new: Text,
    pub search: SearchBox,
    pub table: Table,
}

impl ProvisioningTemplatesView {
    pub fn new() -> Self {
        Self {
            title: Text::xpath("//h1[contains(., 'Provisioning Templates')]"),
            new: Text::xpath("//a[contains(@href, '/templates/provisioning_templates/new')]"),
            search: SearchBox::default(),
            table: Table::new(Locator::xpath("//table"), &["Name", "Locked", "Snippet", "Type", "Actions"]),
        }
    }

    pub fn actions(&self, name: &str) -> Result<ActionsMenu, BrowserError> {
        Ok(ActionsMenu::new(self.table.cell_by("Name", name, "Actions")?))
    }

    pub fn name_link(&self, name: &str) -> Result<Locator, BrowserError> {
        Ok(self.table.cell_by("Name", name, "Name")?.child("./a"))
    }
}

impl Default for ProvisioningTemplatesView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for ProvisioningTemplatesView {
    fn name(&self) -> &'static str {
        "ProvisioningTemplatesView"
    }

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        all_displayed(browser, &[&self.title.locator])
    }
}

/// Tabbed form shared by the create and edit template pages.
#[derive(Debug, Clone)]
pub struct TemplateForm {
    pub template_tab: Tab,
    pub name: TextInput,
    pub default: Checkbox,
    /// Hidden textarea backing the code editor
    pub template_editor: TextInput,
    pub audit: TextInput,
    pub type_tab: Tab,
    pub snippet: Checkbox,
    pub template_type: Dropdown,
    pub submit: Text,
}

impl TemplateForm {
    pub fn new() -> Self {
        Self {
            template_tab: Tab::named("Template"),
            name: TextInput::id("provisioning_template_name"),
            default: Checkbox::id("provisioning_template_default"),
            template_editor: TextInput::new(Locator::xpath("//div[@id='editor']//textarea")),
            audit: TextInput::id("provisioning_template_audit_comment"),
            type_tab: Tab::named("Type"),
            snippet: Checkbox::id("provisioning_template_snippet"),
            template_type: Dropdown::new(Locator::id("provisioning_template_template_kind")),
            submit: Text::xpath("//input[@name='commit']"),
        }
    }
}

impl Default for TemplateForm {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct ProvisioningTemplateDetailsView {
    pub breadcrumb: BreadCrumb,
    pub form: TemplateForm,
}

impl ProvisioningTemplateDetailsView {
    pub fn new() -> Self {
        Self {
            breadcrumb: BreadCrumb::default(),
            form: TemplateForm::new(),
        }
    }
}

impl Default for ProvisioningTemplateDetailsView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for ProvisioningTemplateDetailsView {
    fn name(&self) -> &'static str {
        "ProvisioningTemplateDetailsView"
    }

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        self.breadcrumb
            .matches(browser, "Provisioning templates", |current| current.starts_with("Edit "))
    }
}

#[derive(Debug, Clone)]
pub struct ProvisioningTemplateCreateView {
    pub breadcrumb: BreadCrumb,
    pub form: TemplateForm,
}

impl ProvisioningTemplateCreateView {
    pub fn new() -> Self {
        Self {
            breadcrumb: BreadCrumb::default(),
            form: TemplateForm::new(),
        }
    }
}

impl Default for ProvisioningTemplateCreateView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for ProvisioningTemplateCreateView {
    fn name(&self) -> &'static str {
        "ProvisioningTemplateCreateView"
    }

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        self.breadcrumb
            .matches(browser, "Provisioning templates", |current| current == "Create Template")
    }
}
