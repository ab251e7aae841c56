use serde::{Deserialize, Serialize};

use crate::browser::Browser;
use crate::entities::application::Application;
use crate::entities::subject::Subject;
use crate::error::Result;
use crate::view::dialogs::ConfirmationView;
use crate::view::templates::{ProvisioningTemplateCreateView, ProvisioningTemplatesView, TemplateForm};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTemplate {
    pub name: String,
    /// Template body typed into the editor
    pub template: String,
    #[serde(default)]
    pub audit_comment: Option<String>,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub snippet: bool,
    /// Kind, e.g. "Provisioning template"; ignored for snippets
    #[serde(default)]
    pub template_type: Option<String>,
}

pub struct TemplatesCollection<'a> {
    app: &'a Application,
}

impl<'a> TemplatesCollection<'a> {
    pub fn new(app: &'a Application) -> Self {
        Self { app }
    }

    pub fn instantiate(&self, name: &str) -> Template<'a> {
        Template {
            app: self.app,
            name: name.into(),
        }
    }

    pub fn create(&self, template: NewTemplate) -> Result<Template<'a>> {
        self.app.navigate_to(&Subject::Templates, "New")?;
        let form = ProvisioningTemplateCreateView::new().form;
        fill_form(&form, &mut *self.app.browser(), &template)?;
        form.submit.click(&mut *self.app.browser())?;
        self.app
            .wait_displayed(&ProvisioningTemplatesView::new(), self.app.waits().view())?;
        tracing::info!(name = %template.name, snippet = template.snippet, "template created");
        Ok(self.instantiate(&template.name))
    }
}

fn fill_form(form: &TemplateForm, browser: &mut dyn Browser, template: &NewTemplate) -> Result<()> {
    form.template_tab.open(browser)?;
    form.name.fill(browser, &template.name)?;
    form.default.fill(browser, template.default)?;
    form.template_editor.fill(browser, &template.template)?;
    if let Some(comment) = &template.audit_comment {
        form.audit.fill(browser, comment)?;
    }
    form.type_tab.open(browser)?;
    form.snippet.fill(browser, template.snippet)?;
    if !template.snippet {
        if let Some(kind) = &template.template_type {
            form.template_type.fill(browser, kind)?;
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct Template<'a> {
    app: &'a Application,
    pub name: String,
}

impl std::fmt::Debug for Template<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template").field("name", &self.name).finish()
    }
}

impl Template<'_> {
    pub fn subject(&self) -> Subject {
        Subject::Template {
            name: self.name.clone(),
        }
    }

    pub fn exists(&self) -> Result<bool> {
        self.app.navigate_to(&Subject::Templates, "All")?;
        let view = ProvisioningTemplatesView::new();
        let mut browser = self.app.browser();
        view.search.search(&mut *browser, &self.name)?;
        Ok(view.table.has_row(&mut *browser, "Name", &self.name)?)
    }

    /// Delete through the row's actions menu and confirm.
    pub fn delete(&self) -> Result<()> {
        self.app.navigate_to(&Subject::Templates, "All")?;
        let view = ProvisioningTemplatesView::new();
        {
            let mut browser = self.app.browser();
            view.search.search(&mut *browser, &self.name)?;
            view.actions(&self.name)?.select(&mut *browser, "Delete")?;
        }
        let dialog = ConfirmationView::delete();
        self.app.wait_displayed(&dialog, self.app.waits().view())?;
        dialog.confirm.click(&mut *self.app.browser())?;
        self.app
            .waits()
            .view()
            .message(format!("template '{}' still listed", self.name))
            .until(|| {
                !view
                    .table
                    .has_row(&mut *self.app.browser(), "Name", &self.name)
                    .unwrap_or(true)
            })?;
        tracing::info!(name = %self.name, "template deleted");
        Ok(())
    }
}
