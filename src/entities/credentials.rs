use serde::{Deserialize, Serialize};

use crate::entities::application::Application;
use crate::entities::subject::Subject;
use crate::error::Result;
use crate::view::credentials::{ContentCredentialCreateView, ContentCredentialEditView, ContentCredentialsTableView};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContentCredential {
    pub name: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    pub content: String,
}

fn default_content_type() -> String {
    "GPG Key".to_string()
}

pub struct ContentCredentialsCollection<'a> {
    app: &'a Application,
}

impl<'a> ContentCredentialsCollection<'a> {
    pub fn new(app: &'a Application) -> Self {
        Self { app }
    }

    pub fn instantiate(&self, name: &str) -> ContentCredential<'a> {
        ContentCredential {
            app: self.app,
            name: name.into(),
        }
    }

    pub fn create(&self, credential: NewContentCredential) -> Result<ContentCredential<'a>> {
        self.app.navigate_to(&Subject::ContentCredentials, "New")?;
        let view = ContentCredentialCreateView::new();
        {
            let mut browser = self.app.browser();
            view.name.fill(&mut *browser, &credential.name)?;
            view.content_type.fill(&mut *browser, &credential.content_type)?;
            view.content.fill(&mut *browser, &credential.content)?;
            view.submit.click(&mut *browser)?;
        }
        self.app
            .wait_displayed(&ContentCredentialEditView::new(), self.app.waits().view())?;
        tracing::info!(name = %credential.name, "content credential created");
        Ok(self.instantiate(&credential.name))
    }

    /// Names listed after searching for `query`.
    pub fn search(&self, query: &str) -> Result<Vec<String>> {
        self.app.navigate_to(&Subject::ContentCredentials, "All")?;
        let view = ContentCredentialsTableView::new();
        let mut browser = self.app.browser();
        view.search.search(&mut *browser, query)?;
        let rows = view.table.read(&mut *browser)?;
        Ok(rows
            .into_iter()
            .filter_map(|mut row| row.remove("Name"))
            .collect())
    }
}

#[derive(Clone)]
pub struct ContentCredential<'a> {
    app: &'a Application,
    pub name: String,
}

impl std::fmt::Debug for ContentCredential<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentCredential").field("name", &self.name).finish()
    }
}

impl ContentCredential<'_> {
    pub fn subject(&self) -> Subject {
        Subject::ContentCredential {
            name: self.name.clone(),
        }
    }

    pub fn exists(&self) -> Result<bool> {
        let names = self.app.content_credentials().search(&self.name)?;
        Ok(names.iter().any(|name| *name == self.name))
    }

    /// Remove from the edit page and confirm.
    pub fn delete(&self) -> Result<()> {
        self.app.navigate_to(&self.subject(), "Edit")?;
        let view = ContentCredentialEditView::new();
        view.remove.click(&mut *self.app.browser())?;
        self.app.wait_displayed(&view.dialog, self.app.waits().view())?;
        view.dialog.confirm.click(&mut *self.app.browser())?;
        self.app
            .wait_displayed(&ContentCredentialsTableView::new(), self.app.waits().view())?;
        tracing::info!(name = %self.name, "content credential deleted");
        Ok(())
    }
}
