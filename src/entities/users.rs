use serde::{Deserialize, Serialize};

use crate::browser::Browser;
use crate::entities::application::Application;
use crate::entities::subject::Subject;
use crate::error::{Error, Result};
use crate::view::dialogs::ConfirmationView;
use crate::view::users::{AddUserView, EditUserView, UserForm, UsersView};

/// Fields of the add-user form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub notifications_on: bool,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "limited".to_string()
}

/// Fields to change on the edit form; `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub notifications_on: Option<bool>,
    pub password: Option<String>,
    pub role: Option<String>,
}

pub struct UsersCollection<'a> {
    app: &'a Application,
}

impl<'a> UsersCollection<'a> {
    pub fn new(app: &'a Application) -> Self {
        Self { app }
    }

    /// Entity for an existing user, without touching the UI.
    pub fn instantiate(&self, user_id: &str, name: &str, email: &str) -> User<'a> {
        User {
            app: self.app,
            user_id: user_id.into(),
            name: name.into(),
            email: email.into(),
            notifications_on: false,
            role: String::new(),
            status: None,
        }
    }

    /// Fill and save the add-user form.
    pub fn create(&self, user: NewUser) -> Result<User<'a>> {
        self.app.navigate_to(&Subject::Users, "Add")?;
        let form = AddUserView::new().form;
        let changed = {
            let mut browser = self.app.browser();
            let browser = &mut *browser;
            let mut changed = form.user_id.fill(browser, &user.user_id)?;
            changed |= fill_details(
                &form,
                browser,
                &UserChanges {
                    name: Some(user.name.clone()),
                    email: Some(user.email.clone()),
                    notifications_on: Some(user.notifications_on),
                    password: Some(user.password.clone()),
                    role: Some(user.role.clone()),
                },
            )?;
            if changed {
                form.save_button.click(browser)?;
            }
            changed
        };
        tracing::info!(user_id = %user.user_id, changed, "user created");

        Ok(User {
            app: self.app,
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            notifications_on: user.notifications_on,
            role: user.role,
            status: None,
        })
    }

    /// Every user listed in the users table.
    pub fn get_all(&self) -> Result<Vec<User<'a>>> {
        self.app.navigate_to(&Subject::Users, "All")?;
        let rows = UsersView::new().table.read(&mut *self.app.browser())?;
        Ok(rows
            .into_iter()
            .map(|mut row| {
                let mut take = |column: &str| row.remove(column).unwrap_or_default();
                User {
                    app: self.app,
                    user_id: take("User ID"),
                    name: take("Name"),
                    email: take("Email"),
                    role: take("Role"),
                    status: Some(take("Status")),
                    notifications_on: take("Email Notifications").eq_ignore_ascii_case("enabled"),
                }
            })
            .collect())
    }
}

/// A console user, as last read from the users table.
#[derive(Clone)]
pub struct User<'a> {
    app: &'a Application,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub notifications_on: bool,
    pub role: String,
    pub status: Option<String>,
}

impl std::fmt::Debug for User<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("user_id", &self.user_id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish()
    }
}

impl<'a> User<'a> {
    pub fn subject(&self) -> Subject {
        Subject::User {
            user_id: self.user_id.clone(),
        }
    }

    /// Whether a row with this user id lists the same name and email.
    pub fn exists(&self) -> Result<bool> {
        self.app.navigate_to(&Subject::Users, "All")?;
        let table = UsersView::new().table;
        let mut browser = self.app.browser();
        if !table.has_row(&mut *browser, "User ID", &self.user_id)? {
            return Ok(false);
        }
        let name = browser.text(&table.cell_by("User ID", &self.user_id, "Name")?)?;
        let email = browser.text(&table.cell_by("User ID", &self.user_id, "Email")?)?;
        Ok(name.trim() == self.name && email.trim() == self.email)
    }

    /// Re-read the user's row.
    pub fn update(&mut self) -> Result<()> {
        self.app.navigate_to(&Subject::Users, "All")?;
        let table = UsersView::new().table;
        let mut browser = self.app.browser();
        if !table.has_row(&mut *browser, "User ID", &self.user_id)? {
            return Err(Error::NotFound {
                entity: "user",
                id: self.user_id.clone(),
            });
        }
        let mut cell = |column: &str| -> Result<String> {
            let locator = table.cell_by("User ID", &self.user_id, column)?;
            Ok(browser.text(&locator)?.trim().to_string())
        };
        let name = cell("Name")?;
        let email = cell("Email")?;
        let role = cell("Role")?;
        let status = cell("Status")?;
        let notifications = cell("Email Notifications")?;
        self.name = name;
        self.email = email;
        self.role = role;
        self.status = Some(status);
        self.notifications_on = notifications.eq_ignore_ascii_case("enabled");
        Ok(())
    }

    /// Apply `changes` on the edit form. Returns whether anything changed.
    ///
    /// The entity's fields are left as they were; call [`User::update`] to
    /// see the result.
    pub fn edit(&self, changes: &UserChanges) -> Result<bool> {
        self.app.navigate_to(&self.subject(), "Edit")?;
        let form = EditUserView::new().form;
        let mut browser = self.app.browser();
        let changed = fill_details(&form, &mut *browser, changes)?;
        if changed {
            form.save_button.click(&mut *browser)?;
        }
        tracing::info!(user_id = %self.user_id, changed, "user edited");
        Ok(changed)
    }

    /// Delete through the row's actions menu and confirm.
    pub fn delete(&self) -> Result<()> {
        self.app.navigate_to(&Subject::Users, "All")?;
        let view = UsersView::new();
        view.actions(&self.user_id)?
            .select(&mut *self.app.browser(), "Delete")?;

        let dialog = ConfirmationView::delete();
        self.app.wait_displayed(&dialog, self.app.waits().view())?;
        dialog.confirm.click(&mut *self.app.browser())?;

        let waits = self.app.waits();
        waits
            .view()
            .message(format!("user '{}' still listed", self.user_id))
            .until(|| {
                !view
                    .table
                    .has_row(&mut *self.app.browser(), "User ID", &self.user_id)
                    .unwrap_or(true)
            })?;
        tracing::info!(user_id = %self.user_id, "user deleted");
        Ok(())
    }
}

/// Fill the fields shared by the add and edit forms.
fn fill_details(form: &UserForm, browser: &mut dyn Browser, changes: &UserChanges) -> Result<bool> {
    let mut changed = false;
    if let Some(name) = &changes.name {
        changed |= form.users_name.fill(browser, name)?;
    }
    if let Some(email) = &changes.email {
        changed |= form.email.fill(browser, email)?;
    }
    if let Some(on) = changes.notifications_on {
        changed |= form.notifications_on.fill(browser, on)?;
    }
    if let Some(password) = &changes.password {
        changed |= form.password.fill(browser, password)?;
        changed |= form.confirm_password.fill(browser, password)?;
    }
    if let Some(role) = &changes.role {
        changed |= form.role.fill(browser, role)?;
    }
    Ok(changed)
}
