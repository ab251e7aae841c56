use crate::browser::{Browser, BrowserError, Locator};
use crate::view::widgets::{ActionsMenu, Checkbox, Dropdown, Table, Text, TextInput};
use crate::view::{all_displayed, View};

pub const USER_COLUMNS: &[&str] = &[
    "User ID",
    "Name",
    "Email",
    "Role",
    "Status",
    "Email Notifications",
    "Actions",
];

#[derive(Debug, Clone)]
pub struct UsersView {
    pub title: Text,
    pub add_user: Text,
    pub table: Table,
}

impl UsersView {
    pub fn new() -> Self {
        Self {
            title: Text::xpath("//h1[normalize-space(.)='Users']"),
            add_user: Text::xpath("//button[normalize-space(.)='Add']"),
            table: Table::new(Locator::xpath("//table[contains(@class, 'users-list')]"), USER_COLUMNS),
        }
    }

    /// Kebab menu of one user's row.
    pub fn actions(&self, user_id: &str) -> Result<ActionsMenu, BrowserError> {
        Ok(ActionsMenu::new(self.table.cell_by("User ID", user_id, "Actions")?))
    }
}

impl Default for UsersView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for UsersView {
    fn name(&self) -> &'static str {
        "UsersView"
    }

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        all_displayed(browser, &[&self.title.locator, &self.table.root])
    }
}

/// Form shared by the add and edit user pages.
#[derive(Debug, Clone)]
pub struct UserForm {
    pub user_id: TextInput,
    pub users_name: TextInput,
    pub email: TextInput,
    pub notifications_on: Checkbox,
    pub password: TextInput,
    pub confirm_password: TextInput,
    pub role: Dropdown,
    pub save_button: Text,
}

impl UserForm {
    pub fn new() -> Self {
        Self {
            user_id: TextInput::id("username"),
            users_name: TextInput::id("name"),
            email: TextInput::id("email"),
            notifications_on: Checkbox::id("email_notifications"),
            password: TextInput::id("password"),
            confirm_password: TextInput::id("password_confirmation"),
            role: Dropdown::new(Locator::id("role")),
            save_button: Text::xpath("//button[normalize-space(.)='Save']"),
        }
    }
}

impl Default for UserForm {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct AddUserView {
    pub title: Text,
    pub form: UserForm,
}

impl AddUserView {
    pub fn new() -> Self {
        Self {
            title: Text::xpath("//h1[normalize-space(.)='Add User']"),
            form: UserForm::new(),
        }
    }
}

impl Default for AddUserView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for AddUserView {
    fn name(&self) -> &'static str {
        "AddUserView"
    }

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        all_displayed(browser, &[&self.title.locator, &self.form.user_id.locator])
    }
}

#[derive(Debug, Clone)]
pub struct EditUserView {
    pub title: Text,
    pub form: UserForm,
}

impl EditUserView {
    pub fn new() -> Self {
        Self {
            title: Text::xpath("//h1[normalize-space(.)='Edit User']"),
            form: UserForm::new(),
        }
    }
}

impl Default for EditUserView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for EditUserView {
    fn name(&self) -> &'static str {
        "EditUserView"
    }

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        all_displayed(browser, &[&self.title.locator, &self.form.email.locator])
    }
}
