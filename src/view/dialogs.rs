use crate::browser::locator::xpath_literal;
use crate::browser::Browser;
use crate::view::widgets::{RadioGroup, Text, TextInput};
use crate::view::{all_displayed, View};

/// Import form of a detected, unmanaged cluster.
#[derive(Debug, Clone)]
pub struct ImportClusterView {
    pub title: Text,
    pub cluster_name: TextInput,
    /// "enable", "disable" or "leaveAsIs"
    pub profiling: RadioGroup,
    pub confirm_import: Text,
    pub cancel: Text,
}

impl ImportClusterView {
    pub fn new() -> Self {
        Self {
            title: Text::xpath("//h1[contains(normalize-space(.), 'Import Cluster')]"),
            cluster_name: TextInput::id("cluster-name"),
            profiling: RadioGroup::new("profiling"),
            confirm_import: Text::xpath("//button[normalize-space(.)='Import']"),
            cancel: Text::xpath("//button[normalize-space(.)='Cancel']"),
        }
    }
}

impl Default for ImportClusterView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for ImportClusterView {
    fn name(&self) -> &'static str {
        "ImportClusterView"
    }

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        all_displayed(browser, &[&self.title.locator, &self.confirm_import.locator])
    }
}

/// "Task submitted" page shown after import or unmanage is requested.
#[derive(Debug, Clone)]
pub struct TaskSubmittedView {
    name: &'static str,
    pub heading: Text,
    pub view_progress: Text,
    pub close_button: Text,
}

impl TaskSubmittedView {
    fn with_heading(name: &'static str, heading: &str) -> Self {
        Self {
            name,
            heading: Text::xpath(format!(
                "//*[self::h1 or self::h2 or self::h3][contains(normalize-space(.), {})]",
                xpath_literal(heading)
            )),
            view_progress: Text::xpath("//button[normalize-space(.)='View Task Progress']"),
            close_button: Text::xpath("//button[normalize-space(.)='Close']"),
        }
    }

    pub fn import() -> Self {
        Self::with_heading("ImportTaskSubmittedView", "Import request submitted")
    }

    pub fn unmanage() -> Self {
        Self::with_heading("UnmanageTaskSubmittedView", "Unmanage request submitted")
    }
}

impl View for TaskSubmittedView {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        all_displayed(browser, &[&self.heading.locator, &self.close_button.locator])
    }
}

/// Modal dialog asking to confirm an action.
#[derive(Debug, Clone)]
pub struct ConfirmationView {
    name: &'static str,
    pub dialog: Text,
    pub confirm: Text,
    pub cancel: Text,
}

impl ConfirmationView {
    /// Dialog whose confirm button reads `button`.
    pub fn with_button(name: &'static str, button: &str) -> Self {
        let dialog = "//div[contains(@class, 'modal-dialog')]";
        Self {
            name,
            dialog: Text::xpath(dialog),
            confirm: Text::xpath(format!(
                "{}//button[normalize-space(.)={}]",
                dialog,
                xpath_literal(button)
            )),
            cancel: Text::xpath(format!("{}//button[normalize-space(.)='Cancel']", dialog)),
        }
    }

    pub fn unmanage() -> Self {
        Self::with_button("UnmanageConfirmationView", "Unmanage")
    }

    pub fn expand() -> Self {
        Self::with_button("ExpandConfirmationView", "Expand")
    }

    pub fn delete() -> Self {
        Self::with_button("DeleteConfirmationView", "Delete")
    }
}

impl View for ConfirmationView {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        all_displayed(browser, &[&self.dialog.locator, &self.confirm.locator])
    }
}
