use std::fmt;
use std::hash::Hash;

use crate::browser::Browser;
use crate::navigation::error::NavigationError;
use crate::view::View;
use crate::wait::Wait;

/// Something destinations are registered for: the web UI itself, a
/// collection, or a single entity.
pub trait Subject: Clone + fmt::Display {
    type Kind: Copy + Eq + Hash + fmt::Debug + fmt::Display;

    fn kind(&self) -> Self::Kind;

    /// Subject reached through a named relation, e.g. `"parent"`.
    fn related(&self, attribute: &str) -> Option<Self>;
}

/// Where a step has to start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prerequisite {
    None,
    /// Another destination of the same subject
    SameSubject(&'static str),
    /// A destination of the subject reached through `attribute`
    RelatedVia {
        attribute: &'static str,
        destination: &'static str,
    },
}

impl fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prerequisite::None => write!(f, "-"),
            Prerequisite::SameSubject(destination) => write!(f, "{}", destination),
            Prerequisite::RelatedVia {
                attribute,
                destination,
            } => write!(f, "{}.{}", attribute, destination),
        }
    }
}

/// A registered transition to one view.
pub trait NavigateStep<S: Subject> {
    /// View this destination ends on.
    fn view(&self, subject: &S) -> Box<dyn View>;

    fn prerequisite(&self) -> Prerequisite {
        Prerequisite::None
    }

    /// Whether the browser already shows the destination.
    fn am_i_here(&self, subject: &S, browser: &mut dyn Browser) -> bool {
        self.view(subject).is_displayed(browser)
    }

    /// Interactions moving from the prerequisite to this destination.
    /// Must be safe to run again if a previous attempt was interrupted.
    fn step(&self, subject: &S, browser: &mut dyn Browser) -> Result<(), NavigationError>;

    /// Bound for the display check after `step`; `None` uses the
    /// navigator's default.
    fn wait(&self) -> Option<Wait> {
        None
    }
}
