#![allow(dead_code)]

pub mod utils;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use console_nav::browser::{Browser, BrowserError, Locator};

/// What the fake page does when an element is clicked.
#[derive(Debug, Clone)]
pub enum Effect {
    Show(Locator),
    Hide(Locator),
    SetText(Locator, String),
    SetList(Locator, Vec<String>),
    SetPageText(String),
    OpenWindow(String),
}

/// One recorded call that changes the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Open(String),
    Click(Locator),
    Fill(Locator, String),
    Select(Locator, String),
    SwitchTo(String),
    CloseWindow,
    Quit,
}

#[derive(Debug, Default)]
pub struct FakePage {
    pub visible: HashSet<Locator>,
    /// Consumed front to back; the last value sticks.
    pub texts: HashMap<Locator, VecDeque<String>>,
    pub lists: HashMap<Locator, Vec<String>>,
    pub counts: HashMap<Locator, usize>,
    /// Like `texts`: consumed front to back, the last value sticks.
    pub count_queues: HashMap<Locator, VecDeque<usize>>,
    pub attributes: HashMap<(Locator, String), String>,
    pub selected: HashMap<Locator, String>,
    pub on_click: HashMap<Locator, Vec<Effect>>,
    pub on_open: HashMap<String, Vec<Effect>>,
    pub page_text: String,
    pub url: String,
    pub windows: Vec<String>,
    pub current_window: String,
    pub interactions: Vec<Interaction>,
}

/// Scripted in-memory browser. Clones share one page, so a test keeps a
/// handle while the application owns the boxed browser.
#[derive(Debug, Clone)]
pub struct FakeBrowser {
    pub page: Rc<RefCell<FakePage>>,
}

impl Default for FakeBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBrowser {
    pub fn new() -> Self {
        let page = FakePage {
            windows: vec!["main".to_string()],
            current_window: "main".to_string(),
            ..FakePage::default()
        };
        Self {
            page: Rc::new(RefCell::new(page)),
        }
    }

    pub fn boxed(&self) -> Box<dyn Browser> {
        Box::new(self.clone())
    }

    pub fn show(&self, locator: &Locator) -> &Self {
        self.page.borrow_mut().visible.insert(locator.clone());
        self
    }

    pub fn hide(&self, locator: &Locator) -> &Self {
        self.page.borrow_mut().visible.remove(locator);
        self
    }

    pub fn set_text(&self, locator: &Locator, text: &str) -> &Self {
        self.page
            .borrow_mut()
            .texts
            .insert(locator.clone(), VecDeque::from([text.to_string()]));
        self
    }

    /// Successive `text` reads return these values in order.
    pub fn queue_texts(&self, locator: &Locator, texts: &[&str]) -> &Self {
        self.page
            .borrow_mut()
            .texts
            .insert(locator.clone(), texts.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn set_list(&self, locator: &Locator, items: &[&str]) -> &Self {
        self.page
            .borrow_mut()
            .lists
            .insert(locator.clone(), items.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn set_count(&self, locator: &Locator, count: usize) -> &Self {
        self.page.borrow_mut().counts.insert(locator.clone(), count);
        self
    }

    pub fn queue_counts(&self, locator: &Locator, counts: &[usize]) -> &Self {
        self.page
            .borrow_mut()
            .count_queues
            .insert(locator.clone(), counts.iter().copied().collect());
        self
    }

    pub fn set_attribute(&self, locator: &Locator, name: &str, value: &str) -> &Self {
        self.page
            .borrow_mut()
            .attributes
            .insert((locator.clone(), name.to_string()), value.to_string());
        self
    }

    pub fn on_click(&self, locator: &Locator, effects: Vec<Effect>) -> &Self {
        self.page
            .borrow_mut()
            .on_click
            .entry(locator.clone())
            .or_default()
            .extend(effects);
        self
    }

    pub fn on_open(&self, url: &str, effects: Vec<Effect>) -> &Self {
        self.page
            .borrow_mut()
            .on_open
            .entry(url.to_string())
            .or_default()
            .extend(effects);
        self
    }

    pub fn set_page_text(&self, text: &str) -> &Self {
        self.page.borrow_mut().page_text = text.to_string();
        self
    }

    pub fn interactions(&self) -> Vec<Interaction> {
        self.page.borrow().interactions.clone()
    }

    pub fn clicks(&self) -> Vec<Locator> {
        self.interactions()
            .into_iter()
            .filter_map(|i| match i {
                Interaction::Click(locator) => Some(locator),
                _ => None,
            })
            .collect()
    }

    pub fn was_clicked(&self, locator: &Locator) -> bool {
        self.clicks().contains(locator)
    }

    pub fn filled(&self, locator: &Locator) -> Option<String> {
        self.interactions().into_iter().rev().find_map(|i| match i {
            Interaction::Fill(l, value) if &l == locator => Some(value),
            _ => None,
        })
    }

    fn apply(page: &mut FakePage, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Show(locator) => {
                    page.visible.insert(locator);
                }
                Effect::Hide(locator) => {
                    page.visible.remove(&locator);
                }
                Effect::SetText(locator, text) => {
                    page.texts.insert(locator, VecDeque::from([text]));
                }
                Effect::SetList(locator, items) => {
                    page.lists.insert(locator, items);
                }
                Effect::SetPageText(text) => page.page_text = text,
                Effect::OpenWindow(handle) => page.windows.push(handle),
            }
        }
    }

    fn missing(locator: &Locator) -> BrowserError {
        BrowserError::NoSuchElement {
            locator: locator.clone(),
        }
    }
}

impl Browser for FakeBrowser {
    fn open(&mut self, url: &str) -> Result<(), BrowserError> {
        let mut page = self.page.borrow_mut();
        page.interactions.push(Interaction::Open(url.to_string()));
        page.url = url.to_string();
        let effects = page.on_open.get(url).cloned().unwrap_or_default();
        Self::apply(&mut page, effects);
        Ok(())
    }

    fn is_displayed(&mut self, locator: &Locator) -> Result<bool, BrowserError> {
        Ok(self.page.borrow().visible.contains(locator))
    }

    fn count(&mut self, locator: &Locator) -> Result<usize, BrowserError> {
        let mut page = self.page.borrow_mut();
        if let Some(queue) = page.count_queues.get_mut(locator) {
            let next = if queue.len() > 1 { queue.pop_front() } else { queue.front().copied() };
            if let Some(count) = next {
                return Ok(count);
            }
        }
        if let Some(count) = page.counts.get(locator) {
            return Ok(*count);
        }
        if let Some(items) = page.lists.get(locator) {
            return Ok(items.len());
        }
        Ok(usize::from(page.visible.contains(locator) || page.texts.contains_key(locator)))
    }

    fn text(&mut self, locator: &Locator) -> Result<String, BrowserError> {
        let mut page = self.page.borrow_mut();
        match page.texts.get_mut(locator) {
            Some(queue) if queue.len() > 1 => Ok(queue.pop_front().unwrap_or_default()),
            Some(queue) => queue.front().cloned().ok_or_else(|| Self::missing(locator)),
            None => Err(Self::missing(locator)),
        }
    }

    fn texts(&mut self, locator: &Locator) -> Result<Vec<String>, BrowserError> {
        Ok(self.page.borrow().lists.get(locator).cloned().unwrap_or_default())
    }

    fn attribute(&mut self, locator: &Locator, name: &str) -> Result<Option<String>, BrowserError> {
        Ok(self
            .page
            .borrow()
            .attributes
            .get(&(locator.clone(), name.to_string()))
            .cloned())
    }

    fn selected_text(&mut self, locator: &Locator) -> Result<Option<String>, BrowserError> {
        Ok(self.page.borrow().selected.get(locator).cloned())
    }

    fn click(&mut self, locator: &Locator) -> Result<(), BrowserError> {
        let mut page = self.page.borrow_mut();
        page.interactions.push(Interaction::Click(locator.clone()));
        let effects = page.on_click.get(locator).cloned().unwrap_or_default();
        Self::apply(&mut page, effects);
        Ok(())
    }

    fn fill(&mut self, locator: &Locator, value: &str) -> Result<(), BrowserError> {
        let mut page = self.page.borrow_mut();
        page.interactions
            .push(Interaction::Fill(locator.clone(), value.to_string()));
        page.attributes
            .insert((locator.clone(), "value".to_string()), value.to_string());
        Ok(())
    }

    fn select(&mut self, locator: &Locator, visible_text: &str) -> Result<(), BrowserError> {
        let mut page = self.page.borrow_mut();
        page.interactions
            .push(Interaction::Select(locator.clone(), visible_text.to_string()));
        page.selected.insert(locator.clone(), visible_text.to_string());
        Ok(())
    }

    fn window_handles(&mut self) -> Result<Vec<String>, BrowserError> {
        Ok(self.page.borrow().windows.clone())
    }

    fn switch_to_window(&mut self, handle: &str) -> Result<(), BrowserError> {
        let mut page = self.page.borrow_mut();
        page.interactions.push(Interaction::SwitchTo(handle.to_string()));
        page.current_window = handle.to_string();
        Ok(())
    }

    fn close_window(&mut self) -> Result<(), BrowserError> {
        let mut page = self.page.borrow_mut();
        page.interactions.push(Interaction::CloseWindow);
        let current = page.current_window.clone();
        page.windows.retain(|w| *w != current);
        Ok(())
    }

    fn page_text(&mut self) -> Result<String, BrowserError> {
        Ok(self.page.borrow().page_text.clone())
    }

    fn screenshot(&mut self, path: &str) -> Result<(), BrowserError> {
        std::fs::write(path, b"png").map_err(|e| BrowserError::SessionIo(e.to_string()))
    }

    fn current_url(&mut self) -> Result<String, BrowserError> {
        Ok(self.page.borrow().url.clone())
    }

    fn quit(&mut self) -> Result<(), BrowserError> {
        self.page.borrow_mut().interactions.push(Interaction::Quit);
        Ok(())
    }
}
