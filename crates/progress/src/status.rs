//! Transient status indicator

/// Surface that can display a single status entry
pub trait StatusSurface {
    /// Make the entry visible with the given content
    fn show(&mut self, text: &str, tooltip: Option<&str>);

    /// Remove the entry
    fn hide(&mut self);
}

/// Status entry shown while long-running work is in progress
///
/// Setting text or tooltip makes the indicator visible. Once disposed it is
/// hidden for good and further updates are ignored.
#[derive(Debug)]
pub struct StatusIndicator<S: StatusSurface> {
    surface: S,
    text: String,
    tooltip: Option<String>,
    visible: bool,
    disposed: bool,
}

impl<S: StatusSurface> StatusIndicator<S> {
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            text: String::new(),
            tooltip: None,
            visible: false,
            disposed: false,
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        if self.disposed {
            return;
        }
        self.text = text.into();
        self.refresh();
    }

    pub fn set_tooltip(&mut self, tooltip: impl Into<String>) {
        if self.disposed {
            return;
        }
        self.tooltip = Some(tooltip.into());
        self.refresh();
    }

    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if self.visible {
            self.visible = false;
            self.surface.hide();
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn refresh(&mut self) {
        self.visible = true;
        self.surface.show(&self.text, self.tooltip.as_deref());
    }
}

impl<S: StatusSurface> Drop for StatusIndicator<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}
