//! Standard widget kinds and their accessors.
//!
//! UI layers that map their controls onto [`Widget`] get translation support
//! through [`DefaultAccessorFactory`] without writing accessors of their own.

use std::sync::Arc;

use glossa_types::TextSlots;

use crate::accessor::{AccessorFactory, TextAccessor, for_each_slot, translatable};

#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Label(Label),
    TextField(TextField),
    Toggle(Toggle),
    TitledContainer(TitledContainer),
    NavigationBar(NavigationBar),
    /// Anything without text, e.g. a divider
    Decoration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    pub content: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toggle {
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitledContainer {
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationBar {
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

impl Widget {
    pub fn label(text: impl Into<String>) -> Self {
        Widget::Label(Label { text: text.into() })
    }

    pub fn text_field(content: impl Into<String>, hint: Option<&str>) -> Self {
        Widget::TextField(TextField {
            content: content.into(),
            hint: hint.map(String::from),
        })
    }

    pub fn toggle(label: impl Into<String>, checked: bool) -> Self {
        Widget::Toggle(Toggle {
            label: label.into(),
            checked,
        })
    }

    pub fn titled_container(title: impl Into<String>) -> Self {
        Widget::TitledContainer(TitledContainer {
            title: Some(title.into()),
        })
    }

    pub fn navigation_bar(title: impl Into<String>, subtitle: Option<&str>) -> Self {
        Widget::NavigationBar(NavigationBar {
            title: Some(title.into()),
            subtitle: subtitle.map(String::from),
        })
    }

    /// Every text the widget displays, in slot order. Used for rendering and
    /// assertions, independent of the translation filter.
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Widget::Label(label) => vec![label.text.as_str()],
            Widget::TextField(field) => {
                let mut texts = vec![field.content.as_str()];
                texts.extend(field.hint.as_deref());
                texts
            }
            Widget::Toggle(toggle) => vec![toggle.label.as_str()],
            Widget::TitledContainer(container) => container.title.as_deref().into_iter().collect(),
            Widget::NavigationBar(bar) => bar
                .title
                .as_deref()
                .into_iter()
                .chain(bar.subtitle.as_deref())
                .collect(),
            Widget::Decoration => Vec::new(),
        }
    }
}

/// Slot 0: text
pub struct LabelAccessor;

impl TextAccessor<Widget> for LabelAccessor {
    fn extract(&self, element: &Widget) -> TextSlots {
        match element {
            Widget::Label(label) => vec![translatable(&label.text)],
            _ => Vec::new(),
        }
    }

    fn inject(&self, element: &mut Widget, texts: &[Option<String>]) {
        let Widget::Label(label) = element else {
            return;
        };
        for_each_slot(texts, |index, text| {
            if index == 0 {
                label.text = text.to_string();
            }
        });
    }
}

/// Slot 0: content, slot 1: hint
pub struct TextFieldAccessor;

impl TextAccessor<Widget> for TextFieldAccessor {
    fn extract(&self, element: &Widget) -> TextSlots {
        match element {
            Widget::TextField(field) => vec![
                translatable(&field.content),
                field.hint.as_deref().and_then(translatable),
            ],
            _ => Vec::new(),
        }
    }

    fn inject(&self, element: &mut Widget, texts: &[Option<String>]) {
        let Widget::TextField(field) = element else {
            return;
        };
        for_each_slot(texts, |index, text| match index {
            0 => field.content = text.to_string(),
            1 => field.hint = Some(text.to_string()),
            _ => {}
        });
    }
}

/// Slot 0: label
pub struct ToggleAccessor;

impl TextAccessor<Widget> for ToggleAccessor {
    fn extract(&self, element: &Widget) -> TextSlots {
        match element {
            Widget::Toggle(toggle) => vec![translatable(&toggle.label)],
            _ => Vec::new(),
        }
    }

    fn inject(&self, element: &mut Widget, texts: &[Option<String>]) {
        let Widget::Toggle(toggle) = element else {
            return;
        };
        for_each_slot(texts, |index, text| {
            if index == 0 {
                toggle.label = text.to_string();
            }
        });
    }
}

/// Slot 0: title
pub struct TitledContainerAccessor;

impl TextAccessor<Widget> for TitledContainerAccessor {
    fn extract(&self, element: &Widget) -> TextSlots {
        match element {
            Widget::TitledContainer(container) => {
                vec![container.title.as_deref().and_then(translatable)]
            }
            _ => Vec::new(),
        }
    }

    fn inject(&self, element: &mut Widget, texts: &[Option<String>]) {
        let Widget::TitledContainer(container) = element else {
            return;
        };
        for_each_slot(texts, |index, text| {
            if index == 0 {
                container.title = Some(text.to_string());
            }
        });
    }
}

/// Slot 0: title, slot 1: subtitle
pub struct NavigationBarAccessor;

impl TextAccessor<Widget> for NavigationBarAccessor {
    fn extract(&self, element: &Widget) -> TextSlots {
        match element {
            Widget::NavigationBar(bar) => vec![
                bar.title.as_deref().and_then(translatable),
                bar.subtitle.as_deref().and_then(translatable),
            ],
            _ => Vec::new(),
        }
    }

    fn inject(&self, element: &mut Widget, texts: &[Option<String>]) {
        let Widget::NavigationBar(bar) = element else {
            return;
        };
        for_each_slot(texts, |index, text| match index {
            0 => bar.title = Some(text.to_string()),
            1 => bar.subtitle = Some(text.to_string()),
            _ => {}
        });
    }
}

/// Accessors for every [`Widget`] kind except [`Widget::Decoration`]
pub struct DefaultAccessorFactory {
    label: Arc<dyn TextAccessor<Widget>>,
    text_field: Arc<dyn TextAccessor<Widget>>,
    toggle: Arc<dyn TextAccessor<Widget>>,
    titled_container: Arc<dyn TextAccessor<Widget>>,
    navigation_bar: Arc<dyn TextAccessor<Widget>>,
}

impl DefaultAccessorFactory {
    pub fn new() -> Self {
        Self {
            label: Arc::new(LabelAccessor),
            text_field: Arc::new(TextFieldAccessor),
            toggle: Arc::new(ToggleAccessor),
            titled_container: Arc::new(TitledContainerAccessor),
            navigation_bar: Arc::new(NavigationBarAccessor),
        }
    }
}

impl Default for DefaultAccessorFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessorFactory<Widget> for DefaultAccessorFactory {
    fn accessor_for(&self, element: &Widget) -> Option<Arc<dyn TextAccessor<Widget>>> {
        let accessor = match element {
            Widget::Label(_) => &self.label,
            Widget::TextField(_) => &self.text_field,
            Widget::Toggle(_) => &self.toggle,
            Widget::TitledContainer(_) => &self.titled_container,
            Widget::NavigationBar(_) => &self.navigation_bar,
            Widget::Decoration => return None,
        };
        Some(accessor.clone())
    }
}
