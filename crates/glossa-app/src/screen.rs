use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use glossa_core::widgets::Widget;
use glossa_core::{Animator, ElementHandle, ElementTable, Translator};

/// A settings page made of plain widgets
pub struct Screen {
    elements: Arc<ElementTable<Widget>>,
    rows: Vec<(&'static str, ElementHandle)>,
}

impl Screen {
    pub fn build(translator: &Translator<Widget>) -> Self {
        let widgets = [
            ("navigation", Widget::navigation_bar("Settings", Some("Your profile"))),
            ("account", Widget::titled_container("Account")),
            ("name", Widget::label("Name")),
            ("email", Widget::text_field("", Some("Email address"))),
            ("search", Widget::text_field("", Some("Type to search"))),
            ("divider", Widget::Decoration),
            ("notifications", Widget::toggle("Notifications", true)),
            ("translate", Widget::toggle("Enable translation", false)),
            ("unread", Widget::label("42")),
            ("save", Widget::label("Save")),
        ];

        let rows = widgets
            .into_iter()
            .map(|(name, widget)| (name, translator.attach(widget)))
            .collect();

        Self {
            elements: translator.elements().clone(),
            rows,
        }
    }

    /// Every displayed string keyed by row, for prefetching
    pub fn strings(&self) -> HashMap<String, String> {
        let mut strings = HashMap::new();
        for (name, handle) in &self.rows {
            let texts = self
                .elements
                .with(*handle, |widget| {
                    widget
                        .texts()
                        .into_iter()
                        .map(String::from)
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();

            for (slot, text) in texts.into_iter().enumerate() {
                strings.insert(format!("{name}.{slot}"), text);
            }
        }
        strings
    }

    pub fn render(&self) -> String {
        self.rows
            .iter()
            .filter_map(|(name, handle)| {
                self.elements.with(*handle, |widget| {
                    let texts: Vec<_> = widget
                        .texts()
                        .into_iter()
                        .filter(|text| !text.is_empty())
                        .collect();
                    format!("  {name:<14}{}", texts.join(" | "))
                })
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Wait until the rendered screen stops changing for `quiet`
    pub async fn settle(&self, quiet: Duration) {
        let mut last = self.render();
        loop {
            tokio::time::sleep(quiet).await;
            let current = self.render();
            if current == last {
                return;
            }
            last = current;
        }
    }
}

/// Logs fades and takes as long as they would on screen
pub struct ConsoleAnimator;

#[async_trait]
impl Animator for ConsoleAnimator {
    async fn fade_out(&self, element: ElementHandle, duration: Duration) {
        tracing::trace!(?element, "Fade out");
        tokio::time::sleep(duration).await;
    }

    async fn fade_in(&self, element: ElementHandle, duration: Duration) {
        tracing::trace!(?element, "Fade in");
        tokio::time::sleep(duration).await;
    }
}
