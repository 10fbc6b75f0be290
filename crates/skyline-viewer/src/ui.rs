//! Text presentation of the results panel and the toast stack.

use listings::{Arrangement, Notification, ResultsView, ToastKind};
use std::time::{Duration, Instant};

pub const TOAST_DURATION: Duration = Duration::from_millis(3500);

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub notification: Notification,
    pub expires_at: Instant,
}

/// Transient notifications, newest last.
#[derive(Debug, Default)]
pub struct ToastStack {
    toasts: Vec<Toast>,
}

impl ToastStack {
    pub fn push(&mut self, notification: Notification, now: Instant) {
        match notification.kind {
            ToastKind::Success => log::info!("[toast] {}", notification.message),
            ToastKind::Error => log::warn!("[toast] {}", notification.message),
        }
        self.toasts.push(Toast {
            notification,
            expires_at: now + TOAST_DURATION,
        });
    }

    pub fn expire(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    pub fn active(&self) -> &[Toast] {
        &self.toasts
    }
}

/// One line per visual element of the results region.
pub fn describe_results(view: &ResultsView) -> Vec<String> {
    match view {
        ResultsView::Loading => vec!["Loading units...".to_string()],
        ResultsView::Failed { message } | ResultsView::Empty { message } => vec![message.clone()],
        ResultsView::Page(page) => {
            let mut lines = Vec::with_capacity(page.cards.len() + 2);
            let arrangement = match page.layout.arrangement {
                Arrangement::Grid { columns } => format!("grid x{columns}"),
                Arrangement::Column => "list".to_string(),
            };
            lines.push(format!("{} ({arrangement})", page.indicator));
            for card in &page.cards {
                lines.push(format!(
                    "{} | {} | {} {} | {} | {}",
                    card.title, card.location, card.bedrooms, card.bathrooms, card.garden, card.price
                ));
            }
            let prev = if page.prev_enabled { "< Prev" } else { "  ----" };
            let next = if page.next_enabled { "Next >" } else { "----  " };
            lines.push(format!("{prev}   {next}"));
            lines
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listings::{BrowserViewState, ListingRecord};

    #[test]
    fn toasts_expire() {
        let t0 = Instant::now();
        let mut stack = ToastStack::default();
        stack.push(
            Notification {
                kind: ToastKind::Success,
                message: "Loaded 3 available units".into(),
            },
            t0,
        );
        stack.expire(t0 + Duration::from_secs(1));
        assert_eq!(stack.active().len(), 1);
        stack.expire(t0 + TOAST_DURATION);
        assert!(stack.active().is_empty());
    }

    #[test]
    fn page_description_has_indicator_cards_and_controls() {
        let records = vec![ListingRecord {
            id: "a".into(),
            name: Some("Villa".into()),
            price: Some(1_250_000.0),
            ..Default::default()
        }];
        let refs: Vec<&ListingRecord> = records.iter().collect();
        let state = BrowserViewState {
            current_page: 1,
            ..Default::default()
        };
        let view = listings::render_page(&state, &refs, 1280);
        let lines = describe_results(&view);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Page 1 of 1"));
        assert!(lines[1].contains("$1,250,000"));
        assert!(lines[2].contains("----"));
    }
}
