//! Turns detected drops into a human-readable mail message

use chrono::{DateTime, Utc};

use super::{DropInfo, MailMessage};

/// Composes the price-drop summary mail. Callers only invoke this with a
/// non-empty set of actual drops; suppression of empty runs happens upstream
/// in the driver.
pub struct NotificationComposer;

impl NotificationComposer {
    pub fn new() -> Self {
        Self
    }

    pub fn compose(&self, drops: &[DropInfo], checked_at: DateTime<Utc>) -> MailMessage {
        let total_saved: f64 = drops.iter().map(|d| d.price_drop).sum();

        let subject = format!(
            "Price watch: {} item{} dropped (total \u{2193} ${:.2})",
            drops.len(),
            if drops.len() == 1 { "" } else { "s" },
            total_saved
        );

        let lines: Vec<String> = drops
            .iter()
            .map(|d| {
                format!(
                    "{}: paid ${:.2}, current ${:.2} (\u{2193} ${:.2}), {}",
                    display_title(d),
                    d.paid_price,
                    d.current_price,
                    d.price_drop,
                    days_text(d.days_left)
                )
            })
            .collect();

        let html_items: Vec<String> = drops
            .iter()
            .map(|d| {
                format!(
                    "<li><strong>{}</strong>: paid ${:.2}, current ${:.2} \
                     (<strong>\u{2193} ${:.2}</strong>) - <em>{}</em></li>",
                    display_title(d),
                    d.paid_price,
                    d.current_price,
                    d.price_drop,
                    days_text(d.days_left)
                )
            })
            .collect();

        let stamp = checked_at.format("%Y-%m-%d %H:%M UTC");

        let text = format!(
            "Price check at {} found {} item(s) with drops:\n\n{}",
            stamp,
            drops.len(),
            lines.join("\n")
        );

        let html = format!(
            "<p>Price check at {} found {} item(s) with drops:</p>\n<ul>\n{}\n</ul>\n\
             <p><strong>Total potential savings:</strong> ${:.2}</p>",
            stamp,
            drops.len(),
            html_items.join("\n"),
            total_saved
        );

        MailMessage {
            subject,
            text,
            html,
        }
    }
}

impl Default for NotificationComposer {
    fn default() -> Self {
        Self::new()
    }
}

fn display_title(drop: &DropInfo) -> String {
    match &drop.title {
        Some(title) if !title.is_empty() => title.clone(),
        _ => format!("SKU {}", drop.sku),
    }
}

fn days_text(days_left: i64) -> String {
    if days_left > 0 {
        format!(
            "{} day{} left to claim",
            days_left,
            if days_left == 1 { "" } else { "s" }
        )
    } else {
        "window likely expired".to_string()
    }
}
