//! Watch domain - eligibility window arithmetic and derived views

mod eligibility;
mod view;

pub use eligibility::{coarse_cutoff, days_left, expires_at, is_eligible, WATCH_WINDOW_DAYS};
pub use view::PurchaseView;
