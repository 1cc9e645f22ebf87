//! UI Components
//!
//! Reusable Leptos components for the ticket pages.

pub mod badge;
pub mod chart;
pub mod loading;
pub mod nav;
pub mod toast;

pub use badge::Badge;
pub use chart::ChartCanvas;
pub use loading::{ListSkeleton, Loading};
pub use nav::Nav;
pub use toast::Toast;
