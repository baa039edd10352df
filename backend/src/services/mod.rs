//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the store and the pure calculations of the shared crate.

pub mod analytics;
pub mod goals;
pub mod insights;
pub mod streaks;

pub use analytics::AnalyticsService;
pub use goals::GoalTracker;
pub use insights::InsightService;
pub use streaks::StreakService;
