//! Aggregate module
//!
//! Aggregate Root pattern: commands validate against current state and
//! produce events, `apply` folds events into new state.

pub mod loan;

pub use loan::Loan;

/// Aggregate trait that all aggregates must implement
pub trait Aggregate: Sized {
    /// The type of events this aggregate handles
    type Event;

    /// The identifier type of this aggregate
    type Id;

    /// Get the aggregate type name (for logging)
    fn aggregate_type() -> &'static str;

    /// Get the aggregate ID
    fn id(&self) -> &Self::Id;

    /// Get the current version (number of events applied)
    fn version(&self) -> i64;

    /// Apply an event to update the aggregate state
    fn apply(self, event: Self::Event) -> Self;

    /// Apply a batch of events in order
    fn apply_all(self, events: impl IntoIterator<Item = Self::Event>) -> Self {
        events.into_iter().fold(self, Self::apply)
    }
}
