//! List views: request sequencing, list controllers and the mutation
//! dispatcher.

pub mod controller;
pub mod dispatcher;
pub mod sequencer;

pub use controller::{ListController, LoadOutcome, PaymentsController};
pub use dispatcher::{ListView, MockListView, dispatch};
pub use sequencer::{RequestSequencer, Ticket};
