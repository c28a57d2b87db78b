//! Tender Module
//! Mission: The tender record type, its collection and its HTTP endpoints

pub mod api;
pub mod models;
pub mod search;
pub mod store;

pub use models::{Tender, TenderFields};
pub use store::TenderStore;
