//! Development seeding: fixture data and the seed routine

mod fixtures;
mod service;

pub use service::{SeedPolicy, SeedReport, SeedService};
