//! Deliberation engine: policy catalog, budget-constrained allocation
//! ledger, package/dynamics analyzers, and the session phase machine.

pub mod analyzer;
pub mod catalog;
pub mod dynamics;
pub mod ledger;
pub mod preference;
pub mod profile;
pub mod session;
pub mod statement;

mod sampling;
