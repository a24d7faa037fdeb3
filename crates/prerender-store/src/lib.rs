//! Request-scoped application state container.
//!
//! Every page render gets its own `Store`, seeded from the request by
//! `StoreFactory`. State changes only through dispatched `Action`s and is
//! serialized once into the response for the client to pick up.

mod action;
mod factory;
mod state;
mod store;

pub use action::*;
pub use factory::*;
pub use state::*;
pub use store::*;
