// handlers/mod.rs - Route handlers
//
// Every handler runs the same pipeline: authorize the caller, validate the
// input, then call into the store. The first failing stage short-circuits
// with an ApiError.

pub mod auth;
pub mod companies;
pub mod health;
pub mod users;
