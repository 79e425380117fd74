//! Taxi fare server.
//!
//! A web application that answers: "how much is a shared taxi from this
//! station to that one, and which way does it go?"

pub mod catalog;
pub mod config;
pub mod contribution;
pub mod directions;
pub mod domain;
pub mod fare;
pub mod graph;
pub mod resolver;
pub mod store;
pub mod web;
