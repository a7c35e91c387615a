//! SafeRoute Core Library
//!
//! Core functionality for SafeRoute - a safe route social app.
//! This crate provides the app logic behind the UI: contact requests and
//! their notifications, user profiles and page access, and the auth state,
//! all over an injected document store.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

pub mod address;
mod api;
pub mod auth;
pub mod config;
pub mod contacts;
mod error;
pub mod notice;
pub mod store;
pub mod users;

pub use api::SafeRouteCore;
pub use error::{CoreError, Result};
