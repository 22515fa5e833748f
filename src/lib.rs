//! Browser-side glue for the Aristotle metadata registry.
//!
//! The core is [`manager::FormsetManager`], which keeps a server-rendered Django formset consistent
//! while its rows are added, dragged into a new order and submitted.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod control;
pub mod dom;
pub mod drag;
pub mod editor;
pub mod glossary;
pub mod listeners;
pub mod load;
pub mod loading;
pub mod manager;
pub mod name;
pub mod notifications;
pub mod page;
pub mod request;
pub mod row;
pub mod visibility;
