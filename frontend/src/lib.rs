pub mod api;
pub mod board;
pub mod config;
pub mod controller;
pub mod expense;
pub mod form;
pub mod guard;
pub mod logging;
pub mod notice;
pub mod session;
pub mod store;
pub mod view;

#[cfg(test)]
mod test_utils;
