//! Schoolhouse client library exports.

pub mod access;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod features;
pub mod mutation;
pub mod notifications;
pub mod observer;
pub mod params;
pub mod rest;
pub mod session;
pub mod validate;
