//! # API Module
//!
//! Contains the HTTP API implementation for the watch service.
//!
//! ## Structure
//!
//! * `controllers` - Request handling and business logic
//! * `routes` - API endpoint definitions and routing

pub mod controllers;

pub mod routes;
