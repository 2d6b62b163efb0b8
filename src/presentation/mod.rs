//! Page views and HTML templates.

pub mod views;
