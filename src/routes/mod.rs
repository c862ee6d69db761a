//! Route modules for SmartScan Server

pub mod health;
pub mod sessions;
pub mod ui;
