//! Waitlist Wizard — headless multi-step application form for Talent Wharf.

pub mod cli;
pub mod config;
pub mod cv;
pub mod error;
pub mod form;
pub mod ics;
pub mod referral;
pub mod skills;
pub mod store;
pub mod submit;
pub mod wizard;
