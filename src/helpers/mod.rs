//! Helper functions shared by templates, the server, and the freezer

pub mod date;
pub mod url;
