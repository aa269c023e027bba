// Profile CRUD: the resume material every CV is generated from.

pub mod handlers;
pub mod service;
pub mod validation;
