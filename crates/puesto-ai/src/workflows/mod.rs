pub mod import;
pub mod normative;
pub mod positions;
