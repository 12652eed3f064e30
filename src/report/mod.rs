//! Report output for scan results

pub mod html;
pub mod json;
