pub mod issues;
pub mod labels;
