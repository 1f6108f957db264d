pub mod explain;
pub mod run;
pub mod validate;
