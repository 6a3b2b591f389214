pub mod all;
pub mod completions;
pub mod run;
