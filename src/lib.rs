pub mod boxscore;
pub mod data;
pub mod domain;
pub mod minutes;
pub mod periods;
pub mod print;
pub mod rating;
pub mod rotation;
pub mod summary;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
