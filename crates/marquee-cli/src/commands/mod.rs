pub mod config;
pub mod project;
pub mod section;
pub mod testimonial;
pub mod visibility;
pub mod watch;
