pub mod admin;
pub mod analytics;
pub mod blogs;
pub mod cv;
pub mod form;
pub mod health;
pub mod newsletter;
pub mod projects;
pub mod settings;
pub mod testimonials;
