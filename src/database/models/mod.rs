pub mod admin;
pub mod analytics;
pub mod blog;
pub mod cv;
pub mod newsletter;
pub mod project;
pub mod setting;
pub mod testimonial;

pub use admin::{Admin, AdminCredentials};
pub use analytics::PageVisit;
pub use blog::Blog;
pub use cv::Cv;
pub use newsletter::Subscriber;
pub use project::Project;
pub use testimonial::Testimonial;
