pub mod brand_config;
pub mod report_config;

pub use brand_config::*;
pub use report_config::*;
