mod fields;
mod services;
mod templates;

pub use fields::{service_fields, ServiceField, ServiceFields};
pub use services::{service_info, service_name, ServiceCategory, ServiceInfo, SERVICES};
pub use templates::{template, Difficulty, Template, TEMPLATES};
