pub mod sa;

pub use sa::TemplateIndex;
