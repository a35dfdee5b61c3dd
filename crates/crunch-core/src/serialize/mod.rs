pub mod bin;
pub mod json;
pub mod xml;

pub use bin::to_bin;
pub use json::to_json;
pub use xml::to_xml;
