pub mod decode;
pub mod schema;
