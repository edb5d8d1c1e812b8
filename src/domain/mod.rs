pub mod datatype;
pub mod entity;
mod transform;
