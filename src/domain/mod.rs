pub mod entities;
pub mod policy;
pub mod ports;
pub mod value_objects;
