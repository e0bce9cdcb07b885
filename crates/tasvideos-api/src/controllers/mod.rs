pub mod publications;

pub use publications::PublicationsModule;
