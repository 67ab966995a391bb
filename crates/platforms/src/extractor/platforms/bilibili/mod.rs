mod builder;
mod models;

pub use builder::Bilibili;
