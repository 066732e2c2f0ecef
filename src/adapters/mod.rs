// Adapters layer: concrete implementations of the domain ports (document store, media host, mail relay).

pub mod brevo;
pub mod cloudinary;
pub mod memory;
#[cfg(feature = "mongo")]
pub mod mongo;

pub use brevo::BrevoMailer;
pub use cloudinary::CloudinaryMediaHost;
pub use memory::{MemoryExperienceRepository, MemoryProjectRepository, MemoryUserRepository};
#[cfg(feature = "mongo")]
pub use mongo::MongoStore;
