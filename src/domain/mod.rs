//! Domain logic - pure release rules independent of git and the hosting API

pub mod commit;
pub mod preset;
pub mod repository;
pub mod tag;
pub mod version;

pub use commit::Commit;
pub use preset::Preset;
pub use repository::RepositoryDescriptor;
pub use tag::ReleaseTag;
pub use version::BumpLevel;
