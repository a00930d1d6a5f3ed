/// Business logic layer; handlers stay thin and call into these services.
pub mod catalog;
pub mod comments;
pub mod media;
pub mod posts;
pub mod users;

pub use catalog::CatalogService;
pub use comments::CommentService;
pub use media::MediaStore;
pub use posts::{PostPatch, PostService};
pub use users::UserService;
