pub mod account;
pub mod comment;
pub mod post;
pub mod response;

pub use account::AccountService;
pub use comment::CommentService;
pub use post::PostService;
