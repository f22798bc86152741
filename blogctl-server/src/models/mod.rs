//! Domain models with validation at construction
//!
//! All request input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod comment;
pub mod email;
pub mod pagination;
pub mod post;
pub mod reference;
pub mod status;
pub mod user;
pub mod validation;

pub use comment::{CommentDraft, CommentFilter, CommentPayload, COMMENT_SORTABLE};
pub use email::Email;
pub use pagination::{Direction, Page, PageParams, PageRequest, Sort, SortableColumns};
pub use post::{PostDraft, PostFilter, PostPayload, POST_SORTABLE};
pub use reference::ResourceRef;
pub use status::{CommentStatus, InvalidStatusCode};
pub use user::{UserDraft, UserFilter, UserPayload, USER_SORTABLE};
pub use validation::ValidationError;
