//! Application use cases / business logic

pub mod admin;
pub mod article_page;
pub mod carousel;
pub mod feed;
pub mod reading_list;

pub use admin::{AdminConfig, AdminError, AdminWorkflow, BatchReport, DEFAULT_TOPICS};
pub use article_page::{ArticleReader, ArticleView, PageOutcome};
pub use carousel::{Carousel, DEFAULT_ROTATION_PERIOD, RotationHandle, Slide};
pub use feed::{CommentOutcome, FeedError, FeedSynchronizer, ToggleOutcome};
pub use reading_list::ReadingList;
