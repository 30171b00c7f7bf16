//! Notifications surfaced to the user.

pub mod board;
pub mod notice_id;

pub use board::{Notice, NoticeBoard};
pub use notice_id::NoticeId;
