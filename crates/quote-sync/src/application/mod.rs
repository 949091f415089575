//! # Application Module
//!
//! Application services orchestrating the domain and outbound ports.

pub mod coordinator;
pub mod notice;
pub mod service;

pub use coordinator::MutationCoordinator;
pub use notice::{Notice, NoticeBus, NoticeLevel};
pub use service::QuoteBoardService;
