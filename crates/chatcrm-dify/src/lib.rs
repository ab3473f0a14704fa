//! Dify adapter (funnel LLM service).
//!
//! Sends chat text plus stored-media file references to Dify and parses the
//! three historically observed response shapes into plain text chunks.

pub mod client;
pub mod files;
pub mod response;

pub use client::{ChatMessageRequest, DifyClient};
pub use files::{file_for_media, DifyFile, DifyFileType, TransferMethod};
pub use response::DifyResponse;
