//! MIME classification and file-extension resolution for chat media.

pub mod extension;
pub mod kind;

pub use extension::resolve_extension;
pub use kind::MediaKind;
