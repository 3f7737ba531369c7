mod notification;
mod reminder;
mod status;

pub use crate::notification::api::*;
pub use crate::reminder::api::*;
pub use crate::status::api::*;
