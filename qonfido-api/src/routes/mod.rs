pub(crate) mod ask;
pub(crate) mod error;

pub(crate) use error::ApiError;
