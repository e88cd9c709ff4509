pub(crate) mod banner;
pub(crate) mod confirm;
pub(crate) mod logger;
