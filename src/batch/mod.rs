pub(crate) mod coordinator;
pub(crate) mod discover;
pub(crate) mod sink;
