pub(crate) mod composite;
pub(crate) mod watermark;
