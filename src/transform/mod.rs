pub(crate) mod square;
