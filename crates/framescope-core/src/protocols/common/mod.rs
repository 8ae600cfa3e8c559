pub(crate) mod format;
pub(crate) mod names;
pub(crate) mod ports;
pub(crate) mod reader;
