pub(crate) mod composite;
pub(crate) mod poster;
pub(crate) mod surface;
