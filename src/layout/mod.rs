pub(crate) mod arrange;
pub(crate) mod compose;
pub(crate) mod order;
