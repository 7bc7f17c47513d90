pub(crate) mod kv;
