//! Multi-file runs through the transformer.

mod tests_transformer;
