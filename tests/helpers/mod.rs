//! Shared test helpers: the A/B class world and resolved-file fixtures.

#![allow(dead_code)]

pub mod fixture;

pub use fixture::{Fixture, Loc, trim_indent, within};
pub use world::{CLASSPATH, MAPPINGS, a, a_field, a_method, class_symbol};
