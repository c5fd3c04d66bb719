//! UI building blocks.

pub mod particle_field;
