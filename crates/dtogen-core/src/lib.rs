//! Core types for dtogen.
//!
//! Provides the entity metadata model ([`model::EntityMetadata`]) that the
//! parser produces and DTO generators consume, and project configuration
//! loading ([`config::DtogenConfig`]).

pub mod config;
pub mod model;
