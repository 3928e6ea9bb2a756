//! modkit - authoring core for distributable mod packages.
//!
//! A package is an authored, uniquely identified bundle of content entries
//! (spawnables, levels, avatars) and metadata records (audio discs, tags,
//! surfaces). This crate allocates package identifiers, keeps the process-wide
//! [`Catalog`](catalog::Catalog), creates typed items against resolved assets,
//! and validates and packs packages into distributable artifacts.
//!
//! # Modules
//!
//! - [`package`] - identifiers, packages, entries, records and kinds
//! - [`asset`] - asset resolution
//! - [`store`] - package persistence
//! - [`catalog`] - the identifier-to-package registry
//! - [`factory`] - entry and record creation
//! - [`packer`] - validation and artifact writing
//! - [`workshop`] - the authoring operations, wired together
//! - [`commands`] - name-plus-parameters command boundary
//! - [`events`] - post-mutation notifications
//! - [`config`] / [`logging`] - host configuration

pub mod asset;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod factory;
pub mod logging;
pub mod package;
pub mod packer;
pub mod store;
pub mod workshop;

pub use error::{CatalogError, CatalogResult, ErrorCode};
