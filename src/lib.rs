//! The Nimbus CLI client library.
//!
//! This crate provides the core functionality for the Nimbus Workspace CLI
//! client: resource reference resolution, request composition and dispatch,
//! upload policy, result adaptation, data models, configuration and command
//! execution.
//!
//! # Modules
//!
//! - `adapt`: Result adaptation (identifier aliases, container back-references, ordering)
//! - `actions`: CLI command implementations
//! - `client`: HTTP transport
//! - `configuration`: Configuration management
//! - `container_cache`: Container id to display-name lookup
//! - `dispatch`: Request dispatch with transparent pagination
//! - `format`: Data formatting utilities for the supported output formats
//! - `model`: Data models for Nimbus entities (users, groups, containers, items)
//! - `nimbus_v1`: Nimbus Workspace V1 API client implementation
//! - `query`: Request URI composition
//! - `resolve`: Container and item reference resolution
//! - `upload`: Conflict handling and upload mode policy

pub mod actions;
pub mod adapt;
pub mod cli;
pub mod client;
pub mod commands;
pub mod configuration;
pub mod container_cache;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod exit_codes;
pub mod format;
pub mod model;
pub mod nimbus_v1;
pub mod query;
pub mod resolve;
pub mod upload;
