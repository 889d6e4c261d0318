//! # tcm-core
//!
//! Core types shared by every TCM crate.
//!
//! This crate provides:
//! - Entity structs for test cases, projects and tags
//! - Status and priority enums with their SQL/form string forms
//! - Input validation and flexible date parsing
//! - Pagination math and relative-time formatting
//! - Response types for list, search and dashboard views
//! - Cross-cutting error types

pub mod dates;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod nullable;
pub mod pagination;
pub mod relative_time;
pub mod responses;
pub mod validation;
