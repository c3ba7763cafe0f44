//! Tooling for building, normalising and publishing the Sphinx
//! documentation of a C/C++ project.
//!
//! Two binaries are built from this library:
//!
//! - `docs-build`: run the Sphinx build and optionally commit/push the
//!   rendered pages to a publishing branch.
//! - `include-fixup`: rewrite local `#include "..."` directives to the
//!   canonical `#include <...>` form across the source trees.

pub mod cli;
pub mod git;
pub mod includes;
pub mod inventory;
pub mod load_config;
pub mod publish;
pub mod sphinx;
