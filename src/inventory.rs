//! Generation of the Sphinx object inventory consumed by intersphinx.
//!
//! The inventory format is under-documented but fairly stable: a plaintext
//! header of `#`-prefixed lines followed by a zlib-compressed stream of
//! newline-terminated records. See
//! <https://sphobjinv.readthedocs.io/en/stable/syntax.html>.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use tracing::{debug, info};

/// File name of the generated cppreference inventory inside the docs
/// source directory.
pub const CPPREF_INVENTORY_FILE: &str = "cppref.generated.inv";

/// Sphinx cross-reference roles valid in a generated inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    CppClass,
    CppConcept,
    CppEnum,
    CppFunction,
    CppMember,
    CppType,
    CMacro,
    StdTerm,
    StdLabel,
    StdDoc,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::CppClass => "cpp:class",
            Role::CppConcept => "cpp:concept",
            Role::CppEnum => "cpp:enum",
            Role::CppFunction => "cpp:function",
            Role::CppMember => "cpp:member",
            Role::CppType => "cpp:type",
            Role::CMacro => "c:macro",
            Role::StdTerm => "std:term",
            Role::StdLabel => "std:label",
            Role::StdDoc => "std:doc",
        })
    }
}

/// One object in a Sphinx inventory.
#[derive(Debug, Clone)]
pub struct InvItem {
    /// One or more names that are valid as link refs for the object.
    pub refnames: Vec<String>,
    /// The intended link role for the object.
    pub role: Role,
    /// Relative path to the linked object from the doc root.
    pub path: String,
    /// Display name for the object, if different from the link ref.
    pub disp_name: Option<String>,
}

impl InvItem {
    pub fn new(refname: &str, role: Role, path: &str) -> Self {
        Self {
            refnames: vec![refname.to_string()],
            role,
            path: path.to_string(),
            disp_name: None,
        }
    }

    pub fn named(refname: &str, role: Role, path: &str, disp_name: &str) -> Self {
        Self {
            refnames: vec![refname.to_string()],
            role,
            path: path.to_string(),
            disp_name: Some(disp_name.to_string()),
        }
    }
}

/// The cppreference.com cross-link table.
///
/// Items in the `std` namespace get a `std__` prefix on the link name,
/// because the cpp domain will not otherwise attempt to resolve names that
/// live in `std::`. The `disp_name` carries the proper name of the item.
pub fn cppref_items() -> Vec<InvItem> {
    let mut items = vec![
        InvItem::named(
            "std__coroutine_handle",
            Role::CppClass,
            "cpp/coroutine/coroutine_handle",
            "std::coroutine_handle",
        ),
        InvItem::named(
            "std__coroutine_traits",
            Role::CppClass,
            "cpp/coroutine/coroutine_traits",
            "std::coroutine_traits",
        ),
        InvItem::named(
            "std__suspend_never",
            Role::CppClass,
            "cpp/coroutine/suspend_never",
            "std::suspend_never",
        ),
        InvItem::named(
            "std__suspend_always",
            Role::CppClass,
            "cpp/coroutine/suspend_always",
            "std::suspend_always",
        ),
        InvItem::named("std__bad_alloc", Role::CppClass, "cpp/memory/new/bad_alloc", "std::bad_alloc"),
        InvItem::named("std__error_code", Role::CppClass, "cpp/error/error_code", "std::error_code"),
        InvItem::named(
            "std__system_error",
            Role::CppClass,
            "cpp/error/system_error",
            "std::system_error",
        ),
        InvItem::named("std__errc", Role::CppEnum, "cpp/error/errc", "std::errc"),
        InvItem::named(
            "std__exception_ptr",
            Role::CppClass,
            "cpp/error/exception_ptr",
            "std::exception_ptr",
        ),
        InvItem::named(
            "std__string_view",
            Role::CppType,
            "cpp/string/basic_string_view",
            "std::string_view",
        ),
        InvItem::named("std__string", Role::CppType, "cpp/string/basic_string", "std::string"),
        InvItem::named("std__move", Role::CppFunction, "cpp/utility/move", "std::move"),
        InvItem::named("std__forward", Role::CppFunction, "cpp/utility/forward", "std::forward"),
        InvItem::new("size_t", Role::CppType, "c/types/size_t"),
        InvItem::named("std__size_t", Role::CppType, "cpp/types/size_t", "std::size_t"),
        InvItem::new("ptrdiff_t", Role::CppType, "c/types/ptrdiff_t"),
        InvItem::named("std__ptrdiff_t", Role::CppType, "cpp/types/ptrdiff_t", "std::ptrdiff_t"),
        InvItem::named("std__byte", Role::CppType, "cpp/types/byte", "std::byte"),
        InvItem::named(
            "std__forward_iterator",
            Role::CppConcept,
            "cpp/iterator/forward_iterator",
            "std::forward_iterator",
        ),
        InvItem::named(
            "std__ranges__forward_range",
            Role::CppConcept,
            "cpp/ranges/forward_range",
            "std::ranges::forward_range",
        ),
        InvItem::new("timespec", Role::CppClass, "c/chrono/timespec"),
        InvItem::named(
            "c/language/value_category",
            Role::StdDoc,
            "c/language/value_category",
            "Value categories (C)",
        ),
        InvItem::named(
            "c/preprocessor/replace",
            Role::StdDoc,
            "c/preprocessor/replace",
            "Replacing test macros (C)",
        ),
        InvItem::named(
            "cpp/language/value_category",
            Role::StdDoc,
            "cpp/language/value_category",
            "Value categories (C++)",
        ),
        InvItem::named(
            "cpp/language/language_linkage",
            Role::StdDoc,
            "cpp/language/language_linkage",
            "Language linkage (C++)",
        ),
        InvItem::named(
            "cpp/language/elaborated_type_specifier",
            Role::StdDoc,
            "cpp/language/elaborated_type_specifier",
            "Elaborated type specifier (C++)",
        ),
    ];
    for itype in [
        "int8_t", "uint8_t", "int16_t", "uint16_t", "int32_t", "uint32_t", "int64_t", "uint64_t",
    ] {
        items.push(InvItem::named(itype, Role::CppType, "c/types/integer", itype));
        items.push(InvItem::named(
            &format!("std__{itype}"),
            Role::CppType,
            "cpp/types/integer",
            &format!("std::{itype}"),
        ));
    }
    items
}

/// Serialise a Sphinx object inventory for use with intersphinx.
///
/// The file is only rewritten when its content would actually change, so
/// unchanged builds do not dirty the docs source tree. Returns whether a
/// write was performed.
pub fn write_inventory(
    out_path: &Path,
    project: &str,
    version: &str,
    items: &[InvItem],
) -> Result<bool> {
    let mut records = Vec::new();
    for item in items {
        for refname in &item.refnames {
            let display = item.disp_name.as_deref().unwrap_or(refname);
            records.extend_from_slice(
                format!("{refname} {} 1 {} {display}\n", item.role, item.path).as_bytes(),
            );
        }
    }
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&records)
        .context("Failed to compress inventory records")?;
    let compressed = encoder
        .finish()
        .context("Failed to finish inventory compression")?;

    let mut data = Vec::new();
    data.extend_from_slice(b"# Sphinx inventory version 2\n");
    data.extend_from_slice(format!("# Project: {project}\n").as_bytes());
    data.extend_from_slice(format!("# Version: {version}\n").as_bytes());
    data.extend_from_slice(b"# The remainder of this file is compressed using zlib.\n");
    data.extend_from_slice(&compressed);

    let current = match fs::read(out_path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Failed to read existing inventory {}", out_path.display())
            })
        }
    };
    if data == current {
        debug!(path = %out_path.display(), "Inventory content unchanged, skipping write");
        return Ok(false);
    }
    fs::write(out_path, &data)
        .with_context(|| format!("Failed to write inventory {}", out_path.display()))?;
    info!(path = %out_path.display(), items = items.len(), "Wrote object inventory");
    Ok(true)
}
