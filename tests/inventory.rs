use std::fs;
use std::io::Read;

use flate2::read::ZlibDecoder;
use tempfile::TempDir;

use docs_publish::inventory::{cppref_items, write_inventory, InvItem, Role};

const HEADER: &[u8] = b"# Sphinx inventory version 2\n\
# Project: cppreference\n\
# Version: 0\n\
# The remainder of this file is compressed using zlib.\n";

fn decode_records(bytes: &[u8]) -> String {
    assert!(
        bytes.starts_with(HEADER),
        "inventory header mismatch: {:?}",
        String::from_utf8_lossy(&bytes[..HEADER.len().min(bytes.len())])
    );
    let mut decoder = ZlibDecoder::new(&bytes[HEADER.len()..]);
    let mut text = String::new();
    decoder
        .read_to_string(&mut text)
        .expect("Inventory body decompresses");
    text
}

#[test]
fn writes_header_and_compressed_records() {
    let dir = TempDir::new().expect("Creating temp dir failed");
    let path = dir.path().join("test.inv");
    let items = vec![
        InvItem::named(
            "std__string",
            Role::CppType,
            "cpp/string/basic_string",
            "std::string",
        ),
        InvItem::new("size_t", Role::CppType, "c/types/size_t"),
    ];

    let written = write_inventory(&path, "cppreference", "0", &items).expect("Write succeeds");
    assert!(written);

    let text = decode_records(&fs::read(&path).expect("Inventory readable"));
    assert_eq!(
        text,
        "std__string cpp:type 1 cpp/string/basic_string std::string\n\
         size_t cpp:type 1 c/types/size_t size_t\n"
    );
}

#[test]
fn display_name_falls_back_to_refname() {
    let dir = TempDir::new().expect("Creating temp dir failed");
    let path = dir.path().join("test.inv");
    let items = vec![InvItem::new("timespec", Role::CppClass, "c/chrono/timespec")];

    write_inventory(&path, "cppreference", "0", &items).expect("Write succeeds");

    let text = decode_records(&fs::read(&path).expect("Inventory readable"));
    assert_eq!(text, "timespec cpp:class 1 c/chrono/timespec timespec\n");
}

#[test]
fn skips_write_when_content_unchanged() {
    let dir = TempDir::new().expect("Creating temp dir failed");
    let path = dir.path().join("test.inv");
    let items = cppref_items();

    let first = write_inventory(&path, "cppreference", "0", &items).expect("Write succeeds");
    assert!(first);
    let bytes = fs::read(&path).expect("Inventory readable");

    let second = write_inventory(&path, "cppreference", "0", &items).expect("Write succeeds");
    assert!(!second, "identical content must not be rewritten");
    assert_eq!(bytes, fs::read(&path).expect("Inventory readable"));
}

#[test]
fn rewrites_when_items_change() {
    let dir = TempDir::new().expect("Creating temp dir failed");
    let path = dir.path().join("test.inv");

    write_inventory(
        &path,
        "cppreference",
        "0",
        &[InvItem::new("size_t", Role::CppType, "c/types/size_t")],
    )
    .expect("Write succeeds");

    let written = write_inventory(
        &path,
        "cppreference",
        "0",
        &[InvItem::new("ptrdiff_t", Role::CppType, "c/types/ptrdiff_t")],
    )
    .expect("Write succeeds");
    assert!(written);

    let text = decode_records(&fs::read(&path).expect("Inventory readable"));
    assert_eq!(text, "ptrdiff_t cpp:type 1 c/types/ptrdiff_t ptrdiff_t\n");
}

#[test]
fn cppref_table_covers_fixed_width_integers_in_both_domains() {
    let items = cppref_items();
    let records: Vec<String> = items
        .iter()
        .flat_map(|item| {
            item.refnames.iter().map(move |refname| {
                format!(
                    "{refname} {} {} {}",
                    item.role,
                    item.path,
                    item.disp_name.as_deref().unwrap_or(refname)
                )
            })
        })
        .collect();

    assert!(records.contains(&"uint64_t cpp:type c/types/integer uint64_t".to_string()));
    assert!(records.contains(&"std__uint64_t cpp:type cpp/types/integer std::uint64_t".to_string()));
    assert!(records.contains(&"std__errc cpp:enum cpp/error/errc std::errc".to_string()));
}
