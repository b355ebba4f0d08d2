use super::{replace_many, write_back, EditPlan, Replacement};
use crate::error::MigrateError;
use crate::extract::{ComponentFile, StyleChunk};
use crate::style_lang::StyleLang;
use pretty_assertions::assert_eq;
use std::fs;

fn rep(start: usize, end: usize, text: &str) -> Replacement {
    Replacement {
        start,
        end,
        text: text.to_string(),
    }
}

#[test]
fn test_no_replacements_is_identity() {
    assert_eq!(replace_many("abc", &[]).unwrap(), "abc");
}

#[test]
fn test_replacements_are_sorted_before_applying() {
    let out = replace_many("0123456789", &[rep(6, 8, "B"), rep(1, 3, "AAAA")]).unwrap();
    assert_eq!(out, "0AAAA345B89");
}

#[test]
fn test_adjacent_and_empty_ranges() {
    let out = replace_many("abcdef", &[rep(2, 4, "X"), rep(4, 4, "+"), rep(0, 0, ">")]).unwrap();
    assert_eq!(out, ">abX+ef");
}

#[test]
fn test_replaced_text_found_at_shifted_offsets() {
    let original = "<a>one</a><b>two</b><c>three</c>";
    let replacements = vec![rep(3, 6, "ONE!"), rep(13, 16, "2"), rep(23, 28, "")];
    let out = replace_many(original, &replacements).unwrap();

    let mut shift: isize = 0;
    for r in &replacements {
        let start = usize::try_from(isize::try_from(r.start).unwrap() + shift).unwrap();
        assert_eq!(&out[start..start + r.text.len()], r.text);
        shift += isize::try_from(r.text.len()).unwrap() - isize::try_from(r.end - r.start).unwrap();
    }
    assert_eq!(out, "<a>ONE!</a><b>2</b><c></c>");
}

#[test]
fn test_overlap_is_rejected() {
    let err = replace_many("0123456789", &[rep(2, 6, "x"), rep(5, 8, "y")]).unwrap_err();
    assert!(matches!(
        err,
        MigrateError::OverlappingReplacement { start: 5, cursor: 6 }
    ));
}

#[test]
fn test_out_of_bounds_is_rejected() {
    assert!(matches!(
        replace_many("abc", &[rep(1, 9, "x")]),
        Err(MigrateError::ReplacementOutOfBounds { len: 3, .. })
    ));
    assert!(matches!(
        replace_many("abc", &[rep(2, 1, "x")]),
        Err(MigrateError::ReplacementOutOfBounds { .. })
    ));
    assert!(matches!(
        replace_many("é", &[rep(1, 2, "x")]),
        Err(MigrateError::ReplacementOutOfBounds { .. })
    ));
}

#[test]
fn test_write_back_splices_staging_content() {
    let dir = tempfile::tempdir().unwrap();
    let component = dir.path().join("App.vue");
    let original = "<template/>\n<style>.a{}</style>\n<style lang=\"scss\">.b{}</style>\n";
    fs::write(&component, original).unwrap();

    let first = dir.path().join("first.css");
    let second = dir.path().join("second.scss");
    fs::write(&first, ".a { top: 0 }").unwrap();
    fs::write(&second, ".b :deep .c {}").unwrap();

    let start_a = original.find(".a{}").unwrap();
    let start_b = original.find(".b{}").unwrap();
    let file = ComponentFile {
        path: component.clone(),
        chunks: vec![
            StyleChunk {
                staging_path: second,
                lang: StyleLang::Scss,
                byte_start: start_b,
                byte_end: start_b + 4,
                index: 1,
            },
            StyleChunk {
                staging_path: first,
                lang: StyleLang::Css,
                byte_start: start_a,
                byte_end: start_a + 4,
                index: 0,
            },
        ],
    };

    assert!(write_back(&file).unwrap());
    assert_eq!(
        fs::read_to_string(&component).unwrap(),
        "<template/>\n<style>.a { top: 0 }</style>\n<style lang=\"scss\">.b :deep .c {}</style>\n"
    );
}

#[test]
fn test_unchanged_plan_does_not_write() {
    let dir = tempfile::tempdir().unwrap();
    let component = dir.path().join("App.vue");
    fs::write(&component, "<style>.a{}</style>").unwrap();

    let plan = EditPlan {
        file: component.clone(),
        replacements: vec![rep(7, 11, ".a{}")],
    };

    assert!(!plan.apply().unwrap());
}

#[test]
fn test_missing_staging_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = ComponentFile {
        path: dir.path().join("App.vue"),
        chunks: vec![StyleChunk {
            staging_path: dir.path().join("gone.css"),
            lang: StyleLang::Css,
            byte_start: 0,
            byte_end: 0,
            index: 0,
        }],
    };

    assert!(matches!(
        EditPlan::for_component(&file),
        Err(MigrateError::Io { .. })
    ));
}
