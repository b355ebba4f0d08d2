use super::{extract_component, staging_path, ComponentFile};
use crate::error::MigrateError;
use crate::formats::vue::VueFormat;
use crate::style_lang::StyleLang;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

#[test]
fn test_staging_path_is_deterministic() {
    assert_eq!(
        staging_path(Path::new("src/App.vue"), 2, StyleLang::Sass),
        Path::new("src/App.vue.vue_sass_migrating.2.sass")
    );
}

#[test]
fn test_extract_writes_one_staging_file_per_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("App.vue");
    let source = "<template><p/></template>\n<style>\n.a { top: 0 }\n</style>\n<style lang=\"scss\" scoped>.b >>> .c {}</style>\n";
    fs::write(&path, source).unwrap();

    let mut component = ComponentFile::new(path.clone());
    extract_component(&mut component, &VueFormat).unwrap();

    assert_eq!(component.chunks.len(), 2);
    let css = &component.chunks[0];
    let scss = &component.chunks[1];
    assert_eq!(css.lang, StyleLang::Css);
    assert_eq!(scss.lang, StyleLang::Scss);
    assert_eq!(css.staging_path, staging_path(&path, 0, StyleLang::Css));
    assert_eq!(scss.staging_path, staging_path(&path, 1, StyleLang::Scss));
    assert_eq!(fs::read_to_string(&css.staging_path).unwrap(), "\n.a { top: 0 }\n");
    assert_eq!(fs::read_to_string(&scss.staging_path).unwrap(), ".b >>> .c {}");
    assert_eq!(&source[scss.byte_start..scss.byte_end], ".b >>> .c {}");
    // the component itself is untouched
    assert_eq!(fs::read_to_string(&path).unwrap(), source);
}

#[test]
fn test_unknown_language_keeps_earlier_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Bad.vue");
    fs::write(
        &path,
        "<style lang=\"scss\">.a{}</style>\n<style lang=\"stylus\">.b\n  top 0</style>\n",
    )
    .unwrap();

    let mut component = ComponentFile::new(path);
    let err = extract_component(&mut component, &VueFormat).unwrap_err();

    assert!(matches!(
        err,
        MigrateError::UnknownStyleLanguage { ref lang, .. } if lang == "stylus"
    ));
    assert_eq!(component.chunks.len(), 1);
    assert!(component.chunks[0].staging_path.exists());
}

#[test]
fn test_component_without_styles_has_no_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Plain.vue");
    fs::write(&path, "<template><div/></template>\n<script>export default {}</script>\n").unwrap();

    let mut component = ComponentFile::new(path);
    extract_component(&mut component, &VueFormat).unwrap();

    assert!(component.chunks.is_empty());
}
