//! Shared-library effects and the library foreign runtime, run against the
//! `tests/fixtures/effects_fixture` cdylib.

use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use bullet_bridge::config::ForeignBackend;
use bullet_bridge::effects::{
    LibraryNativeEffect, LibraryStackingEffect, NativeEffect, StackingEffect,
};
use bullet_bridge::foreign::{ForeignHandler, LibraryRuntime};
use bullet_bridge::{
    BridgeConfig, Bullet, BulletFactory, ForeignError, ForeignRuntime, Halt, RecordCodec,
    RecordError,
};

/// Builds the fixture once per test binary and returns the library path.
fn fixture() -> &'static Path {
    static LIBRARY: OnceLock<PathBuf> = OnceLock::new();
    LIBRARY.get_or_init(|| {
        let manifest = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("effects_fixture")
            .join("Cargo.toml");
        let target_dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join("effects_fixture");

        let status = Command::new(env!("CARGO"))
            .args(["build", "--quiet", "--manifest-path"])
            .arg(&manifest)
            .arg("--target-dir")
            .arg(&target_dir)
            .status()
            .expect("failed to run cargo for the effects fixture");
        assert!(status.success(), "effects fixture failed to build");

        target_dir
            .join("debug")
            .join(format!("{}effects_fixture{}", DLL_PREFIX, DLL_SUFFIX))
    })
}

fn library_config() -> BridgeConfig {
    let mut config = BridgeConfig::default();
    config.native.c.library = Some(fixture().to_path_buf());
    config.native.cpp.library = Some(fixture().to_path_buf());
    config.foreign.backend = ForeignBackend::Library;
    config.foreign.library.path = Some(fixture().to_path_buf());
    config
}

fn with_hp(hp: i32) -> Bullet {
    let mut b = Bullet::default();
    b.set_hp(hp);
    b
}

#[test]
fn test_native_effect_mutates_in_place() {
    let effect = LibraryNativeEffect::load(fixture(), "c_create_bullet").unwrap();
    let mut b = Bullet::default();
    effect.apply(&mut b);
    assert_eq!(b.count(), 11);
    assert_eq!(b.damage(), 1);
    assert_eq!(b.mp_cost(), 1);
}

#[test]
fn test_stacking_index_reaches_library() {
    let effect = LibraryStackingEffect::load(fixture(), "cpp_create_bullet").unwrap();
    let mut b = Bullet::default();
    effect.apply(&mut b, 3);
    assert_eq!(b.damage(), 300);
}

#[test]
fn test_factory_with_library_handlers() {
    let mut factory = BulletFactory::from_config(&library_config()).unwrap();
    let outcome = factory
        .forge(&["C", "c plus plus", "go"], 3)
        .unwrap()
        .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.bullet.count(), 11);
    // "c plus plus" at position 1 sees stacking 2
    assert_eq!(outcome.bullet.damage(), 200);
    assert_eq!(outcome.bullet.hp(), 5);
}

#[test]
fn test_transform_success() {
    let runtime = LibraryRuntime::new(fixture(), "bullet_transform");
    let out = runtime.transform(&RecordCodec::encode(&with_hp(10))).unwrap();
    assert_eq!(RecordCodec::decode(&out).unwrap().hp(), 15);
}

#[test]
fn test_transform_negative_return_is_library_error() {
    let runtime = LibraryRuntime::new(fixture(), "bullet_transform");
    let err = runtime
        .transform(&RecordCodec::encode(&with_hp(-1)))
        .unwrap_err();
    assert!(matches!(err, ForeignError::Library(ref msg) if msg.contains("-7")));
    assert!(!err.is_fatal());
}

#[test]
fn test_transform_oversized_claim_is_library_error() {
    let runtime = LibraryRuntime::new(fixture(), "bullet_transform");
    let err = runtime
        .transform(&RecordCodec::encode(&with_hp(-2)))
        .unwrap_err();
    assert!(matches!(err, ForeignError::Library(ref msg) if msg.contains("buffer")));
}

#[test]
fn test_short_reply_leaves_record_unchanged() {
    let handler = ForeignHandler::new(LibraryRuntime::new(fixture(), "bullet_transform"));
    let mut b = with_hp(-3);
    let before = b;

    let err = handler.apply(&mut b).unwrap_err();
    assert!(matches!(
        err,
        ForeignError::Record(RecordError::LengthMismatch {
            expected: 25,
            actual: 24
        })
    ));
    assert_eq!(b, before);
}

#[test]
fn test_library_runtime_applies_per_tag() {
    let mut factory = BulletFactory::from_config(&library_config()).unwrap();
    let outcome = factory.forge(&["go", "go"], 2).unwrap().unwrap();
    assert_eq!(outcome.bullet.hp(), 10);
    assert!(outcome.halt.is_none());
}

#[test]
fn test_missing_transform_symbol_is_foreign_init() {
    let mut config = library_config();
    config.foreign.library.symbol = "no_such_transform".to_string();

    let mut factory = BulletFactory::from_config(&config).unwrap();
    let err = factory.create(&["go"], 1).unwrap_err();
    assert!(matches!(err, bullet_bridge::BridgeError::ForeignInit(ref r) if r.contains("no_such_transform")));

    // tags before the foreign one still work on their own
    let outcome = factory.forge(&["C", "bogus"], 2).unwrap().unwrap();
    assert!(matches!(outcome.halt, Some(Halt::UnknownTag { position: 1, .. })));
}
