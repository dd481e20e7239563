// tests/block_registry.rs

use barfeed::blocks::{strip_newline, BlockRegistry};
use barfeed::errors::FeedError;
use barfeed::types::{BlockId, BlockKind};
use barfeed_test_utils::builders::FeedConfigBuilder;

#[test]
fn compose_concatenates_in_order_without_separator() {
    let cfg = FeedConfigBuilder::new()
        .raw("A")
        .continuous("echo B")
        .single("echo C", &[])
        .raw("D")
        .build();
    let mut registry = BlockRegistry::from_config(&cfg);

    assert_eq!(registry.compose(), "AD\n");

    registry.set_text(BlockId(1), "B".to_string()).unwrap();
    registry.set_text(BlockId(2), "C".to_string()).unwrap();
    assert_eq!(registry.compose(), "ABCD\n");
}

#[test]
fn raw_blocks_cannot_be_changed() {
    let cfg = FeedConfigBuilder::new().raw("fixed").continuous("x").build();
    let mut registry = BlockRegistry::from_config(&cfg);

    let err = registry.set_text(BlockId(0), "other".to_string()).unwrap_err();
    assert!(matches!(err, FeedError::ConfigError(_)));

    registry.set_text(BlockId(1), "moving".to_string()).unwrap();
    assert_eq!(registry.get(BlockId(0)).unwrap().text(), "fixed");
}

#[test]
fn single_blocks_are_listed_with_their_commands() {
    let cfg = FeedConfigBuilder::new()
        .single("date", &["tick"])
        .raw("|")
        .single("uptime", &[])
        .build();
    let registry = BlockRegistry::from_config(&cfg);

    assert_eq!(registry.single_blocks(), vec![BlockId(0), BlockId(2)]);

    let block = registry.get(BlockId(2)).unwrap();
    assert_eq!(block.kind(), BlockKind::Single);
    assert_eq!(block.single_cmd(), Some("uptime"));
    assert!(block.last_refresh().is_none());
    assert_eq!(block.text(), "");
}

#[test]
fn empty_registry_composes_a_bare_newline() {
    let registry = BlockRegistry::from_specs(&[]);
    assert!(registry.is_empty());
    assert_eq!(registry.compose(), "\n");
}

#[test]
fn strip_newline_removes_only_one_terminator() {
    assert_eq!(strip_newline("X\n".to_string()), "X");
    assert_eq!(strip_newline("X\r\n".to_string()), "X");
    assert_eq!(strip_newline("X".to_string()), "X");
    assert_eq!(strip_newline("X\n\n".to_string()), "X\n");
}
