// Copyright (c) Contributors to the Workbench project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;
use std::path::PathBuf;

use super::*;
use crate::fragment::{AppendVar, HookSet, PrependVar, SetVar};

fn make_fragment(source: &str, hooks: HookSet, variables: Vec<VarOp>) -> Fragment {
    Fragment {
        hooks,
        variables,
        source_path: Some(PathBuf::from(source)),
        ..Fragment::default()
    }
}

fn set(name: &str, value: &str) -> VarOp {
    VarOp::Set(SetVar {
        set: name.to_string(),
        value: value.to_string(),
    })
}

#[rstest]
fn test_compose_empty_uses_defaults() {
    let config = Config::with_root("/wb");
    let descriptor = compose(&[], "bench", ExecutionMode::Activate, &[], &config);

    assert_eq!(descriptor.hooks, ResolvedHooks::default());
    assert!(descriptor.chain.is_empty());
    assert!(descriptor.variables.is_empty());
    assert_eq!(descriptor.name, "bench");
}

#[rstest]
fn test_later_hook_definitions_shadow_earlier() {
    let config = Config::with_root("/wb");
    let shelf = make_fragment(
        "/wb/wb.shelf",
        HookSet {
            activate: Some("echo shelf".into()),
            command: Some("make shelf".into()),
            ..HookSet::default()
        },
        vec![],
    );
    let bench = make_fragment(
        "/wb/b.bench",
        HookSet {
            activate: Some("echo bench".into()),
            ..HookSet::default()
        },
        vec![],
    );

    let descriptor = compose(
        &[shelf, bench],
        "b",
        ExecutionMode::Activate,
        &[],
        &config,
    );

    // Nearest wins; omitted hooks keep the previous binding.
    assert_eq!(descriptor.hooks.activate, "echo bench");
    assert_eq!(descriptor.hooks.command, "make shelf");
    assert_eq!(descriptor.hooks.deactivate, ":");
}

#[rstest]
fn test_variable_set_is_last_writer_wins() {
    let config = Config::with_root("/wb");
    let first = make_fragment("/wb/wb.shelf", HookSet::default(), vec![set("FOO", "one")]);
    let second = make_fragment("/wb/b.bench", HookSet::default(), vec![set("FOO", "two")]);

    let descriptor = compose(
        &[first, second],
        "b",
        ExecutionMode::Command,
        &[],
        &config,
    );
    assert_eq!(descriptor.variables, vec![("FOO".to_string(), "two".to_string())]);
}

#[rstest]
fn test_variable_append_and_prepend() {
    let config = Config::with_root("/wb");
    let fragment = make_fragment(
        "/wb/b.bench",
        HookSet::default(),
        vec![
            set("PATH", "/base"),
            VarOp::Append(AppendVar {
                append: "PATH".into(),
                value: "/end".into(),
                separator: None,
            }),
            VarOp::Prepend(PrependVar {
                prepend: "PATH".into(),
                value: "/front".into(),
                separator: None,
            }),
            VarOp::Append(AppendVar {
                append: "FLAGS".into(),
                value: "-O2".into(),
                separator: Some(" ".into()),
            }),
        ],
    );

    let descriptor = compose(&[fragment], "b", ExecutionMode::Command, &[], &config);
    assert_eq!(
        descriptor.variables,
        vec![
            ("PATH".to_string(), "/front:/base:/end".to_string()),
            ("FLAGS".to_string(), "-O2".to_string()),
        ]
    );
}

#[rstest]
fn test_config_hook_overrides_apply_last() {
    let mut config = Config::with_root("/wb");
    config.hook_overrides.command = Some("/usr/bin/true".into());

    let bench = make_fragment(
        "/wb/b.bench",
        HookSet {
            command: Some("make".into()),
            ..HookSet::default()
        },
        vec![],
    );

    let descriptor = compose(&[bench], "b", ExecutionMode::Command, &[], &config);
    assert_eq!(descriptor.hooks.command, "/usr/bin/true");
}

#[rstest]
fn test_display_name_override() {
    let mut config = Config::with_root("/wb");
    config.display_name = Some("custom".into());

    let descriptor = compose(&[], "b", ExecutionMode::Activate, &[], &config);
    assert_eq!(descriptor.name, "custom");
}

#[rstest]
fn test_render_is_deterministic() {
    let config = Config::with_root("/wb");
    let fragment = make_fragment(
        "/wb/b.bench",
        HookSet {
            activate: Some("echo hi".into()),
            ..HookSet::default()
        },
        vec![set("FOO", "bar")],
    );

    let descriptor = compose(
        &[fragment],
        "b",
        ExecutionMode::Activate,
        &[],
        &config,
    );
    assert_eq!(descriptor.render(), descriptor.render());
}

#[rstest]
fn test_render_exports_chain_metadata() {
    let config = Config::with_root("/wb");
    let shelf = make_fragment("/wb/wb.shelf", HookSet::default(), vec![]);
    let bench = make_fragment("/wb/a/b.bench", HookSet::default(), vec![]);

    let descriptor = compose(
        &[shelf, bench],
        "a/b",
        ExecutionMode::Activate,
        &[],
        &config,
    );
    let rendered = descriptor.render();

    assert!(rendered.contains("WORKBENCH_CHAIN='/wb/wb.shelf:/wb/a/b.bench'"));
    assert!(rendered.contains("WORKBENCH_MODE='activate'"));
    assert!(rendered.contains("WORKBENCH_NAME='a/b'"));
}

#[rstest]
fn test_swapping_adjacent_fragments_changes_composition() {
    let config = Config::with_root("/wb");
    let one = make_fragment("/wb/one", HookSet::default(), vec![set("FOO", "one")]);
    let two = make_fragment("/wb/two", HookSet::default(), vec![set("FOO", "two")]);

    let forward = compose(
        &[one.clone(), two.clone()],
        "b",
        ExecutionMode::Command,
        &[],
        &config,
    );
    let reversed = compose(&[two, one], "b", ExecutionMode::Command, &[], &config);

    assert_ne!(forward.variables, reversed.variables);
    assert_ne!(forward.render(), reversed.render());
}

#[rstest]
fn test_command_epilogue_quotes_forwarded_args() {
    let config = Config::with_root("/wb");
    let args = vec!["build".to_string(), "it's here".to_string()];

    let descriptor = compose(&[], "b", ExecutionMode::Command, &args, &config);
    let rendered = descriptor.render();

    assert!(rendered.contains("wb_hook_command 'build' 'it'\\''s here'"));
    assert!(rendered.ends_with("exit $?\n"));
}

#[rstest]
fn test_new_epilogue_invokes_creation_hook() {
    let config = Config::with_root("/wb");
    let descriptor = compose(&[], "b", ExecutionMode::New, &[], &config);
    let rendered = descriptor.render();

    assert!(rendered.contains("wb_hook_new\n"));
    assert!(rendered.contains("WORKBENCH_MODE='new'"));
}

#[rstest]
fn test_activate_epilogue_decorates_prompt() {
    let config = Config::with_root("/wb");
    let descriptor = compose(&[], "b", ExecutionMode::Activate, &[], &config);
    let rendered = descriptor.render();

    assert!(rendered.contains("PS1=\"(${WORKBENCH_NAME}) ${PS1:-\\$ }\""));
    assert!(rendered.ends_with("wb_hook_activate\n"));
}
