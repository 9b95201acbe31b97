//! End-to-end scenarios: insert, render, inspect backend calls

use crate::drawlist::Drawlist;
use crate::key::{DrawKey, KeyHeader, Translucency};
use crate::operation::{OpHandle, OperationPool};
use crate::render_state::{BlendMode, CullMode, TextureId};
use crate::test_utils::{BackendCall, RecordingBackend, TestOp};

use BackendCall::*;

/// Two layer-0 draws sharing shader 5 and one layer-1 draw with a texture
#[test]
fn test_two_layer_scene_call_sequence() {
    let mut ops = OperationPool::new();
    let mut list = Drawlist::with_capacity(16);

    // Inserted out of order on purpose.
    let layout = [
        TestOp {
            layer: 1,
            shader: 3,
            texture: 7,
            model: 1,
            index_count: 30,
            ..Default::default()
        },
        TestOp {
            layer: 0,
            shader: 5,
            texture: 0,
            model: 2,
            index_count: 20,
            ..Default::default()
        },
        TestOp {
            layer: 0,
            shader: 5,
            texture: 0,
            model: 1,
            index_count: 10,
            ..Default::default()
        },
    ];
    for op in &layout {
        let handle = op.insert(&mut ops);
        list.add(&ops, handle);
    }

    let mut backend = RecordingBackend::new();
    let stats = list.render(&ops, &mut backend);

    assert_eq!(
        backend.calls,
        vec![
            UseProgram(5),
            BindVertexArray(1001),
            SetBlend(BlendMode::None),
            SetCull(CullMode::None),
            SetObjectParams(5),
            DrawIndexed(10),
            BindVertexArray(1002),
            SetObjectParams(5),
            DrawIndexed(20),
            BindLayer(1),
            UseProgram(3),
            BindVertexArray(1001),
            BindTexture(0, TextureId(7)),
            SetObjectParams(3),
            DrawIndexed(30),
            EndPass,
        ]
    );

    assert!(stats.sorted);
    assert_eq!(stats.draws, 3);
    assert_eq!(stats.layer_binds, 1);
    assert_eq!(stats.program_binds, 2);
    assert_eq!(stats.texture_binds, 1);
    assert_eq!(stats.entries_scanned, 3);
}

#[test]
fn test_second_render_reuses_sorted_order() {
    let mut ops = OperationPool::new();
    let mut list = Drawlist::with_capacity(8);
    for shader in [3, 1, 2] {
        let handle = TestOp {
            shader,
            index_count: shader,
            ..Default::default()
        }
        .insert(&mut ops);
        list.add(&ops, handle);
    }

    let mut first = RecordingBackend::new();
    assert!(list.render(&ops, &mut first).sorted);

    let mut second = RecordingBackend::new();
    let stats = list.render(&ops, &mut second);
    assert!(!stats.sorted);
    assert_eq!(first.calls, second.calls);
    assert_eq!(second.draws(), vec![1, 2, 3]);
}

#[test]
fn test_empty_render_only_ends_pass() {
    let ops = OperationPool::new();
    let mut list = Drawlist::with_capacity(4);
    let mut backend = RecordingBackend::new();

    let stats = list.render(&ops, &mut backend);

    assert_eq!(backend.calls, vec![EndPass]);
    assert_eq!(stats.draws, 0);
}

#[test]
fn test_command_entries_are_skipped() {
    let mut ops = OperationPool::new();
    let mut list = Drawlist::with_capacity(8);
    let model = TestOp {
        index_count: 11,
        ..Default::default()
    }
    .insert(&mut ops);
    list.add(&ops, model);
    list.add_key(
        DrawKey::command(KeyHeader::default(), 0, 42).unwrap(),
        OpHandle::INVALID,
    );

    let mut backend = RecordingBackend::new();
    let stats = list.render(&ops, &mut backend);

    assert_eq!(stats.entries_scanned, 2);
    assert_eq!(stats.commands_skipped, 1);
    assert_eq!(stats.draws, 1);
    assert_eq!(backend.draws(), vec![11]);
    assert_eq!(list.live_entries()[1].key.kind(), crate::key::KeyKind::Command);
}

#[test]
fn test_translucent_draws_after_opaque_back_to_front() {
    let mut ops = OperationPool::new();
    let mut list = Drawlist::with_capacity(8);
    let layout = [
        (BlendMode::Alpha, 2.0, 1),
        (BlendMode::None, 50.0, 2),
        (BlendMode::Alpha, 40.0, 3),
        (BlendMode::None, 1.0, 4),
    ];
    for (blend, depth, tag) in layout {
        let handle = TestOp {
            blend,
            depth,
            index_count: tag,
            ..Default::default()
        }
        .insert(&mut ops);
        list.add(&ops, handle);
    }

    let mut backend = RecordingBackend::new();
    let stats = list.render(&ops, &mut backend);

    // Opaque near-to-far, then blended far-to-near.
    assert_eq!(backend.draws(), vec![4, 2, 3, 1]);
    assert_eq!(stats.translucency_changes, 1);
    assert_eq!(
        backend.count(|c| *c == SetTranslucency(Translucency::Normal)),
        1
    );
    assert_eq!(stats.blend_changes, 2);
}

#[test]
fn test_blend_and_cull_change_only_on_difference() {
    let mut ops = OperationPool::new();
    let mut list = Drawlist::with_capacity(8);
    let culls = [CullMode::Back, CullMode::Back, CullMode::Front];
    for (model, cull) in (1..).zip(culls) {
        let handle = TestOp {
            model,
            cull,
            ..Default::default()
        }
        .insert(&mut ops);
        list.add(&ops, handle);
    }

    let mut backend = RecordingBackend::new();
    let stats = list.render(&ops, &mut backend);

    assert_eq!(stats.cull_changes, 2);
    assert_eq!(stats.blend_changes, 1);
    assert_eq!(
        backend.count(|c| matches!(c, SetCull(_))),
        2
    );
    assert_eq!(backend.count(|c| *c == SetBlend(BlendMode::None)), 1);
}

#[test]
fn test_viewport_changes_follow_key() {
    let mut ops = OperationPool::new();
    let mut list = Drawlist::with_capacity(8);
    for viewport in [0u8, 2, 2] {
        let mut op = TestOp::default().build();
        op.set_layer(crate::render_state::Layer {
            viewport,
            ..Default::default()
        })
        .unwrap();
        crate::gen_render_key(&mut op);
        let handle = ops.insert(op);
        list.add(&ops, handle);
    }

    let mut backend = RecordingBackend::new();
    let stats = list.render(&ops, &mut backend);

    assert_eq!(stats.viewport_changes, 1);
    assert_eq!(backend.count(|c| *c == SetViewport(2, 0)), 1);
}
