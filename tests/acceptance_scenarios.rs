//! Acceptance scenarios for the diff reducer and layout, driven through the
//! public [`Session`] API with wire-format JSON.

use chainviz::layout::{LayoutParams, Point, SlotOrder, Viewport};
use chainviz::model::{AttestationPtr, BlockPtr, Slot, ValidatorIndex};
use chainviz::parser::parse_diff;
use chainviz::render::{NodeKey, RenderSurface};
use chainviz::session::Session;
use chainviz::world::ApplyOutcome;

fn session() -> Session {
    Session::new(LayoutParams::default(), Viewport::new(120.0, 40.0))
}

fn apply(session: &mut Session, line: usize, json: &str) -> ApplyOutcome {
    let diff = parse_diff(json, line).expect("scenario JSON must decode");
    session.update_world(&diff)
}

#[test]
fn single_block_sits_one_slot_from_the_origin() {
    let mut session = session();
    let outcome = apply(
        &mut session,
        1,
        r#"{"diffIndex":0,
            "head":[{"headBlock":1,"slot":1,"validatorCounts":{"total":0}}],
            "blocks":[{"selfPtr":1,"htr":"0x01","slot":1,"parent":0}]}"#,
    );
    assert_eq!(outcome, ApplyOutcome::Ok);

    let layout = session.layout();
    assert_eq!(
        layout.block_order(BlockPtr::new(1)),
        Some(SlotOrder {
            slot: Slot::new(1),
            order: 0
        })
    );
    assert_eq!(
        layout.block_position(BlockPtr::new(1)),
        Some(Point::new(LayoutParams::default().slot_width, 0.0))
    );
    assert!(session
        .scene()
        .has_node(NodeKey::Block(BlockPtr::new(1))));
}

#[test]
fn child_delivered_before_parent() {
    let mut session = session();
    apply(
        &mut session,
        1,
        r#"{"diffIndex":0,
            "head":[{"headBlock":2,"slot":2,"validatorCounts":{"total":0}}],
            "blocks":[{"selfPtr":2,"htr":"0x02","slot":2,"parent":1},
                      {"selfPtr":1,"htr":"0x01","slot":1,"parent":0}]}"#,
    );

    let world = session.world();
    assert_eq!(world.tree().children(BlockPtr::new(1)), &[BlockPtr::new(2)]);

    let layout = session.layout();
    assert_eq!(
        layout.block_order(BlockPtr::new(2)),
        Some(SlotOrder {
            slot: Slot::new(2),
            order: 0
        })
    );
    assert!(layout.block_order(BlockPtr::new(1)).is_some());
}

#[test]
fn vote_for_missing_attestation_is_dropped_for_good() {
    let mut session = session();
    apply(
        &mut session,
        1,
        r#"{"diffIndex":0,
            "head":[{"headBlock":1,"slot":1,"validatorCounts":{"total":4}}],
            "blocks":[{"selfPtr":1,"htr":"0x01","slot":1,"parent":0}],
            "latestVotes":[{"validatorIndex":0,"attestationPtr":99}]}"#,
    );
    let validator = session.validator(ValidatorIndex::new(0)).unwrap();
    assert!(validator.votes().is_empty());

    apply(
        &mut session,
        2,
        r#"{"diffIndex":1,
            "attestations":[{"selfPtr":99,"slot":1,"commIndex":0,"head":1,"target":1,"source":1}]}"#,
    );
    assert!(session.attestation(AttestationPtr::new(99)).is_some());
    let validator = session.validator(ValidatorIndex::new(0)).unwrap();
    assert!(
        validator.votes().is_empty(),
        "dropped vote must not be re-attached"
    );
}

#[test]
fn growing_validator_set_keeps_existing_positions() {
    let mut session = session();
    apply(
        &mut session,
        1,
        r#"{"diffIndex":0,
            "head":[{"headBlock":1,"slot":1,"validatorCounts":{"total":10}}],
            "blocks":[{"selfPtr":1,"htr":"0x01","slot":1,"parent":0}]}"#,
    );
    let before: Vec<_> = (0..25)
        .map(|i| session.layout().validator_position(ValidatorIndex::new(i)))
        .collect();
    assert!(before[..10].iter().all(Option::is_some));
    assert!(before[10..].iter().all(Option::is_none));

    apply(
        &mut session,
        2,
        r#"{"diffIndex":1,
            "head":[{"headBlock":1,"slot":1,"validatorCounts":{"total":25}}]}"#,
    );
    assert_eq!(session.world().validators().len(), 25);
    for i in 0..25u64 {
        let after = session.layout().validator_position(ValidatorIndex::new(i));
        assert!(after.is_some(), "validator {i} should be positioned");
        if i < 10 {
            assert_eq!(after, before[i as usize], "validator {i} moved");
        }
    }
}

#[test]
fn out_of_order_diffs_are_classified() {
    let mut session = session();
    let first = r#"{"diffIndex":0,"blocks":[{"selfPtr":1,"htr":"0x01","slot":1,"parent":0}]}"#;
    assert_eq!(apply(&mut session, 1, first), ApplyOutcome::Ok);
    assert_eq!(session.world().next_diff_index(), 1);
    assert_eq!(apply(&mut session, 2, first), ApplyOutcome::TooOld);

    let gap = r#"{"diffIndex":3,"blocks":[{"selfPtr":9,"htr":"0x09","slot":9,"parent":1}]}"#;
    assert_eq!(apply(&mut session, 3, gap), ApplyOutcome::TooNew);
    assert!(session.desynced());
    assert_eq!(session.world().block_count(), 1);
}

#[test]
fn clicking_a_block_reports_it_to_the_observer() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut session = session();
    apply(
        &mut session,
        1,
        r#"{"diffIndex":0,
            "head":[{"headBlock":1,"slot":1,"validatorCounts":{"total":0}}],
            "blocks":[{"selfPtr":1,"htr":"0x01","slot":1,"parent":0}]}"#,
    );

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    session.on_node_clicked(move |key| sink.borrow_mut().push(key));

    let key = NodeKey::Block(BlockPtr::new(1));
    let at = session.scene().node_position(key).unwrap();
    assert_eq!(session.node_clicked(at), Some(key));
    assert_eq!(session.node_clicked(Point::new(-500.0, -500.0)), None);
    assert_eq!(*seen.borrow(), vec![key]);
}
