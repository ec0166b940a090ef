//! Property tests for row collections and step gates.
//!
//! Replays arbitrary operation sequences and checks that the derived state
//! never drifts from what a fresh scan of the final rows would give.

use dfm_form::{FormError, RowCollection, RowSchema, StepGate};
use proptest::prelude::*;

const FIELDS: [&str; 3] = ["name", "category", "process1"];

#[derive(Debug, Clone)]
enum Op {
    Add,
    Delete(usize),
    Update(usize, usize, String),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Add),
        (0usize..8).prop_map(Op::Delete),
        (0usize..8, 0usize..FIELDS.len(), prop_oneof![
            Just(String::new()),
            Just("x".to_string()),
            Just(" y ".to_string()),
            Just("Casting".to_string()),
            "[a-z ]{0,4}",
        ])
            .prop_map(|(row, field, value)| Op::Update(row, field, value)),
    ]
}

fn scan_complete(rows: &RowCollection) -> usize {
    rows.rows()
        .iter()
        .filter(|r| {
            r.values()
                .values()
                .all(|v| v.trim().chars().count() >= 2)
        })
        .count()
}

proptest! {
    #[test]
    fn complete_count_never_drifts(ops in prop::collection::vec(op(), 0..60)) {
        let schema = RowSchema::new("sub-assembly", FIELDS);
        let mut rows = RowCollection::with_rows(schema, 2);

        for op in ops {
            match op {
                Op::Add => {
                    rows.add_row();
                }
                Op::Delete(n) => {
                    if let Some(id) = rows.id_at(n + 1) {
                        let before = rows.clone();
                        match rows.delete_row(id) {
                            Ok(()) => {}
                            Err(FormError::LastCompleteRow { .. }) => {
                                prop_assert_eq!(&rows, &before);
                            }
                            Err(other) => prop_assert!(false, "unexpected error {other}"),
                        }
                    }
                }
                Op::Update(n, field, value) => {
                    if let Some(id) = rows.id_at(n + 1) {
                        rows.update_field(id, FIELDS[field], value).unwrap();
                    }
                }
            }
            prop_assert_eq!(rows.complete_count(), scan_complete(&rows));
            prop_assert_eq!(rows.can_submit(), rows.complete_count() > 0);
        }

        let numbers: Vec<usize> = rows.render().iter().map(|r| r.number).collect();
        let expected: Vec<usize> = (1..=rows.len()).collect();
        prop_assert_eq!(numbers, expected);
    }

    #[test]
    fn gate_never_completes_a_step_out_of_order(
        picks in prop::collection::vec((1usize..6, "[a-z]{0,3}"), 0..30)
    ) {
        let mut gate = StepGate::new(["a", "b", "c", "d", "e"]);
        for (index, value) in picks {
            let _ = gate.select_step(index, &value);

            let steps = gate.steps();
            for k in 1..steps.len() {
                if steps[k].completed {
                    prop_assert!(steps[k - 1].completed);
                }
                if steps[k].enabled {
                    prop_assert!(steps[k - 1].completed);
                }
            }
            let completed = steps.iter().filter(|s| s.completed).count();
            prop_assert_eq!(completed, gate.current_step());
        }
    }
}

#[test]
fn gate_example_three_steps() {
    let mut gate = StepGate::new(["dfmType", "division", "businessDivision"]);
    assert!(gate.select_step(2, "x").is_err());
    assert_eq!(gate.current_step(), 0);
    assert!(!gate.step(2).unwrap().enabled);

    gate.select_step(1, "y").unwrap();
    gate.select_step(2, "x").unwrap();
    assert_eq!(gate.current_step(), 2);
}
