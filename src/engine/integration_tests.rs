// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::Ordering;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::audit::{Audit, Source, SourceKey};
use crate::backends::local::LocalUnitFactory;
use crate::backends::stub::{Counting, Failing, Stub};
use crate::engine::{App, Batch, Combinator, Join, Task};
use crate::engine::joins::SyncMerge;
use crate::errors::{BuildError, ExecutionError, UnitError};
use crate::schema::{JoinFlags, JoinId, Schema};
use crate::traits::{Scheduler, Unit, UnitBatch};

/// Emits a fixed value whatever its input.
struct Constant(Value);

impl Unit for Constant {
    fn name(&self) -> &str {
        "const"
    }

    fn process(&self, _input: Value) -> Result<Value, UnitError> {
        Ok(self.0.clone())
    }
}

/// `const <json>` builds a [`Constant`], `fail` a failing unit, and
/// anything else a pass-through stub named after its first argument.
fn test_factory(argv: &[String]) -> Result<UnitBatch, BuildError> {
    let unit: Box<dyn Unit> = match argv[0].as_str() {
        "const" => {
            let value = argv.get(1).and_then(|raw| serde_json::from_str(raw).ok()).unwrap_or(Value::Null);
            let unit: Box<dyn Unit> = Box::new(Constant(value));
            return Ok((vec![unit], Vec::new()));
        }
        "fail" => Box::new(Failing::new("fail")),
        name => Box::new(Stub::new(name)),
    };
    Ok((vec![unit], argv[1..].to_vec()))
}

fn build_with_stubs(workflow: &str) -> App {
    let app = App::new();
    Schema::parse(workflow)
        .unwrap()
        .compacted()
        .build(&mut test_factory, &app)
        .unwrap();
    app
}

fn build_local(workflow: &str) -> App {
    let app = App::new();
    Schema::parse(workflow)
        .unwrap()
        .compacted()
        .build(&mut LocalUnitFactory::new(), &app)
        .unwrap();
    app
}

fn values(app: &App, key: &str) -> Vec<Value> {
    app.aggregator()
        .retrieve(&SourceKey::from(key))
        .iter()
        .filter_map(|audit| audit.current_value().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_batch(label: &str, size: usize) -> (Arc<Batch>, Vec<Arc<std::sync::atomic::AtomicUsize>>) {
        let mut counters = Vec::new();
        let tasks = (0..size)
            .map(|member| {
                let unit = Counting::new(label);
                counters.push(unit.calls());
                Arc::new(Task::new(format!("{}/{}", label, member), Box::new(unit)))
            })
            .collect();
        (Arc::new(Batch::new(tasks)), counters)
    }

    #[test]
    fn test_sync_merge_of_duplicated_batches_under_threads() {
        assert_eq!(Combinator::from_sets(vec![vec![0, 1], vec![0, 1]]).len(), 4);

        for _ in 0..25 {
            let (left, _) = counting_batch("left", 2);
            let (right, _) = counting_batch("right", 2);
            let (target, target_calls) = counting_batch("target", 1);

            SyncMerge::new(JoinId(0), JoinFlags::default())
                .join(&[Arc::clone(&left), Arc::clone(&right)], &[target])
                .unwrap();

            let app = Arc::new(App::new());
            let sources: Vec<Arc<Task>> = left.tasks().iter().chain(right.tasks()).cloned().collect();
            std::thread::scope(|scope| {
                for (position, task) in sources.iter().enumerate() {
                    let app = Arc::clone(&app);
                    scope.spawn(move || {
                        app.execute(task, Audit::new(json!(position), Source::Nil)).unwrap();
                    });
                }
            });

            assert_eq!(target_calls[0].load(Ordering::SeqCst), 4);
            let merged = app.aggregator().retrieve(&SourceKey::from("target/0"));
            assert_eq!(merged.len(), 4);
            for audit in merged {
                let inputs = audit.values()[audit.len() - 2].as_array().cloned().unwrap();
                assert_eq!(inputs.len(), 2);
                assert!(inputs[0].as_u64().unwrap() < 2, "left value first");
                assert!(inputs[1].as_u64().unwrap() >= 2, "right value second");
            }
        }
    }

    #[test]
    fn test_sync_merge_rejects_second_value_for_unconsumed_slot() {
        let (left, _) = counting_batch("left", 1);
        let (right, _) = counting_batch("right", 1);
        let (target, _) = counting_batch("target", 1);
        SyncMerge::new(JoinId(0), JoinFlags::default())
            .join(&[Arc::clone(&left), right], &[target])
            .unwrap();

        let app = App::new();
        let task = &left.tasks()[0];
        app.execute(task, Audit::new(1, Source::Nil)).unwrap();
        match app.execute(task, Audit::new(2, Source::Nil)) {
            Err(ExecutionError::SyncCollision { target, slot, .. }) => {
                assert_eq!(target, "target/0");
                assert_eq!(slot, 0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_fork_delivers_independent_copies() {
        let app = build_local("echo hello --[] upcase -- reverse --0[1,2]");
        app.run().unwrap();

        assert_eq!(values(&app, "1:upcase"), vec![json!("HELLO")]);
        assert_eq!(values(&app, "2:reverse"), vec![json!("olleh")]);
        let reversed = app.aggregator().retrieve(&SourceKey::from("2:reverse"));
        assert_eq!(reversed[0].len(), 3);
    }

    #[test]
    fn test_merge_forwards_each_value_unsynchronized() {
        let app = build_stubs_and_run("a 1 -- b 2 --2{0,1} c");
        let results = values(&app, "2:c");
        assert_eq!(results.len(), 2);
        assert!(results.contains(&json!(["1"])));
        assert!(results.contains(&json!(["2"])));
    }

    fn build_stubs_and_run(workflow: &str) -> App {
        let app = build_with_stubs(workflow);
        app.run().unwrap();
        app
    }

    #[test]
    fn test_switch_routes_by_integer_value() {
        struct TestCase {
            name: &'static str,
            value: &'static str,
            expected: Option<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "first target",
                value: "0",
                expected: Some("1:left"),
            },
            TestCase {
                name: "second target",
                value: "1",
                expected: Some("2:right"),
            },
            TestCase {
                name: "non-integer goes to the aggregator",
                value: "\"x\"",
                expected: None,
            },
        ];

        for case in test_cases {
            let workflow = format!("const '{}' --<1,2> left -- right", case.value);
            let app = build_stubs_and_run(&workflow);
            let keys = app.aggregator().keys();
            match case.expected {
                Some(key) => assert_eq!(keys, vec![SourceKey::from(key)], "case: {}", case.name),
                None => assert_eq!(keys, vec![SourceKey::from("0:const")], "case: {}", case.name),
            }
        }
    }

    #[test]
    fn test_switch_out_of_range_is_fatal() {
        let app = build_with_stubs("const 7 --<1,2> left -- right");
        match app.run() {
            Err(ExecutionError::SwitchOutOfRange { index, targets, .. }) => {
                assert_eq!(index, 7);
                assert_eq!(targets, 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_iterate_and_stack_flags() {
        struct TestCase {
            name: &'static str,
            workflow: &'static str,
            expected: Vec<Value>,
        }

        let test_cases = vec![
            TestCase {
                name: "plain sequence delivers the whole array",
                workflow: "echo a b --: upcase",
                expected: vec![json!("A B")],
            },
            TestCase {
                name: "iterate delivers each element",
                workflow: "echo a b --:i upcase",
                expected: vec![json!("A"), json!("B")],
            },
            TestCase {
                name: "iterate and stack queue each element",
                workflow: "echo a b --:is upcase",
                expected: vec![json!("A"), json!("B")],
            },
        ];

        for case in test_cases {
            let app = build_local(case.workflow);
            app.run().unwrap();
            assert_eq!(values(&app, "1:upcase"), case.expected, "case: {}", case.name);
        }
    }

    #[test]
    fn test_iterating_a_scalar_fails() {
        let app = build_with_stubs("const 3 --:i a");
        assert!(matches!(app.run(), Err(ExecutionError::Audit(_))));
    }

    #[test]
    fn test_unbatched_join_uses_first_member_only() {
        let app = build_local("echo x --batch 2 --:u upcase");
        app.run().unwrap();

        assert_eq!(values(&app, "1:upcase"), vec![json!("X")]);
        assert_eq!(values(&app, "0:echo/1"), vec![json!(["x"])]);
        assert!(values(&app, "0:echo/0").is_empty());

        let batched = build_local("echo x --batch 2 --: upcase");
        batched.run().unwrap();
        assert_eq!(values(&batched, "1:upcase").len(), 2);
    }

    #[test]
    fn test_rounds_run_in_order() {
        let app = build_with_stubs("a --+ b --++ c");
        assert_eq!(app.pending_rounds(), vec![0, 1, 2]);

        let summary = app.run().unwrap();
        assert_eq!(summary.rounds, 3);
        assert_eq!(summary.executed, 3);
        assert_eq!(summary.aggregated, 3);
        assert!(app.pending_rounds().is_empty());
    }

    #[test]
    fn test_failure_stops_sequential_run() {
        let app = build_with_stubs("fail --+ b");
        match app.run() {
            Err(ExecutionError::UnitFailed { unit, .. }) => assert_eq!(unit.as_str(), "0:fail"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(app.pending_rounds(), vec![1]);
        assert!(app.aggregator().is_empty());
    }

    #[test]
    fn test_prerequisites_run_once_before_dependents() {
        let app = build_local("echo a b c --:i upcase");
        let setup = Counting::new("setup");
        let calls = setup.calls();
        app.depends_on(
            &"1:upcase".into(),
            Arc::new(Task::new("setup", Box::new(setup))),
            json!("init"),
        );

        app.run().unwrap();
        assert_eq!(values(&app, "1:upcase").len(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            app.dependencies().get(&"setup".into()).unwrap().result(&json!("init")),
            Some(json!("init"))
        );
    }

    #[tokio::test]
    async fn test_run_concurrent_matches_sequential() {
        let workflow = "echo one two three four --:i reverse --+ split alpha beta --:i upcase";

        let sequential = build_local(workflow);
        let expected = sequential.run().unwrap();

        let concurrent = Arc::new(build_local(workflow));
        let summary = Arc::clone(&concurrent).run_concurrent().await.unwrap();

        assert_eq!(summary.executed, expected.executed);
        assert_eq!(summary.rounds, 2);
        assert_eq!(summary.aggregated, 6);

        let mut reversed = values(&concurrent, "1:reverse");
        reversed.sort_by_key(|value| value.to_string());
        assert_eq!(reversed, vec![json!("eerht"), json!("eno"), json!("owt"), json!("ruof")]);
        assert_eq!(values(&concurrent, "3:upcase").len(), 2);
    }

    #[tokio::test]
    async fn test_run_concurrent_cancels_on_failure() {
        let app = Arc::new(App::with_max_concurrency(3));
        Schema::parse("a x y z --:i fail --+ b")
            .unwrap()
            .build(&mut test_factory, app.as_ref())
            .unwrap();

        match Arc::clone(&app).run_concurrent().await {
            Err(ExecutionError::UnitFailed { unit, .. }) => assert_eq!(unit.as_str(), "1:fail"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(app.pending_rounds(), vec![1]);
    }
}
