// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Memoized prerequisites with cycle detection.
//!
//! A [`Dependency`] wraps a task so it is invoked at most once per distinct
//! argument value. [`Dependencies`] tracks which tasks must run before which,
//! and resolves them depth first on a shared stack. Revisiting a task that is
//! already on the stack is a [`DependencyError::Circular`] raised before any
//! member of the cycle runs.
//!
//! All registration and resolution happens inside one reentrant critical
//! section: nested resolves on the resolving thread re-enter it, while other
//! threads wait.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};
use serde_json::Value;

use crate::audit::Marker;
use crate::engine::Task;
use crate::errors::DependencyError;
use crate::observability::messages::engine::DependencyResolved;
use crate::observability::messages::StructuredLog;

/// A task whose results are remembered per argument value.
pub struct Dependency {
    task: Arc<Task>,
    results: Mutex<HashMap<String, Value>>,
}

impl Dependency {
    fn new(task: Arc<Task>) -> Self {
        Self {
            task,
            results: Mutex::new(HashMap::new()),
        }
    }

    pub fn marker(&self) -> &Marker {
        self.task.marker()
    }

    /// The unit's output for `args`, invoking the unit only the first time
    /// these arguments are seen.
    ///
    /// The results lock is held across the lookup, the invocation and the
    /// insert, so concurrent callers with the same arguments wait for the
    /// first one instead of running the unit again.
    pub fn call(&self, args: &Value) -> Result<Value, DependencyError> {
        let mut results = self.results.lock();
        let key = args.to_string();
        if let Some(result) = results.get(&key) {
            return Ok(result.clone());
        }
        let result = self
            .task
            .unit()
            .process(args.clone())
            .map_err(|error| DependencyError::Failed {
                unit: self.marker().clone(),
                error,
            })?;
        results.insert(key, result.clone());
        Ok(result)
    }

    /// The remembered result for `args`, if the unit has run with them.
    pub fn result(&self, args: &Value) -> Option<Value> {
        self.results.lock().get(&args.to_string()).cloned()
    }

    /// Number of distinct argument values the unit has run with.
    pub fn invocations(&self) -> usize {
        self.results.lock().len()
    }
}

#[derive(Default)]
struct ResolveState {
    stack: Vec<Marker>,
    registry: HashMap<Marker, Arc<Dependency>>,
    prerequisites: HashMap<Marker, Vec<(Marker, Value)>>,
}

#[derive(Default)]
pub struct Dependencies {
    state: ReentrantMutex<RefCell<ResolveState>>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a task as a dependency. Registering the same marker again
    /// returns the existing registration.
    pub fn register(&self, task: Arc<Task>) -> Arc<Dependency> {
        let guard = self.state.lock();
        let mut state = guard.borrow_mut();
        let dependency = state
            .registry
            .entry(task.marker().clone())
            .or_insert_with(|| Arc::new(Dependency::new(task)));
        Arc::clone(dependency)
    }

    pub fn get(&self, marker: &Marker) -> Option<Arc<Dependency>> {
        self.state.lock().borrow().registry.get(marker).cloned()
    }

    /// Declares that `dependent` needs `prerequisite` run with `args` first.
    pub fn depends_on(&self, dependent: &Marker, prerequisite: Arc<Task>, args: Value) {
        let marker = prerequisite.marker().clone();
        self.register(prerequisite);
        let guard = self.state.lock();
        guard
            .borrow_mut()
            .prerequisites
            .entry(dependent.clone())
            .or_default()
            .push((marker, args));
    }

    pub fn has_prerequisites(&self, marker: &Marker) -> bool {
        self.state
            .lock()
            .borrow()
            .prerequisites
            .get(marker)
            .map_or(false, |prerequisites| !prerequisites.is_empty())
    }

    /// Runs `f` with `marker` pushed on the resolution stack.
    pub fn resolve<T, F>(&self, marker: &Marker, f: F) -> Result<T, DependencyError>
    where
        F: FnOnce() -> Result<T, DependencyError>,
    {
        let guard = self.state.lock();
        {
            let mut state = guard.borrow_mut();
            if state.stack.contains(marker) {
                let mut stack = state.stack.clone();
                stack.push(marker.clone());
                return Err(DependencyError::Circular { stack });
            }
            state.stack.push(marker.clone());
        }
        let result = f();
        guard.borrow_mut().stack.pop();
        result
    }

    /// Resolves every prerequisite of `dependent`, depth first, returning
    /// their results in declaration order.
    pub fn require(&self, dependent: &Marker) -> Result<Vec<Value>, DependencyError> {
        let guard = self.state.lock();
        let prerequisites = guard
            .borrow()
            .prerequisites
            .get(dependent)
            .cloned()
            .unwrap_or_default();

        let results = self.resolve(dependent, || {
            prerequisites
                .iter()
                .map(|(marker, args)| {
                    let dependency = guard
                        .borrow()
                        .registry
                        .get(marker)
                        .cloned()
                        .ok_or_else(|| DependencyError::Unregistered(marker.clone()))?;
                    self.require(marker)?;
                    self.resolve(marker, || dependency.call(args))
                })
                .collect::<Result<Vec<_>, _>>()
        })?;

        DependencyResolved {
            unit: dependent,
            prerequisites: results.len(),
        }
        .log();
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{Counting, Stub};
    use crate::errors::UnitError;
    use crate::traits::Unit;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn task(label: &str) -> Arc<Task> {
        Arc::new(Task::new(label, Box::new(Stub::new(label))))
    }

    #[test]
    fn test_dependency_is_memoized_per_arguments() {
        let counting = Counting::new("setup");
        let calls = counting.calls();
        let dependencies = Dependencies::new();
        let dependency = dependencies.register(Arc::new(Task::new("setup", Box::new(counting))));

        assert_eq!(dependency.call(&json!(1)).unwrap(), json!(1));
        assert_eq!(dependency.call(&json!(1)).unwrap(), json!(1));
        assert_eq!(dependency.call(&json!([2])).unwrap(), json!([2]));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(dependency.invocations(), 2);
        assert_eq!(dependency.result(&json!(1)), Some(json!(1)));
    }

    #[test]
    fn test_concurrent_calls_with_same_arguments_run_once() {
        struct Slow {
            calls: Arc<AtomicUsize>,
        }

        impl Unit for Slow {
            fn name(&self) -> &str {
                "slow"
            }

            fn process(&self, input: Value) -> Result<Value, UnitError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(50));
                Ok(input)
            }
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let dependencies = Dependencies::new();
        let dependency = dependencies.register(Arc::new(Task::new(
            "slow",
            Box::new(Slow {
                calls: Arc::clone(&calls),
            }),
        )));

        let results: Vec<Value> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| dependency.call(&json!(1)).unwrap()))
                .collect();
            handles.into_iter().map(|handle| handle.join().unwrap()).collect()
        });

        assert_eq!(results, vec![json!(1); 4]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(dependency.invocations(), 1);
    }

    #[test]
    fn test_register_is_idempotent() {
        let dependencies = Dependencies::new();
        let first = dependencies.register(task("a"));
        let second = dependencies.register(task("a"));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_require_resolves_chain_depth_first() {
        let dependencies = Dependencies::new();
        dependencies.depends_on(&Marker::from("app"), task("db"), json!("db-args"));
        dependencies.depends_on(&Marker::from("db"), task("net"), json!("net-args"));

        let results = dependencies.require(&Marker::from("app")).unwrap();
        assert_eq!(results, vec![json!("db-args")]);

        let net = dependencies.get(&Marker::from("net")).unwrap();
        assert_eq!(net.invocations(), 1);
    }

    #[test]
    fn test_cycle_is_detected_before_any_member_runs() {
        struct TestCase {
            name: &'static str,
            cycle: Vec<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "self loop",
                cycle: vec!["a"],
            },
            TestCase {
                name: "pair",
                cycle: vec!["a", "b"],
            },
            TestCase {
                name: "triangle",
                cycle: vec!["a", "b", "c"],
            },
        ];

        for case in test_cases {
            let dependencies = Dependencies::new();
            let mut counters = Vec::new();
            for (position, label) in case.cycle.iter().enumerate() {
                let next = case.cycle[(position + 1) % case.cycle.len()];
                let counting = Counting::new(next);
                counters.push(counting.calls());
                dependencies.depends_on(
                    &Marker::from(*label),
                    Arc::new(Task::new(next, Box::new(counting))),
                    json!(null),
                );
            }

            match dependencies.require(&Marker::from(case.cycle[0])) {
                Err(DependencyError::Circular { stack }) => {
                    assert_eq!(stack.len(), case.cycle.len() + 1, "case: {}", case.name);
                    assert_eq!(stack.first(), stack.last(), "case: {}", case.name);
                }
                other => panic!("case {}: unexpected {:?}", case.name, other),
            }
            for calls in counters {
                assert_eq!(calls.load(Ordering::SeqCst), 0, "case: {}", case.name);
            }
        }
    }

    #[test]
    fn test_resolve_pops_after_failure() {
        let dependencies = Dependencies::new();
        let marker = Marker::from("x");
        let failed: Result<(), _> = dependencies.resolve(&marker, || Err(DependencyError::Unregistered(Marker::from("y"))));
        assert!(failed.is_err());

        assert!(dependencies.resolve(&marker, || Ok(())).is_ok());
    }
}
