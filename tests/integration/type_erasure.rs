//! Context type checks at the erasure boundary

use super::test_utils::*;
use std::cell::Cell;
use std::rc::Rc;
use trellis::action::{AppendChild, ChildList, Standalone};
use trellis::composer::Composer;
use trellis::error::RoutingError;
use trellis::factory::{AnyFactory, Factory, FactoryBox};
use trellis::postponed::PostponedIntegrationFactory;
use trellis::AnyContext;

#[derive(Debug)]
struct CounterFactory {
    calls: Rc<Cell<usize>>,
}

impl Factory for CounterFactory {
    type Context = i64;
    type Unit = i64;

    fn prepare(&mut self, _context: &i64) -> Result<(), RoutingError> {
        self.calls.set(self.calls.get() + 1);
        Ok(())
    }

    fn build(&self, context: &i64) -> Result<i64, RoutingError> {
        self.calls.set(self.calls.get() + 1);
        Ok(*context)
    }
}

#[test]
fn test_integer_factory_rejects_string_context() {
    let calls = Rc::new(Cell::new(0));
    let mut factory = FactoryBox::boxed(
        CounterFactory {
            calls: calls.clone(),
        },
        Standalone,
    );

    let err = factory.prepare(&AnyContext::new("42")).unwrap_err();
    match &err {
        RoutingError::ContextTypeMismatch {
            factory,
            expected,
            context,
            ..
        } => {
            assert!(factory.starts_with("CounterFactory"));
            assert_eq!(*expected, "i64");
            assert_eq!(context, "\"42\"");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("CounterFactory"));

    assert!(matches!(
        factory.build(&AnyContext::new(String::from("42"))),
        Err(RoutingError::ContextTypeMismatch { .. })
    ));
    assert_eq!(calls.get(), 0, "factory must never be invoked on mismatch");
}

#[test]
fn test_matching_context_reaches_factory() {
    let calls = Rc::new(Cell::new(0));
    let mut factory = FactoryBox::boxed(
        CounterFactory {
            calls: calls.clone(),
        },
        Standalone,
    );
    let ctx = AnyContext::new(42i64);
    factory.prepare(&ctx).unwrap();
    let unit = factory.build(&ctx).unwrap();
    assert_eq!(unit.downcast_ref::<i64>(), Some(&42));
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_box_prepare_is_not_idempotent() {
    let calls = Rc::new(Cell::new(0));
    let mut factory = FactoryBox::boxed(
        CounterFactory {
            calls: calls.clone(),
        },
        Standalone,
    );
    let ctx = AnyContext::new(1i64);
    factory.prepare(&ctx).unwrap();
    factory.prepare(&ctx).unwrap();
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_heterogeneous_factories_share_one_pipeline() {
    let log = new_log();
    let mut wrappers = vec![
        PostponedIntegrationFactory::new(leaf("home", &log, Standalone)),
        PostponedIntegrationFactory::new(FactoryBox::boxed(
            CounterFactory {
                calls: Rc::new(Cell::new(0)),
            },
            AppendChild,
        )),
    ];

    let mut units = ChildList::new();
    wrappers[0].build(&session("ada"), &mut units).unwrap();
    wrappers[1].build(&AnyContext::new(7i64), &mut units).unwrap();

    assert_eq!(units.downcast_ref::<Screen>(0).unwrap().user, "ada");
    assert_eq!(units.downcast_ref::<i64>(1), Some(&7));
}

#[test]
fn test_late_mismatch_fails_before_anything_is_built() {
    let log = new_log();
    let composition = Composer::default()
        .compose(vec![
            leaf("home", &log, Standalone),
            FactoryBox::boxed(
                CounterFactory {
                    calls: Rc::new(Cell::new(0)),
                },
                Standalone,
            ),
        ])
        .unwrap();

    let err = composition.run(&session("ada")).unwrap_err();
    assert!(matches!(err, RoutingError::ContextTypeMismatch { .. }));
    assert_eq!(entries(&log), vec!["prepare home"]);
}
