//! The three walkthroughs: value keys, identity keys and shared outputs

use std::cell::Cell;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use anyhow::{ensure, Context, Result};
use memocache::{ByAddress, Memoizer, TracingObserver};
use tracing::info;

use crate::report::{Recorder, Reporter};

type DemoObserver = (Recorder, TracingObserver);

fn observer() -> DemoObserver {
    (Recorder::default(), TracingObserver::new())
}

fn run_step<K, V, F>(
    memo: &mut Memoizer<K, V, F, DemoObserver>,
    reporter: &mut Reporter,
    input: K,
) -> Result<V>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone + Debug,
    F: FnMut(K) -> V,
{
    let output = memo.call(input.clone());
    let events = memo.observer_mut().0.take();
    reporter.step(&input, &output, &events)?;
    Ok(output)
}

/// `f(x) = 2x` keyed by value
pub fn doubling(reporter: &mut Reporter, capacity: Option<i64>) -> Result<()> {
    let capacity = capacity.unwrap_or(2);
    info!(capacity, "Running doubling scenario");
    reporter.begin("doubling", "doubling: f(x) = 2x, keyed by value");

    let mut memo = Memoizer::with_observer(|x: i64| x * 2, capacity, observer());

    let x = 4;
    let mut outputs = Vec::new();
    for input in [x, x, 2 * x, 3 * x, x, 3 * x] {
        outputs.push(run_step(&mut memo, reporter, input)?);
    }
    ensure!(
        outputs == [8, 8, 16, 24, 8, 24],
        "unexpected outputs {:?}",
        outputs
    );

    let contents: Vec<_> = memo.entries().map(|(k, v)| (*k, *v)).collect();
    reporter.note(&format!("final cache: {:?}", contents));
    if capacity == 2 {
        ensure!(
            contents == [(12, 24), (4, 8)],
            "unexpected cache contents {:?}",
            contents
        );
    }
    Ok(())
}

/// Character code keyed by the address of the cell holding it
pub fn identity(reporter: &mut Reporter, capacity: Option<i64>) -> Result<()> {
    let capacity = capacity.unwrap_or(1);
    info!(capacity, "Running identity scenario");
    reporter.begin("identity", "identity: char code, keyed by address");

    let mut memo = Memoizer::with_observer(
        |c: ByAddress<Cell<char>>| c.get() as u32,
        capacity,
        observer(),
    );

    let c = ByAddress::new(Cell::new('c'));
    let first = run_step(&mut memo, reporter, c.clone())?;
    ensure!(first == 'c' as u32, "expected code of 'c', got {}", first);

    c.set('d');
    reporter.note("changed the character behind the same address to 'd'");

    let second = run_step(&mut memo, reporter, c.clone())?;
    if memo.is_enabled() {
        ensure!(
            second == first,
            "expected stale cached result {}, got {}",
            first,
            second
        );
        reporter.note("same address, so the stale result for 'c' was returned");
    } else {
        ensure!(second == 'd' as u32, "expected code of 'd', got {}", second);
    }
    Ok(())
}

/// Handle to the first element of a vector; writes through it reach the vector
pub fn shared_output(reporter: &mut Reporter, capacity: Option<i64>) -> Result<()> {
    let capacity = capacity.unwrap_or(2);
    info!(capacity, "Running shared-output scenario");
    reporter.begin("shared-output", "shared-output: handle to first element");

    let mut memo = Memoizer::with_observer(
        |v: ByAddress<Vec<Rc<Cell<i32>>>>| v.first().cloned(),
        capacity,
        observer(),
    );

    let v = ByAddress::new(vec![Rc::new(Cell::new(4))]);
    let item = run_step(&mut memo, reporter, v.clone())?
        .context("vector has no first element")?;
    ensure!(item.get() == 4, "expected 4, got {}", item.get());

    item.set(100);
    reporter.note("wrote 100 through the returned handle");
    ensure!(
        v[0].get() == 100,
        "write did not reach the vector, found {}",
        v[0].get()
    );

    let again = run_step(&mut memo, reporter, v.clone())?
        .context("vector has no first element")?;
    ensure!(
        Rc::ptr_eq(&again, &item) && again.get() == 100,
        "expected the same handle holding 100, got {}",
        again.get()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenarios_with_defaults() {
        let mut reporter = Reporter::new(true);
        doubling(&mut reporter, None).unwrap();
        identity(&mut reporter, None).unwrap();
        shared_output(&mut reporter, None).unwrap();
    }

    #[test]
    fn test_scenarios_with_caching_disabled() {
        let mut reporter = Reporter::new(true);
        doubling(&mut reporter, Some(0)).unwrap();
        identity(&mut reporter, Some(-1)).unwrap();
        shared_output(&mut reporter, Some(0)).unwrap();
    }

    #[test]
    fn test_larger_capacity() {
        let mut reporter = Reporter::new(true);
        doubling(&mut reporter, Some(8)).unwrap();
        identity(&mut reporter, Some(3)).unwrap();
    }
}
