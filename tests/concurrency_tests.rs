//! Concurrent first access to pending slots.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, mpsc};
use std::thread;
use std::time::Duration;

use cluegen::generators::{dunders, repr};
use cluegen::{Args, Class, GenContext, GenerateError, Generator, LookupError, MethodKind, capabilities};

const THREADS: usize = 16;

fn counting_repr(counter: Arc<AtomicUsize>) -> Generator {
    Generator::new(dunders::REPR, move |cx: &GenContext<'_>| {
        counter.fetch_add(1, Ordering::SeqCst);
        // Widen the race window.
        thread::yield_now();
        repr::generate(cx)
    })
    .expecting(MethodKind::Render)
}

#[test]
fn racing_first_accesses_install_one_method() {
    let generated = Arc::new(AtomicUsize::new(0));
    let class = Class::builder("Contended")
        .base(capabilities::init())
        .generator(counting_repr(generated.clone()))
        .field("x", "int")
        .build()
        .unwrap();
    let barrier = Barrier::new(THREADS);

    let methods: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    class.method(dunders::REPR).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(generated.load(Ordering::SeqCst), 1);
    assert!(methods.iter().all(|m| Arc::ptr_eq(m, &methods[0])));
    assert_eq!(class.is_pending(dunders::REPR), Some(false));
}

#[test]
fn racing_subclasses_each_generate_their_own() {
    let generated = Arc::new(AtomicUsize::new(0));
    let base = Class::builder("Base")
        .base(capabilities::init())
        .generator(counting_repr(generated.clone()))
        .field("x", "int")
        .build()
        .unwrap();
    let children: Vec<_> = (0..4)
        .map(|i| {
            Class::builder(format!("Child{i}"))
                .base(base.clone())
                .field("y", "int")
                .build()
                .unwrap()
        })
        .collect();
    let barrier = Barrier::new(THREADS);

    let rendered: Vec<String> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let child = &children[t % children.len()];
                let barrier = &barrier;
                s.spawn(move || {
                    let instance = child.instantiate(Args::positional([1, 2])).unwrap();
                    barrier.wait();
                    instance.repr().unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(generated.load(Ordering::SeqCst), children.len());
    for (t, text) in rendered.iter().enumerate() {
        assert_eq!(text, &format!("Child{}(x=1, y=2)", t % children.len()));
    }
    assert_eq!(base.is_pending(dunders::REPR), Some(true));
}

#[test]
fn concurrent_failures_leave_the_slot_retryable() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let seen = attempts.clone();
    let failing = Generator::new(dunders::REPR, move |_cx: &GenContext<'_>| {
        seen.fetch_add(1, Ordering::SeqCst);
        Err(GenerateError::failed("unavailable"))
    });
    let class = Class::builder("Failing").generator(failing).build().unwrap();
    let barrier = Barrier::new(THREADS);

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                barrier.wait();
                assert!(class.method(dunders::REPR).is_err());
            });
        }
    });

    // Every caller observed a failure, and none of them saw an installed method.
    assert!(attempts.load(Ordering::SeqCst) >= 1);
    assert_eq!(class.is_pending(dunders::REPR), Some(true));
}

#[test]
fn self_lookup_on_a_worker_thread_returns_instead_of_blocking() {
    let self_referential = Generator::new(dunders::REPR, |cx: &GenContext<'_>| {
        match cx.class().method(dunders::REPR) {
            Err(LookupError::RecursiveGeneration { .. }) => repr::generate(cx),
            other => Err(GenerateError::failed(format!("unexpected inner lookup: {:?}", other.map(|_| ())))),
        }
    })
    .expecting(MethodKind::Render);
    let class = Class::builder("Worker")
        .base(capabilities::init())
        .generator(self_referential)
        .field("x", "int")
        .build()
        .unwrap();

    let (tx, rx) = mpsc::channel();
    let worker = class.clone();
    thread::spawn(move || {
        let rendered = worker
            .instantiate(Args::positional([7]))
            .and_then(|w| w.repr())
            .map_err(|err| err.to_string());
        let _ = tx.send(rendered);
    });

    let rendered = rx.recv_timeout(Duration::from_secs(5)).expect("resolution must not block");
    assert_eq!(rendered.unwrap(), "Worker(x=7)");
}
