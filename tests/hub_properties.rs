// tests/hub_properties.rs
//
// Model-based checks of the notification hub under arbitrary interleavings
// of register / unregister / broadcast / drain.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use tokio::sync::mpsc::error::TryRecvError;

use nginx_config_viewer::hub::{Hub, Subscription, SubscriberId, RELOAD};

const CAPACITY: usize = 3;

#[derive(Debug, Clone)]
enum Op {
    Register,
    Unregister(usize),
    Broadcast,
    Drain(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Register),
        1 => any::<usize>().prop_map(Op::Unregister),
        3 => Just(Op::Broadcast),
        2 => any::<usize>().prop_map(Op::Drain),
    ]
}

/// A subscription plus how many signals the model says are queued for it.
struct Tracked {
    sub: Subscription,
    queued: usize,
    live: bool,
}

fn pick(subs: &BTreeMap<SubscriberId, Tracked>, idx: usize) -> Option<SubscriberId> {
    if subs.is_empty() {
        return None;
    }
    subs.keys().nth(idx % subs.len()).copied()
}

proptest! {
    #[test]
    fn broadcast_reaches_every_live_subscriber_with_room(
        ops in proptest::collection::vec(op_strategy(), 1..80)
    ) {
        let hub = Hub::with_inbox_capacity(CAPACITY);
        let mut subs: BTreeMap<SubscriberId, Tracked> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Register => {
                    let sub = hub.register();
                    subs.insert(sub.id(), Tracked { sub, queued: 0, live: true });
                }
                Op::Unregister(idx) => {
                    if let Some(id) = pick(&subs, idx) {
                        let t = subs.get_mut(&id).unwrap();
                        prop_assert_eq!(hub.unregister(id), t.live);
                        // Second call is always a harmless no-op.
                        prop_assert!(!hub.unregister(id));
                        t.live = false;
                    }
                }
                Op::Broadcast => {
                    let expected = subs
                        .values()
                        .filter(|t| t.live && t.queued < CAPACITY)
                        .count();
                    prop_assert_eq!(hub.broadcast(RELOAD), expected);
                    for t in subs.values_mut().filter(|t| t.live && t.queued < CAPACITY) {
                        t.queued += 1;
                    }
                }
                Op::Drain(idx) => {
                    if let Some(id) = pick(&subs, idx) {
                        let t = subs.get_mut(&id).unwrap();
                        for _ in 0..t.queued {
                            let signal = t.sub.try_recv();
                            prop_assert!(matches!(signal, Ok(ref s) if &**s == RELOAD));
                        }
                        t.queued = 0;
                        let rest = t.sub.try_recv();
                        if t.live {
                            prop_assert!(matches!(rest, Err(TryRecvError::Empty)));
                        } else {
                            // Nothing broadcast after unregistering ever arrives.
                            prop_assert!(matches!(rest, Err(TryRecvError::Disconnected)));
                        }
                    }
                }
            }

            let live = subs.values().filter(|t| t.live).count();
            prop_assert_eq!(hub.subscriber_count(), live);
        }
    }
}

#[test]
fn concurrent_register_unregister_and_broadcast_do_not_deadlock() {
    let hub = Arc::new(Hub::with_inbox_capacity(1));

    let churners: Vec<_> = (0..4)
        .map(|_| {
            let hub = Arc::clone(&hub);
            thread::spawn(move || {
                for _ in 0..500 {
                    let sub = hub.register();
                    hub.unregister(sub.id());
                    hub.unregister(sub.id());
                }
            })
        })
        .collect();

    let broadcaster = {
        let hub = Arc::clone(&hub);
        thread::spawn(move || {
            // Inboxes of capacity 1 are never drained here, so most sends hit
            // a full inbox; none of them may block.
            let _stalled: Vec<_> = (0..8).map(|_| hub.register()).collect();
            for _ in 0..2_000 {
                hub.broadcast(RELOAD);
            }
        })
    };

    for t in churners {
        t.join().unwrap();
    }
    broadcaster.join().unwrap();
    assert_eq!(hub.subscriber_count(), 8);
}
