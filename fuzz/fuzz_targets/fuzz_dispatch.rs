//! Fuzz target for the dispatcher.
//!
//! Interprets the input as a stream of small operations (who says what,
//! where, and when heartbeats fire) and checks collective invariants after
//! each event. Time only moves on heartbeats, through a manual clock shared
//! with the dispatcher, so timeouts are reachable.

#![no_main]

use std::time::Duration;

use coffeebot::{
    Clock, Config, Dispatcher, Event, FixedChooser, LocationKey, ManualClock, MessageId,
    PublicMessage, Timestamp, UserId,
};
use libfuzzer_sys::fuzz_target;

const PHRASES: &[&str] = &[
    "init", "yes", "join", "no", "leave", "close", "done", "ping", "state", "love", "dance",
    "`@**coffeebot** init`",
];

fuzz_target!(|data: &[u8]| {
    let Ok(bot) = Dispatcher::new(Config::default()) else {
        return;
    };
    let clock = ManualClock::new(Timestamp::from_millis(0));
    let seed = data.first().copied().unwrap_or(0);
    let mut bot = bot
        .with_chooser(FixedChooser(usize::from(seed)))
        .with_clock(clock.clone());

    for (i, chunk) in data.chunks(3).enumerate() {
        let [who, what, where_] = match *chunk {
            [a, b, c] => [a, b, c],
            _ => return,
        };

        // One byte value in eight is a heartbeat, `who` minutes later
        let event = if what % 8 == 7 {
            clock.advance(Duration::from_secs(u64::from(who) * 60));
            Event::Heartbeat { now: clock.now() }
        } else {
            Event::PublicMessage(PublicMessage {
                id: MessageId(i as u64),
                location: LocationKey::new("coffee", format!("t{}", where_ % 3)),
                sender: UserId::new(format!("u{}", who % 5)),
                sender_is_self: false,
                mentions_bot: true,
                content: format!(
                    "@**coffeebot** {}",
                    PHRASES[usize::from(what) % PHRASES.len()]
                ),
            })
        };
        bot.handle(&event);

        for (_, collective) in bot.registry().iter() {
            assert!(collective.len() <= collective.capacity());
            if let Some(maker) = collective.maker() {
                assert!(collective.is_closed());
                assert!(collective.contains(maker));
            }
            if let Some(leader) = collective.leader() {
                assert!(collective.contains(leader));
            }
            if !collective.is_closed() {
                assert!(!collective.is_empty());
                assert!(!collective.is_stale(clock.now()));
            }
        }
    }
});
